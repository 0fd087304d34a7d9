// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message Bus: fan-out of progress, diagnostic, and lifecycle messages to
//! subscribed handlers.
//!
//! This is a separate, user-facing channel from `tracing`: `tracing` is for
//! operators/developers, the bus is for progress UIs embedding the driver.
//! Publishing to the bus also emits a matching `tracing` event so either
//! sink can reconstruct a build's timeline.

use crate::target::TargetId;
use std::path::PathBuf;
use std::sync::Arc;

/// Severity of a [`BuildMessage::Compiler`] message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

/// A diagnostic from a builder or the driver itself.
#[derive(Debug, Clone)]
pub struct CompilerMessage {
    pub source: String,
    pub kind: MessageKind,
    pub text: String,
}

impl CompilerMessage {
    pub fn new(source: impl Into<String>, kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind,
            text: text.into(),
        }
    }

    pub fn info(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(source, MessageKind::Info, text)
    }

    pub fn warning(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(source, MessageKind::Warning, text)
    }

    pub fn error(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(source, MessageKind::Error, text)
    }
}

/// Whether a [`BuildMessage::TargetProgress`] reports the start or the end
/// of building a set of targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetProgressPhase {
    Started,
    Finished,
}

/// Every message kind the driver can publish to the bus.
#[derive(Debug, Clone)]
pub enum BuildMessage {
    /// A human-readable progress line, e.g. "Cleaning output directories…".
    Progress(String),
    /// A diagnostic with a severity.
    Compiler(CompilerMessage),
    /// Outputs removed for a deleted or changed source.
    FileDeleted(Vec<PathBuf>),
    /// Outputs produced by a module-level builder pass, drained from the
    /// output consumer once the pass settles.
    FileGenerated(Vec<PathBuf>),
    /// A chunk's targets started or finished building.
    TargetProgress {
        targets: Vec<TargetId>,
        phase: TargetProgressPhase,
    },
    /// At least one builder reported `OK` (did real work) this invocation.
    DoneSomething,
}

/// Receives published [`BuildMessage`]s. Implementations must be cheap and
/// non-blocking; the bus calls handlers synchronously on the publishing
/// thread (which may be any scheduler worker thread).
pub trait MessageHandler: Send + Sync {
    fn handle(&self, message: &BuildMessage);
}

/// Fan-out of build messages to every subscribed [`MessageHandler`].
///
/// Cloning a `MessageBus` shares the same subscriber list (it is an `Arc`
/// internally), so every wrapped context created for a concurrently built
/// chunk publishes to the same handlers as the top-level context.
#[derive(Clone, Default)]
pub struct MessageBus {
    handlers: Arc<parking_lot::RwLock<Vec<Arc<dyn MessageHandler>>>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: Arc<dyn MessageHandler>) {
        self.handlers.write().push(handler);
    }

    pub fn publish(&self, message: BuildMessage) {
        match &message {
            BuildMessage::Progress(text) => tracing::info!(text = %text, "progress"),
            BuildMessage::Compiler(msg) => match msg.kind {
                MessageKind::Info => tracing::info!(source = %msg.source, text = %msg.text, "compiler message"),
                MessageKind::Warning => tracing::warn!(source = %msg.source, text = %msg.text, "compiler message"),
                MessageKind::Error => tracing::error!(source = %msg.source, text = %msg.text, "compiler message"),
            },
            BuildMessage::FileDeleted(paths) => {
                tracing::debug!(count = paths.len(), "files deleted")
            }
            BuildMessage::FileGenerated(paths) => {
                tracing::debug!(count = paths.len(), "files generated")
            }
            BuildMessage::TargetProgress { targets, phase } => {
                tracing::debug!(count = targets.len(), phase = ?phase, "target progress")
            }
            BuildMessage::DoneSomething => tracing::debug!("done something"),
        }
        for handler in self.handlers.read().iter() {
            handler.handle(&message);
        }
    }
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBus")
            .field("handlers", &self.handlers.read().len())
            .finish()
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
