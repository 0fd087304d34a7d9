// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level error taxonomy (§7) and the outcome classification
//! `LifecycleCoordinator::build` uses to decide whether the caller should
//! retry with `rebuild = true`.

use kiln_core::context::CanceledError;
use kiln_core::store_traits::StoreFailure;
use thiserror::Error;

use crate::chunk_graph::ChunkGraphError;
use crate::output_cleaner::CleanError;

/// Errors any component of the driver may surface. `LifecycleCoordinator`
/// aggregates every component's own error enum via `#[from]` and returns
/// this type from `build`.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("build canceled")]
    Canceled(#[from] CanceledError),

    #[error(transparent)]
    Store(#[from] StoreFailure),

    #[error(transparent)]
    ChunkGraph(#[from] ChunkGraphError),

    #[error(transparent)]
    Clean(#[from] CleanError),

    #[error("builder {builder} aborted: {message}")]
    StopBuild { builder: String, message: String },

    #[error("{0}")]
    Builder(#[from] kiln_core::builder::BuilderError),

    #[error("internal assertion failed: {0}")]
    InternalAssertion(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// §7's taxonomy, collapsed to the handful of outcomes a caller actually
/// needs to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Cancellation unwound the build; persistent stores were flushed.
    Canceled,
    /// A builder deliberately aborted; treat as a successful early stop.
    StopBuild,
    /// The persistent store is corrupt or its integrity cannot be trusted;
    /// the caller should retry with `rebuild = true`.
    RebuildRequested,
    /// An ordinary build error: recorded in `errorsDetected`, reported to
    /// the caller, build does not retry automatically.
    BuildError,
    /// A scheduler or driver invariant was violated — a programmer error,
    /// not a build failure.
    InternalAssertion,
}

impl BuildError {
    pub fn classify(&self) -> BuildOutcome {
        match self {
            BuildError::Canceled(_) => BuildOutcome::Canceled,
            BuildError::StopBuild { .. } => BuildOutcome::StopBuild,
            BuildError::Store(StoreFailure::Corrupt(_)) => BuildOutcome::RebuildRequested,
            BuildError::ChunkGraph(_) => BuildOutcome::InternalAssertion,
            BuildError::InternalAssertion(_) => BuildOutcome::InternalAssertion,
            BuildError::Store(StoreFailure::Io(_))
            | BuildError::Clean(_)
            | BuildError::Builder(_)
            | BuildError::Io(_) => BuildOutcome::BuildError,
        }
    }
}
