// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A `MessageHandler` that prints build progress to stdout, independent of
//! the `tracing` diagnostics the `EnvFilter` subscriber writes to stderr.

use kiln_core::message::{BuildMessage, MessageHandler, MessageKind};

pub struct ProgressPrinter;

impl MessageHandler for ProgressPrinter {
    fn handle(&self, message: &BuildMessage) {
        match message {
            BuildMessage::Progress(text) => println!("{text}"),
            BuildMessage::Compiler(msg) => {
                let label = match msg.kind {
                    MessageKind::Info => "info",
                    MessageKind::Warning => "warning",
                    MessageKind::Error => "error",
                };
                println!("[{label}] {}: {}", msg.source, msg.text);
            }
            BuildMessage::FileDeleted(paths) => println!("deleted {} output(s)", paths.len()),
            BuildMessage::FileGenerated(paths) => println!("generated {} output(s)", paths.len()),
            BuildMessage::TargetProgress { targets, phase } => {
                println!("{:?}: {} target(s)", phase, targets.len())
            }
            BuildMessage::DoneSomething => {}
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
