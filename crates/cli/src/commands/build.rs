// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::demo_project;
use crate::output::ProgressPrinter;
use anyhow::Result;
use kiln_core::config::BuildConfig;
use kiln_core::message::MessageBus;
use kiln_core::scope::BuildScope;
use std::path::PathBuf;
use std::sync::Arc;

/// Runs `build` (incremental) or, when `rebuild` is set, a whole-project
/// rebuild.
pub fn run(project_root: PathBuf, config: BuildConfig, rebuild: bool) -> Result<()> {
    let bus = MessageBus::new();
    bus.subscribe(Arc::new(ProgressPrinter));

    let coordinator = demo_project::coordinator(project_root, config, bus)?;
    let scope: Arc<dyn kiln_core::scope::Scope> = if rebuild {
        Arc::new(BuildScope::rebuild())
    } else {
        Arc::new(BuildScope::all())
    };

    coordinator.build(scope, false)?;
    Ok(())
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
