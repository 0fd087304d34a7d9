// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::demo_project;
use anyhow::Result;
use kiln_core::config::BuildConfig;
use kiln_core::context::BuildContext;
use kiln_core::message::MessageBus;
use kiln_core::scope::BuildScope;
use kiln_driver::OutputCleaner;
use std::path::PathBuf;
use std::sync::Arc;

/// Wipes every demo target's output root and the persistent stores,
/// without running any builder.
pub fn run(project_root: PathBuf, config: BuildConfig) -> Result<()> {
    let bus = MessageBus::new();
    let coordinator = demo_project::coordinator(project_root, config, bus.clone())?;

    let ctx = BuildContext::new(Arc::new(BuildScope::all()), bus, coordinator.config.clone());
    let targets = coordinator.target_index.all_targets();
    let data_manager = coordinator.data_manager.clone();

    let cleanup = OutputCleaner::whole_project_clean(
        &ctx,
        &targets,
        coordinator.module_exclude_index.as_ref(),
        ctx.cleared_outputs(),
        move |target_id| data_manager.source_to_output_map(target_id),
    )?;
    if let Some(cleanup) = cleanup {
        let _ = cleanup.handle.join();
    }

    coordinator.timestamps.clean()?;
    coordinator.data_manager.clean()?;

    println!("cleaned {} target(s)", targets.len());
    Ok(())
}

#[cfg(test)]
#[path = "clean_tests.rs"]
mod tests;
