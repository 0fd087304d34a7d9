// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires a `LifecycleCoordinator` to a small, fixed two-target demo graph
//! using the real (non-fake) collaborators from `kiln-adapters` and the
//! file-backed persistent stores from `kiln-store`. No builder here does
//! real source-to-output transformation — that stays out of scope.

use anyhow::Result;
use kiln_adapters::{
    InMemoryBuildRootIndex, InMemoryModuleExcludeIndex, InMemoryTargetIndex,
    NoOpExternalCompilerHelper, NoOpLowMemoryWatcher, StaticBuilderRegistry,
};
use kiln_core::config::BuildConfig;
use kiln_core::message::MessageBus;
use kiln_core::target::{OutputRoot, SourceRoot, Target, TargetKind};
use kiln_driver::LifecycleCoordinator;
use kiln_store::{FsDataManager, FsDirtyStateStore, FsTimestampStorage};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// The fixed demo graph: a module-based `core` target, and an `app`
/// target that depends on it.
pub fn demo_targets(project_root: &std::path::Path) -> Vec<Target> {
    let core = Target::new("core", "core", TargetKind::ModuleBased)
        .with_source_root(SourceRoot::new(project_root.join("src/core")))
        .with_output_root(OutputRoot::new(project_root.join("out/core")));
    let app = Target::new("app", "app", TargetKind::Other)
        .with_source_root(SourceRoot::new(project_root.join("src/app")))
        .with_output_root(OutputRoot::new(project_root.join("out/app")))
        .with_dependency("core");
    vec![core, app]
}

/// Assembles a `LifecycleCoordinator` over the demo graph, rooted at
/// `config.system_root` for every persistent store.
pub fn coordinator(project_root: PathBuf, config: BuildConfig, bus: MessageBus) -> Result<LifecycleCoordinator> {
    let targets = demo_targets(&project_root);

    let mut roots: HashMap<_, _> = HashMap::new();
    for target in &targets {
        roots.insert(target.id.clone(), target.source_roots.clone());
    }

    std::fs::create_dir_all(&config.system_root)?;

    let data_manager = Arc::new(FsDataManager::new(config.system_root.clone()));
    data_manager.load()?;

    Ok(LifecycleCoordinator {
        target_index: Arc::new(InMemoryTargetIndex::new(targets)),
        build_root_index: Arc::new(InMemoryBuildRootIndex::new(roots)),
        module_exclude_index: Arc::new(InMemoryModuleExcludeIndex::new(Vec::new(), Vec::new())),
        builders: Arc::new(StaticBuilderRegistry::demo()),
        dirty_state: Arc::new(FsDirtyStateStore::new(config.system_root.join("dirty-state.bin"))),
        data_manager,
        timestamps: Arc::new(FsTimestampStorage::new(config.system_root.join("timestamps.bin"))),
        low_memory: Some(Arc::new(NoOpLowMemoryWatcher)),
        compiler_helper: Some(Arc::new(NoOpExternalCompilerHelper)),
        bus,
        config,
    })
}

#[cfg(test)]
#[path = "demo_project_tests.rs"]
mod tests;
