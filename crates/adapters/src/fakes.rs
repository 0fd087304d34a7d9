// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test doubles for every collaborator trait in this crate, gated behind
//! `test-support` so other crates' tests (and the integration suite) can
//! script a `LifecycleCoordinator` without standing up real adapters.

use kiln_core::builder::{
    BuilderError, BuilderExitCode, DirtyFilesHolder, LifecycleTask, ModuleLevelBuilder,
    OutputConsumer, TargetBuilder,
};
use kiln_core::chunk::TargetChunk;
use kiln_core::collaborators::{
    BuildRootIndex, BuilderRegistry, ExternalCompilerHelper, LowMemoryWatcher, ModuleExcludeIndex,
    TargetIndex,
};
use kiln_core::context::BuildContextApi;
use kiln_core::target::{SourceRoot, Target, TargetId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// A fixed target list; chunks are derived the same way
/// [`crate::target_index::InMemoryTargetIndex`] does.
pub struct FakeTargetIndex {
    targets: Vec<Target>,
}

impl FakeTargetIndex {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }
}

impl TargetIndex for FakeTargetIndex {
    fn all_targets(&self) -> Vec<Target> {
        self.targets.clone()
    }

    fn sorted_target_chunks(&self) -> Vec<TargetChunk> {
        self.targets
            .iter()
            .cloned()
            .map(|t| TargetChunk::new(vec![t]))
            .collect()
    }

    fn dependencies(&self, target: &TargetId) -> Vec<TargetId> {
        self.targets
            .iter()
            .find(|t| &t.id == target)
            .map(|t| t.dependencies.clone())
            .unwrap_or_default()
    }
}

/// Records how many times `clear_temp_roots` was called; never returns any
/// source roots.
#[derive(Default)]
pub struct FakeBuildRootIndex {
    clear_calls: Mutex<usize>,
}

impl FakeBuildRootIndex {
    pub fn clear_calls(&self) -> usize {
        *self.clear_calls.lock()
    }
}

impl BuildRootIndex for FakeBuildRootIndex {
    fn target_roots(&self, _target: &TargetId) -> Vec<SourceRoot> {
        Vec::new()
    }

    fn clear_temp_roots(&self) {
        *self.clear_calls.lock() += 1;
    }
}

/// Treats every file as in-content and never excluded.
#[derive(Default)]
pub struct FakeModuleExcludeIndex;

impl ModuleExcludeIndex for FakeModuleExcludeIndex {
    fn is_in_content(&self, _file: &Path) -> bool {
        true
    }

    fn is_excluded(&self, _file: &Path) -> bool {
        false
    }
}

/// A builder that replays a fixed sequence of exit codes, one per call,
/// repeating the last entry once exhausted. Records every invocation.
pub struct ScriptedBuilder {
    name: String,
    category: kiln_core::builder::BuilderCategory,
    script: Mutex<Vec<BuilderExitCode>>,
    calls: Mutex<usize>,
}

impl ScriptedBuilder {
    pub fn new(
        name: impl Into<String>,
        category: kiln_core::builder::BuilderCategory,
        script: Vec<BuilderExitCode>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            script: Mutex::new(script),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }

    fn next_exit(&self) -> BuilderExitCode {
        let mut script = self.script.lock();
        *self.calls.lock() += 1;
        if script.len() > 1 {
            script.remove(0)
        } else {
            script.first().copied().unwrap_or(BuilderExitCode::NothingDone)
        }
    }
}

impl TargetBuilder for ScriptedBuilder {
    fn presentable_name(&self) -> &str {
        &self.name
    }

    fn build_target(
        &self,
        _ctx: &dyn BuildContextApi,
        _target: &Target,
    ) -> Result<BuilderExitCode, BuilderError> {
        Ok(self.next_exit())
    }
}

impl ModuleLevelBuilder for ScriptedBuilder {
    fn presentable_name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> kiln_core::builder::BuilderCategory {
        self.category
    }

    fn build(
        &self,
        _ctx: &dyn BuildContextApi,
        _chunk: &TargetChunk,
        _dirty: &dyn DirtyFilesHolder,
        _output: &mut OutputConsumer,
    ) -> Result<BuilderExitCode, BuilderError> {
        Ok(self.next_exit())
    }
}

/// An assembled registry over caller-provided (typically `ScriptedBuilder`)
/// builders and lifecycle tasks.
#[derive(Default)]
pub struct FakeBuilderRegistry {
    target_builders: Vec<Arc<dyn TargetBuilder>>,
    module_level_builders: Vec<Arc<dyn ModuleLevelBuilder>>,
    before_tasks: Vec<Arc<dyn LifecycleTask>>,
    after_tasks: Vec<Arc<dyn LifecycleTask>>,
}

impl FakeBuilderRegistry {
    pub fn new(
        target_builders: Vec<Arc<dyn TargetBuilder>>,
        module_level_builders: Vec<Arc<dyn ModuleLevelBuilder>>,
        before_tasks: Vec<Arc<dyn LifecycleTask>>,
        after_tasks: Vec<Arc<dyn LifecycleTask>>,
    ) -> Self {
        Self {
            target_builders,
            module_level_builders,
            before_tasks,
            after_tasks,
        }
    }
}

impl BuilderRegistry for FakeBuilderRegistry {
    fn target_builders(&self) -> Vec<Arc<dyn TargetBuilder>> {
        self.target_builders.clone()
    }

    fn module_level_builders(&self) -> Vec<Arc<dyn ModuleLevelBuilder>> {
        self.module_level_builders.clone()
    }

    fn before_tasks(&self) -> Vec<Arc<dyn LifecycleTask>> {
        self.before_tasks.clone()
    }

    fn after_tasks(&self) -> Vec<Arc<dyn LifecycleTask>> {
        self.after_tasks.clone()
    }
}

/// Records the callback it was handed so a test can trip it manually; does
/// not invoke it itself.
#[derive(Default)]
pub struct FakeLowMemoryWatcher {
    registered: Mutex<Option<Arc<dyn Fn() + Send + Sync>>>,
}

impl FakeLowMemoryWatcher {
    pub fn trip(&self) {
        if let Some(callback) = self.registered.lock().clone() {
            callback();
        }
    }
}

impl LowMemoryWatcher for FakeLowMemoryWatcher {
    fn register(&self, callback: Arc<dyn Fn() + Send + Sync>) {
        *self.registered.lock() = Some(callback);
    }
}

/// Reports a scripted shutdown outcome and counts `terminate` calls.
pub struct FakeExternalCompilerHelper {
    shutdown_result: bool,
    terminate_calls: Mutex<usize>,
}

impl FakeExternalCompilerHelper {
    pub fn new(shutdown_result: bool) -> Self {
        Self {
            shutdown_result,
            terminate_calls: Mutex::new(0),
        }
    }

    pub fn terminate_calls(&self) -> usize {
        *self.terminate_calls.lock()
    }
}

impl ExternalCompilerHelper for FakeExternalCompilerHelper {
    fn shutdown(&self, _grace: Duration) -> bool {
        self.shutdown_result
    }

    fn terminate(&self) {
        *self.terminate_calls.lock() += 1;
    }
}

/// Minimal `HashMap`-backed `BuildRootIndex` for tests that need real
/// per-target roots rather than an always-empty fake.
pub struct FakeBuildRootIndexWithRoots {
    roots: HashMap<TargetId, Vec<SourceRoot>>,
}

impl FakeBuildRootIndexWithRoots {
    pub fn new(roots: HashMap<TargetId, Vec<SourceRoot>>) -> Self {
        Self { roots }
    }
}

impl BuildRootIndex for FakeBuildRootIndexWithRoots {
    fn target_roots(&self, target: &TargetId) -> Vec<SourceRoot> {
        self.roots.get(target).cloned().unwrap_or_default()
    }

    fn clear_temp_roots(&self) {}
}

#[cfg(test)]
#[path = "fakes_tests.rs"]
mod tests;
