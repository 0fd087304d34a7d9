// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test doubles for the chunk-runner submodules. Not part of the
//! public API: `kiln-adapters` provides the project-wide fakes, but the
//! chunk runner's tests only need the narrow slices exercised here.

use kiln_core::chunk::TargetChunk;
use kiln_core::collaborators::{BuildRootIndex, BuilderRegistry};
use kiln_core::config::BuildConfig;
use kiln_core::context::{BuildContext, WrappedContext};
use kiln_core::message::MessageBus;
use kiln_core::scope::BuildScope;
use kiln_core::store_traits::{
    DataManager, DirtyStateStore, OutputToSourceRegistry, SourceFormMap, SourceToOutputMap,
    StoreResult,
};
use kiln_core::target::TargetId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Default)]
struct TargetDirtyState {
    dirty: HashMap<PathBuf, Vec<PathBuf>>,
    deleted: Vec<PathBuf>,
}

#[derive(Default)]
pub struct FakeDirtyStateStore {
    state: Mutex<HashMap<TargetId, TargetDirtyState>>,
    pub mark_all_dirty_calls: Mutex<Vec<TargetId>>,
}

impl FakeDirtyStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_dirty(&self, target: &TargetId, root: PathBuf, file: PathBuf) {
        self.mark_dirty(target, root, file);
    }

    pub fn seed_deleted(&self, target: &TargetId, file: PathBuf) {
        self.register_deleted(target, file);
    }
}

impl DirtyStateStore for FakeDirtyStateStore {
    fn sources_to_recompile(&self, target: &TargetId) -> Vec<(PathBuf, Vec<PathBuf>)> {
        self.state
            .lock()
            .get(target)
            .map(|t| t.dirty.iter().map(|(r, f)| (r.clone(), f.clone())).collect())
            .unwrap_or_default()
    }

    fn get_and_clear_deleted_paths(&self, target: &TargetId) -> Vec<PathBuf> {
        self.state
            .lock()
            .get_mut(target)
            .map(|t| std::mem::take(&mut t.deleted))
            .unwrap_or_default()
    }

    fn register_deleted(&self, target: &TargetId, file: PathBuf) {
        self.state
            .lock()
            .entry(target.clone())
            .or_default()
            .deleted
            .push(file);
    }

    fn mark_dirty(&self, target: &TargetId, root: PathBuf, file: PathBuf) {
        self.state
            .lock()
            .entry(target.clone())
            .or_default()
            .dirty
            .entry(root)
            .or_default()
            .push(file);
    }

    fn mark_all_dirty(&self, target: &TargetId, _roots: &[PathBuf]) {
        self.mark_all_dirty_calls.lock().push(target.clone());
    }

    fn before_chunk_build_start(&self, _chunk: &TargetChunk) {}
    fn before_next_round_start(&self, _chunk: &TargetChunk) {}
    fn clear_round_data(&self, _chunk: &TargetChunk) {}
    fn clear_chunk_data(&self, _chunk: &TargetChunk) {}

    fn mark_up_to_date(&self, chunk: &TargetChunk) {
        let mut state = self.state.lock();
        for target in &chunk.targets {
            state.entry(target.id.clone()).or_default().dirty.clear();
        }
    }

    fn clear_all(&self) {
        self.state.lock().clear();
    }
}

#[derive(Default)]
pub struct FakeSourceToOutputMap {
    entries: Mutex<HashMap<PathBuf, Vec<PathBuf>>>,
}

impl FakeSourceToOutputMap {
    pub fn with(entries: Vec<(PathBuf, Vec<PathBuf>)>) -> Self {
        Self {
            entries: Mutex::new(entries.into_iter().collect()),
        }
    }
}

impl SourceToOutputMap for FakeSourceToOutputMap {
    fn sources(&self) -> Vec<PathBuf> {
        self.entries.lock().keys().cloned().collect()
    }
    fn outputs(&self, source: &Path) -> Vec<PathBuf> {
        self.entries.lock().get(source).cloned().unwrap_or_default()
    }
    fn set_outputs(&self, source: PathBuf, outputs: Vec<PathBuf>) {
        self.entries.lock().insert(source, outputs);
    }
    fn remove_source(&self, source: &Path) {
        self.entries.lock().remove(source);
    }
}

#[derive(Default)]
pub struct FakeOutputToSourceRegistry {
    pub claims: Mutex<HashMap<PathBuf, Vec<PathBuf>>>,
}

impl OutputToSourceRegistry for FakeOutputToSourceRegistry {
    fn safe_to_delete(&self, outputs: &[PathBuf], source: &Path) -> Vec<PathBuf> {
        let claims = self.claims.lock();
        outputs
            .iter()
            .filter(|output| {
                claims
                    .get(output.as_path())
                    .map(|sources| sources.iter().all(|s| s == source))
                    .unwrap_or(true)
            })
            .cloned()
            .collect()
    }
}

#[derive(Default)]
pub struct FakeSourceFormMap {
    forms: Mutex<HashMap<PathBuf, Vec<PathBuf>>>,
}

impl SourceFormMap for FakeSourceFormMap {
    fn get_state(&self, source: &Path) -> Vec<PathBuf> {
        self.forms.lock().get(source).cloned().unwrap_or_default()
    }
    fn remove(&self, source: &Path) {
        self.forms.lock().remove(source);
    }
}

pub struct FakeDataManager {
    pub source_to_output: Arc<FakeSourceToOutputMap>,
    pub output_to_source: Arc<FakeOutputToSourceRegistry>,
    pub source_to_form: Arc<FakeSourceFormMap>,
}

impl FakeDataManager {
    pub fn new() -> Self {
        Self {
            source_to_output: Arc::new(FakeSourceToOutputMap::default()),
            output_to_source: Arc::new(FakeOutputToSourceRegistry::default()),
            source_to_form: Arc::new(FakeSourceFormMap::default()),
        }
    }
}

impl DataManager for FakeDataManager {
    fn flush(&self, _final_flush: bool) -> StoreResult<()> {
        Ok(())
    }
    fn save_version(&self) {}
    fn clean(&self) -> StoreResult<()> {
        Ok(())
    }
    fn close_source_to_output_storages(&self, _chunks: &[TargetChunk]) -> StoreResult<()> {
        Ok(())
    }
    fn source_to_output_map(&self, _target: &TargetId) -> Arc<dyn SourceToOutputMap> {
        self.source_to_output.clone()
    }
    fn output_to_source_registry(&self) -> Arc<dyn OutputToSourceRegistry> {
        self.output_to_source.clone()
    }
    fn source_to_form_map(&self) -> Arc<dyn SourceFormMap> {
        self.source_to_form.clone()
    }
}

#[derive(Default)]
pub struct FakeBuilderRegistry {
    pub target_builders: Vec<Arc<dyn kiln_core::builder::TargetBuilder>>,
    pub module_level_builders: Vec<Arc<dyn kiln_core::builder::ModuleLevelBuilder>>,
}

impl BuilderRegistry for FakeBuilderRegistry {
    fn target_builders(&self) -> Vec<Arc<dyn kiln_core::builder::TargetBuilder>> {
        self.target_builders.clone()
    }
    fn module_level_builders(&self) -> Vec<Arc<dyn kiln_core::builder::ModuleLevelBuilder>> {
        self.module_level_builders.clone()
    }
    fn before_tasks(&self) -> Vec<Arc<dyn kiln_core::builder::LifecycleTask>> {
        Vec::new()
    }
    fn after_tasks(&self) -> Vec<Arc<dyn kiln_core::builder::LifecycleTask>> {
        Vec::new()
    }
}

#[derive(Default)]
pub struct FakeBuildRootIndex {
    pub clear_calls: Mutex<usize>,
}

impl BuildRootIndex for FakeBuildRootIndex {
    fn target_roots(&self, _target: &TargetId) -> Vec<kiln_core::target::SourceRoot> {
        Vec::new()
    }
    fn clear_temp_roots(&self) {
        *self.clear_calls.lock() += 1;
    }
}

pub fn wrapped_context() -> WrappedContext {
    let root = Arc::new(BuildContext::new(
        Arc::new(BuildScope::all()),
        MessageBus::new(),
        BuildConfig::new("/tmp"),
    ));
    WrappedContext::new(root)
}
