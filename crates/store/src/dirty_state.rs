// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk default [`DirtyStateStore`] implementation (§3, §6).
//!
//! Per target, tracks explicitly registered dirty files (by source root) and
//! a pending deleted-paths list. Discovering *which* files are dirty is a
//! VFS/indexing concern external to this crate (§1 Non-goals); this store
//! only remembers what it is told via [`DirtyStateStore::mark_dirty`] and
//! [`DirtyStateStore::mark_all_dirty`].

use crate::error::StorageError;
use crate::persistence::{load_snapshot, save_snapshot};
use indexmap::IndexSet;
use kiln_core::chunk::TargetChunk;
use kiln_core::store_traits::DirtyStateStore;
use kiln_core::target::TargetId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct TargetDirtyState {
    /// Explicitly registered dirty files, keyed by the source root they
    /// were reported under.
    dirty: HashMap<PathBuf, IndexSet<PathBuf>>,
    /// Roots marked fully dirty by `mark_all_dirty`; a root with no
    /// explicit file entries yet still round-trips as "dirty" via this set.
    full_roots: HashSet<PathBuf>,
    deleted: IndexSet<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DirtyStateSnapshot {
    targets: HashMap<TargetId, TargetDirtyState>,
}

/// File-backed [`DirtyStateStore`]. State lives in memory between `flush`
/// calls; `load`/`save` move it to/from the zstd-compressed JSON snapshot
/// at `path` (§3.1).
pub struct FsDirtyStateStore {
    path: PathBuf,
    state: parking_lot::RwLock<DirtyStateSnapshot>,
}

impl FsDirtyStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: parking_lot::RwLock::new(DirtyStateSnapshot::default()),
        }
    }

    /// Loads persisted state from disk, replacing whatever is in memory.
    pub fn load(&self) -> Result<(), StorageError> {
        if let Some(snapshot) = load_snapshot(&self.path)? {
            *self.state.write() = snapshot;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), StorageError> {
        save_snapshot(&self.path, &*self.state.read())
    }
}

impl DirtyStateStore for FsDirtyStateStore {
    fn sources_to_recompile(&self, target: &TargetId) -> Vec<(PathBuf, Vec<PathBuf>)> {
        let guard = self.state.read();
        let Some(entry) = guard.targets.get(target) else {
            return Vec::new();
        };

        let mut roots: HashSet<&Path> = entry.dirty.keys().map(|p| p.as_path()).collect();
        roots.extend(entry.full_roots.iter().map(|p| p.as_path()));

        roots
            .into_iter()
            .map(|root| {
                let files = entry
                    .dirty
                    .get(root)
                    .map(|set| set.iter().cloned().collect())
                    .unwrap_or_default();
                (root.to_path_buf(), files)
            })
            .collect()
    }

    fn get_and_clear_deleted_paths(&self, target: &TargetId) -> Vec<PathBuf> {
        let mut guard = self.state.write();
        let Some(entry) = guard.targets.get_mut(target) else {
            return Vec::new();
        };
        let drained: Vec<PathBuf> = entry.deleted.drain(..).collect();
        #[cfg(test)]
        let drained = {
            let mut d = drained;
            d.sort();
            d
        };
        drained
    }

    fn register_deleted(&self, target: &TargetId, file: PathBuf) {
        self.state
            .write()
            .targets
            .entry(target.clone())
            .or_default()
            .deleted
            .insert(file);
    }

    fn mark_dirty(&self, target: &TargetId, root: PathBuf, file: PathBuf) {
        self.state
            .write()
            .targets
            .entry(target.clone())
            .or_default()
            .dirty
            .entry(root)
            .or_default()
            .insert(file);
    }

    fn mark_all_dirty(&self, target: &TargetId, roots: &[PathBuf]) {
        let mut guard = self.state.write();
        let entry = guard.targets.entry(target.clone()).or_default();
        entry.full_roots.extend(roots.iter().cloned());
    }

    fn before_chunk_build_start(&self, chunk: &TargetChunk) {
        debug!(chunk = %chunk.presentable_name(), "dirty-state: before_chunk_build_start");
    }

    fn before_next_round_start(&self, chunk: &TargetChunk) {
        debug!(chunk = %chunk.presentable_name(), "dirty-state: before_next_round_start");
    }

    fn clear_round_data(&self, chunk: &TargetChunk) {
        debug!(chunk = %chunk.presentable_name(), "dirty-state: clear_round_data");
    }

    fn clear_chunk_data(&self, chunk: &TargetChunk) {
        debug!(chunk = %chunk.presentable_name(), "dirty-state: clear_chunk_data");
    }

    fn mark_up_to_date(&self, chunk: &TargetChunk) {
        let mut guard = self.state.write();
        for id in chunk.target_ids() {
            if let Some(entry) = guard.targets.get_mut(id) {
                entry.dirty.clear();
                entry.full_roots.clear();
            }
        }
    }

    fn clear_all(&self) {
        self.state.write().targets.clear();
    }
}

#[cfg(test)]
#[path = "dirty_state_tests.rs"]
mod tests;
