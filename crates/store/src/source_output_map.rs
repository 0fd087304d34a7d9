// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source↔Output Map (§3, §6): the persistent many-to-many association
//! between a target's source files and the outputs its builders produced
//! from them, plus the inverse lookup used to decide whether an output
//! orphaned by a deleted source is still claimed by some other source.

use crate::error::StorageError;
use crate::persistence::{load_snapshot, save_snapshot};
use kiln_core::store_traits::{OutputToSourceRegistry, SourceToOutputMap};
use kiln_core::target::TargetId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct SourceOutputSnapshot {
    by_target: HashMap<TargetId, HashMap<PathBuf, Vec<PathBuf>>>,
}

/// Shared backing store behind every per-target [`SourceToOutputMap`] view
/// and the single [`OutputToSourceRegistry`], so the inverse lookup can see
/// every target's claims.
#[derive(Default)]
pub struct SourceOutputStore {
    path: Option<PathBuf>,
    state: parking_lot::RwLock<SourceOutputSnapshot>,
}

impl SourceOutputStore {
    pub fn new(path: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            path: Some(path.into()),
            state: parking_lot::RwLock::new(SourceOutputSnapshot::default()),
        })
    }

    pub fn load(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else { return Ok(()) };
        if let Some(snapshot) = load_snapshot(path)? {
            *self.state.write() = snapshot;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else { return Ok(()) };
        save_snapshot(path, &*self.state.read())
    }

    fn sources_for(&self, target: &TargetId) -> Vec<PathBuf> {
        self.state
            .read()
            .by_target
            .get(target)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn outputs_for(&self, target: &TargetId, source: &Path) -> Vec<PathBuf> {
        self.state
            .read()
            .by_target
            .get(target)
            .and_then(|m| m.get(source))
            .cloned()
            .unwrap_or_default()
    }

    fn set_outputs_for(&self, target: &TargetId, source: PathBuf, outputs: Vec<PathBuf>) {
        self.state
            .write()
            .by_target
            .entry(target.clone())
            .or_default()
            .insert(source, outputs);
    }

    fn remove_source_for(&self, target: &TargetId, source: &Path) {
        if let Some(map) = self.state.write().by_target.get_mut(target) {
            map.remove(source);
        }
    }

    pub(crate) fn clear(&self) {
        *self.state.write() = SourceOutputSnapshot::default();
    }

    fn safe_to_delete(&self, outputs: &[PathBuf], excluding: &Path) -> Vec<PathBuf> {
        let guard = self.state.read();
        outputs
            .iter()
            .filter(|output| {
                !guard.by_target.values().any(|map| {
                    map.iter()
                        .any(|(src, outs)| src != excluding && outs.contains(output))
                })
            })
            .cloned()
            .collect()
    }
}

/// A single target's view onto the shared [`SourceOutputStore`].
pub struct TargetScopedSourceToOutputMap {
    target: TargetId,
    shared: Arc<SourceOutputStore>,
}

impl TargetScopedSourceToOutputMap {
    pub fn new(target: TargetId, shared: Arc<SourceOutputStore>) -> Self {
        Self { target, shared }
    }
}

impl SourceToOutputMap for TargetScopedSourceToOutputMap {
    fn sources(&self) -> Vec<PathBuf> {
        self.shared.sources_for(&self.target)
    }

    fn outputs(&self, source: &Path) -> Vec<PathBuf> {
        self.shared.outputs_for(&self.target, source)
    }

    fn set_outputs(&self, source: PathBuf, outputs: Vec<PathBuf>) {
        self.shared.set_outputs_for(&self.target, source, outputs);
    }

    fn remove_source(&self, source: &Path) {
        self.shared.remove_source_for(&self.target, source);
    }
}

/// Cross-target view used to decide whether a no-longer-tracked output is
/// safe to delete (§4.6.2, §8 invariant 6).
pub struct SharedOutputToSourceRegistry {
    shared: Arc<SourceOutputStore>,
}

impl SharedOutputToSourceRegistry {
    pub fn new(shared: Arc<SourceOutputStore>) -> Self {
        Self { shared }
    }
}

impl OutputToSourceRegistry for SharedOutputToSourceRegistry {
    fn safe_to_delete(&self, outputs: &[PathBuf], source: &Path) -> Vec<PathBuf> {
        self.shared.safe_to_delete(outputs, source)
    }
}

#[cfg(test)]
#[path = "source_output_map_tests.rs"]
mod tests;
