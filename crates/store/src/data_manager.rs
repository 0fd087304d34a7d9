// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data Manager (§3, §6): owns the source↔output map, the source→form map,
//! and their flush/clean lifecycle, and hands out per-target views of the
//! source↔output map to callers.

use crate::source_form_map::FsSourceFormMap;
use crate::source_output_map::{
    SharedOutputToSourceRegistry, SourceOutputStore, TargetScopedSourceToOutputMap,
};
use kiln_core::chunk::TargetChunk;
use kiln_core::store_traits::{
    DataManager, OutputToSourceRegistry, SourceFormMap, SourceToOutputMap, StoreFailure,
    StoreResult,
};
use kiln_core::target::TargetId;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// File-backed [`DataManager`]. `system_root` is the project directory the
/// individual store snapshots are written under (§3.1).
pub struct FsDataManager {
    source_output: Arc<SourceOutputStore>,
    form_map: Arc<FsSourceFormMap>,
    version: AtomicU64,
    version_path: PathBuf,
}

impl FsDataManager {
    pub fn new(system_root: impl Into<PathBuf>) -> Self {
        let system_root = system_root.into();
        Self {
            source_output: SourceOutputStore::new(system_root.join("source-to-output.bin")),
            form_map: Arc::new(FsSourceFormMap::new(system_root.join("source-to-form.bin"))),
            version: AtomicU64::new(0),
            version_path: system_root.join("data-manager.version"),
        }
    }

    /// Loads every underlying store's on-disk snapshot into memory.
    pub fn load(&self) -> StoreResult<()> {
        self.source_output.load().map_err(StoreFailure::from)?;
        self.form_map.load().map_err(StoreFailure::from)?;
        if let Ok(text) = std::fs::read_to_string(&self.version_path) {
            if let Ok(v) = text.trim().parse::<u64>() {
                self.version.store(v, Ordering::SeqCst);
            }
        }
        Ok(())
    }
}

impl DataManager for FsDataManager {
    fn flush(&self, final_flush: bool) -> StoreResult<()> {
        debug!(final_flush, "data manager flush");
        self.source_output.save().map_err(StoreFailure::from)?;
        self.form_map.save().map_err(StoreFailure::from)?;
        Ok(())
    }

    fn save_version(&self) {
        let v = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        if let Err(err) = std::fs::write(&self.version_path, v.to_string()) {
            tracing::warn!(error = %err, "failed to persist data manager version");
        }
    }

    fn clean(&self) -> StoreResult<()> {
        info!("data manager clean: resetting source-to-output and source-to-form state");
        self.source_output.clear();
        self.form_map.clear();
        self.form_map.save().map_err(StoreFailure::from)?;
        self.source_output.save().map_err(StoreFailure::from)?;
        self.version.store(0, Ordering::SeqCst);
        Ok(())
    }

    fn close_source_to_output_storages(&self, chunks: &[TargetChunk]) -> StoreResult<()> {
        debug!(chunks = chunks.len(), "closing source-to-output storages for chunk batch");
        self.source_output.save().map_err(StoreFailure::from)
    }

    fn source_to_output_map(&self, target: &TargetId) -> Arc<dyn SourceToOutputMap> {
        Arc::new(TargetScopedSourceToOutputMap::new(
            target.clone(),
            self.source_output.clone(),
        ))
    }

    fn output_to_source_registry(&self) -> Arc<dyn OutputToSourceRegistry> {
        Arc::new(SharedOutputToSourceRegistry::new(self.source_output.clone()))
    }

    fn source_to_form_map(&self) -> Arc<dyn SourceFormMap> {
        self.form_map.clone()
    }
}

#[cfg(test)]
#[path = "data_manager_tests.rs"]
mod tests;
