// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-target compilation start stamps (§4.5 step 3, §4.7): used to detect
//! files modified *during* a build, which must be treated as dirty again
//! for the next invocation rather than considered up to date.

use crate::error::StorageError;
use crate::persistence::{load_snapshot, save_snapshot};
use chrono::{DateTime, Utc};
use kiln_core::store_traits::{StoreFailure, StoreResult, TimestampStorage};
use kiln_core::target::TargetId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Default, Serialize, Deserialize)]
struct TimestampSnapshot {
    stamps: HashMap<TargetId, DateTime<Utc>>,
}

pub struct FsTimestampStorage {
    path: PathBuf,
    state: parking_lot::RwLock<TimestampSnapshot>,
}

impl FsTimestampStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: parking_lot::RwLock::new(TimestampSnapshot::default()),
        }
    }

    pub fn load(&self) -> Result<(), StorageError> {
        if let Some(snapshot) = load_snapshot(&self.path)? {
            *self.state.write() = snapshot;
        }
        Ok(())
    }

    pub fn compilation_start_stamp(&self, target: &TargetId) -> Option<DateTime<Utc>> {
        self.state.read().stamps.get(target).copied()
    }
}

impl TimestampStorage for FsTimestampStorage {
    /// Flushes the stamp table to disk. Per §4.1 step 8, this is called
    /// unconditionally on every exit path; a write failure is logged but
    /// does not panic, since the in-memory stamps remain valid for the
    /// rest of this invocation.
    fn force(&self) {
        if let Err(err) = save_snapshot(&self.path, &*self.state.read()) {
            warn!(error = %err, path = %self.path.display(), "failed to flush timestamp storage");
        }
    }

    fn clean(&self) -> StoreResult<()> {
        self.state.write().stamps.clear();
        save_snapshot(&self.path, &*self.state.read()).map_err(StoreFailure::from)
    }

    fn update_compilation_start_stamp(&self, target: &TargetId) {
        self.state
            .write()
            .stamps
            .insert(target.clone(), Utc::now());
    }
}

#[cfg(test)]
#[path = "timestamp_tests.rs"]
mod tests;
