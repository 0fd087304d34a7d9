// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide, per-invocation registries threaded through the
//! [`crate::context::BuildContext`] (§3, §5): the cleared-output registry
//! and the invocation-wide removed-sources set. Both must provide safe
//! concurrent add/contains, so both are guarded by a coarse lock on the
//! whole registry rather than per-entry locking.

use crate::target::TargetId;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Set of targets whose outputs were cleared during this invocation, so
/// later deletion steps can skip redundant work (§3, §4.6.2 step 3).
#[derive(Default)]
pub struct ClearedOutputRegistry {
    cleared: parking_lot::Mutex<HashSet<TargetId>>,
}

impl ClearedOutputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_cleared(&self, target: TargetId) {
        self.cleared.lock().insert(target);
    }

    pub fn is_cleared(&self, target: &TargetId) -> bool {
        self.cleared.lock().contains(target)
    }

    pub fn cleared_targets(&self) -> Vec<TargetId> {
        self.cleared.lock().iter().cloned().collect()
    }
}

/// Invocation-wide union, per target, of sources removed by deleted-path
/// processing across every chunk (§4.6.2 step 6).
#[derive(Default)]
pub struct RemovedSources {
    by_target: parking_lot::Mutex<HashMap<TargetId, HashSet<PathBuf>>>,
}

impl RemovedSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&self, target: TargetId, sources: impl IntoIterator<Item = PathBuf>) {
        self.by_target.lock().entry(target).or_default().extend(sources);
    }

    pub fn for_target(&self, target: &TargetId) -> Vec<PathBuf> {
        self.by_target
            .lock()
            .get(target)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "registries_tests.rs"]
mod tests;
