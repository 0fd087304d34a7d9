// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target chunks: strongly-connected components of the target dependency
//! graph, and the unit the scheduler parallelizes over.

use crate::target::{Target, TargetId};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identity of a [`TargetChunk`], derived from its member target ids.
    pub struct ChunkId;
}

/// A set of targets forming one strongly-connected component of the target
/// dependency graph. Most chunks are singletons; multi-target chunks are
/// only legal when every member is module-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetChunk {
    pub id: ChunkId,
    pub targets: Vec<Target>,
}

impl TargetChunk {
    /// Builds a chunk from its members, deriving a stable id from the
    /// sorted member target ids so the same SCC always gets the same
    /// `ChunkId` across invocations.
    pub fn new(mut targets: Vec<Target>) -> Self {
        targets.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        let id = ChunkId::new(
            targets
                .iter()
                .map(|t| t.id.as_str())
                .collect::<Vec<_>>()
                .join("+"),
        );
        Self { id, targets }
    }

    pub fn target_ids(&self) -> impl Iterator<Item = &TargetId> {
        self.targets.iter().map(|t| &t.id)
    }

    pub fn contains(&self, id: &TargetId) -> bool {
        self.targets.iter().any(|t| &t.id == id)
    }

    pub fn is_singleton_non_module(&self) -> bool {
        self.targets.len() == 1 && !self.targets[0].is_module_based()
    }

    pub fn is_all_module_based(&self) -> bool {
        !self.targets.is_empty() && self.targets.iter().all(|t| t.is_module_based())
    }

    /// §4.6: a heterogeneous multi-target chunk containing a non-module
    /// target is illegal. Returns the offending targets.
    pub fn illegal_non_module_members(&self) -> Vec<&Target> {
        if self.targets.len() <= 1 {
            return Vec::new();
        }
        self.targets
            .iter()
            .filter(|t| !t.is_module_based())
            .collect()
    }

    pub fn presentable_name(&self) -> String {
        self.targets
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
#[path = "chunk_tests.rs"]
mod tests;
