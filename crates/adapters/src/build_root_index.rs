// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `BuildRootIndex` (§6): hands back each target's configured
//! source roots and deletes the contents of any `generated` root on
//! `clear_temp_roots`, mirroring how the lifecycle coordinator clears the
//! system temp root but scoped to per-target generated-source roots.

use kiln_core::collaborators::BuildRootIndex;
use kiln_core::target::{SourceRoot, TargetId};
use std::collections::HashMap;
use tracing::warn;

pub struct InMemoryBuildRootIndex {
    roots: HashMap<TargetId, Vec<SourceRoot>>,
}

impl InMemoryBuildRootIndex {
    pub fn new(roots: HashMap<TargetId, Vec<SourceRoot>>) -> Self {
        Self { roots }
    }
}

impl BuildRootIndex for InMemoryBuildRootIndex {
    fn target_roots(&self, target: &TargetId) -> Vec<SourceRoot> {
        self.roots.get(target).cloned().unwrap_or_default()
    }

    fn clear_temp_roots(&self) {
        for roots in self.roots.values() {
            for root in roots.iter().filter(|r| r.generated) {
                if let Err(err) = clear_dir_contents(&root.path) {
                    warn!(path = %root.path.display(), error = %err, "failed to clear a generated source root");
                }
            }
        }
    }
}

fn clear_dir_contents(path: &std::path::Path) -> std::io::Result<()> {
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    for entry in entries {
        let entry = entry?;
        let entry_path = entry.path();
        if entry.file_type()?.is_dir() {
            std::fs::remove_dir_all(&entry_path)?;
        } else {
            std::fs::remove_file(&entry_path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "build_root_index_tests.rs"]
mod tests;
