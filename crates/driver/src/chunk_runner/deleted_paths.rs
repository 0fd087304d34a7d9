// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deleted-path processing (§4.6.2): for every target in a chunk, drains
//! its pending deleted-source list, removes the outputs no longer claimed
//! by any live source, and keeps the source→form map in sync.

use super::ChunkCollaborators;
use crate::error::BuildError;
use kiln_core::chunk::TargetChunk;
use kiln_core::context::BuildContextApi;
use kiln_core::message::BuildMessage;
use kiln_core::registries::RemovedSources;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::debug;

/// Result of processing one chunk's deletions: per-target removed sources
/// (already merged into the invocation-wide registry) and directories that
/// may now be empty and worth pruning.
pub struct DeletedPathsReport {
    pub removed_per_target: HashMap<kiln_core::target::TargetId, Vec<PathBuf>>,
}

pub fn process(
    ctx: &dyn BuildContextApi,
    chunk: &TargetChunk,
    deps: &ChunkCollaborators,
    removed_sources: &RemovedSources,
) -> Result<DeletedPathsReport, BuildError> {
    let mut removed_per_target = HashMap::new();
    let mut empty_dir_candidates = HashSet::new();

    for target in &chunk.targets {
        let mut deleted_paths = deps.dirty_state.get_and_clear_deleted_paths(&target.id);
        #[cfg(test)]
        deleted_paths.sort();

        if deleted_paths.is_empty() {
            continue;
        }

        if deps.cleared_outputs.is_cleared(&target.id) {
            debug!(target = %target.name, "outputs already cleared this invocation, skipping deletion");
            removed_per_target.insert(target.id.clone(), deleted_paths);
            continue;
        }

        let source_to_output = deps.data_manager.source_to_output_map(&target.id);
        let output_to_source = deps.data_manager.output_to_source_registry();
        let source_to_form = deps.data_manager.source_to_form_map();

        let mut deleted_outputs = Vec::new();
        for (idx, source) in deleted_paths.iter().enumerate() {
            let outputs = source_to_output.outputs(source);
            let safe = output_to_source.safe_to_delete(&outputs, source);
            let mut failed = None;
            for output in &safe {
                match remove_recursive(output) {
                    Ok(()) => {
                        if target.is_module_based() {
                            if let Some(parent) = output.parent() {
                                empty_dir_candidates.insert(parent.to_path_buf());
                            }
                        }
                        deleted_outputs.push(output.clone());
                    }
                    Err(err) => {
                        failed = Some(err);
                        break;
                    }
                }
            }

            if let Some(err) = failed {
                // This source (and everything after it in the drained list)
                // was already removed from the dirty-state store's deleted
                // list; republish it so the next build retries it instead
                // of losing it silently.
                for unprocessed in &deleted_paths[idx..] {
                    deps.dirty_state.register_deleted(&target.id, unprocessed.clone());
                }
                if !deleted_outputs.is_empty() {
                    ctx.publish(BuildMessage::FileDeleted(deleted_outputs));
                }
                return Err(BuildError::Io(err));
            }

            source_to_output.remove_source(source);

            if target.is_module_based() {
                for form in source_to_form.get_state(source) {
                    if form.exists() {
                        deps.dirty_state.mark_dirty(
                            &target.id,
                            form.parent().map(PathBuf::from).unwrap_or_default(),
                            form.clone(),
                        );
                    }
                }
                source_to_form.remove(source);
            }
        }

        if !deleted_outputs.is_empty() {
            ctx.publish(BuildMessage::FileDeleted(deleted_outputs));
        }

        removed_per_target.insert(target.id.clone(), deleted_paths);
    }

    for (target, sources) in &removed_per_target {
        removed_sources.merge(target.clone(), sources.iter().cloned());
    }

    for dir in empty_dir_candidates {
        prune_if_empty(&dir);
    }

    Ok(DeletedPathsReport { removed_per_target })
}

fn remove_recursive(path: &std::path::Path) -> std::io::Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn prune_if_empty(dir: &std::path::Path) {
    if let Ok(mut entries) = std::fs::read_dir(dir) {
        if entries.next().is_none() {
            let _ = std::fs::remove_dir(dir);
        }
    }
}

#[cfg(test)]
#[path = "deleted_paths_tests.rs"]
mod tests;
