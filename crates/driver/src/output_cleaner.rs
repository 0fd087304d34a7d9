// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output Cleaner (§4.3): whole-project clean on rebuild, selective clean
//! per changed or deleted source.

use kiln_core::collaborators::ModuleExcludeIndex;
use kiln_core::context::BuildContextApi;
use kiln_core::message::{BuildMessage, CompilerMessage};
use kiln_core::registries::ClearedOutputRegistry;
use kiln_core::store_traits::SourceToOutputMap;
use kiln_core::target::Target;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("I/O error cleaning outputs: {0}")]
    Io(#[from] std::io::Error),
}

/// Leftover children that failed synchronous deletion and were handed off
/// for background retry, plus the join handle tracking that retry (§9:
/// "tracked list of join-handles" rather than free-floating futures).
pub struct AsyncCleanup {
    pub handle: std::thread::JoinHandle<Vec<PathBuf>>,
}

pub struct OutputCleaner;

impl OutputCleaner {
    /// Whole-project clean: collects every affected target's output roots,
    /// determines which are safe to wipe wholesale without risking a
    /// source root, and deletes their children. Roots that overlap a
    /// source root fall back to selective clean for their owning targets.
    pub fn whole_project_clean(
        ctx: &dyn BuildContextApi,
        targets: &[Target],
        module_exclude: &dyn ModuleExcludeIndex,
        cleared: &ClearedOutputRegistry,
        source_to_output: impl Fn(&kiln_core::target::TargetId) -> std::sync::Arc<dyn SourceToOutputMap>,
    ) -> Result<Option<AsyncCleanup>, CleanError> {
        ctx.publish(BuildMessage::Progress(
            "Cleaning output directories…".to_string(),
        ));

        let source_roots: Vec<PathBuf> = targets
            .iter()
            .flat_map(|t| t.source_roots.iter())
            .filter(|r| !r.generated)
            .filter(|r| module_exclude.is_in_content(&r.path))
            .filter(|r| !module_exclude.is_excluded(&r.path))
            .map(|r| r.path.clone())
            .collect();

        // output root -> targets that write to it
        let mut by_root: HashMap<&Path, Vec<&Target>> = HashMap::new();
        for target in targets {
            for root in &target.output_roots {
                by_root.entry(root.path.as_path()).or_default().push(target);
            }
        }

        let mut leftovers = Vec::new();
        for (root, owning_targets) in &by_root {
            let root_excluded = owning_targets
                .iter()
                .flat_map(|t| t.output_roots.iter())
                .find(|r| r.path.as_path() == *root)
                .map(|r| r.excluded)
                .unwrap_or(false);

            let overlaps = !root_excluded
                && source_roots
                    .iter()
                    .any(|src| root.starts_with(src) || src.starts_with(root));

            if overlaps {
                warn!(root = %root.display(), "output root overlaps a source root, falling back to selective clean");
                ctx.publish(BuildMessage::Compiler(CompilerMessage::warning(
                    "output-cleaner",
                    format!("output root {} overlaps a source root", root.display()),
                )));
                for target in owning_targets {
                    Self::selective_clean(ctx, target, source_to_output(&target.id).as_ref(), cleared)?;
                }
                continue;
            }

            leftovers.extend(delete_children(root));
            for target in owning_targets {
                cleared.mark_cleared(target.id.clone());
            }
        }

        if leftovers.is_empty() {
            return Ok(None);
        }

        let handle = std::thread::spawn(move || {
            leftovers
                .into_iter()
                .filter(|p| remove_path(p).is_err())
                .collect()
        });
        Ok(Some(AsyncCleanup { handle }))
    }

    /// Selective clean for one target: deletes the listed outputs of every
    /// tracked source, emits a `FileDeleted` event, and prunes directories
    /// left empty for module-based targets. Never fatal: failures are
    /// logged and reported as a warning.
    pub fn selective_clean(
        ctx: &dyn BuildContextApi,
        target: &Target,
        source_to_output: &dyn SourceToOutputMap,
        cleared: &ClearedOutputRegistry,
    ) -> Result<(), CleanError> {
        let mut deleted = Vec::new();
        let mut parent_dirs = std::collections::HashSet::new();

        for source in source_to_output.sources() {
            for output in source_to_output.outputs(&source) {
                match remove_path(&output) {
                    Ok(()) => {
                        if target.is_module_based() {
                            if let Some(parent) = output.parent() {
                                parent_dirs.insert(parent.to_path_buf());
                            }
                        }
                        deleted.push(output);
                    }
                    Err(err) => {
                        warn!(path = %output.display(), error = %err, "failed to delete output, continuing");
                        ctx.publish(BuildMessage::Compiler(CompilerMessage::warning(
                            "output-cleaner",
                            format!("could not delete {}: {err}", output.display()),
                        )));
                    }
                }
            }
        }

        if !deleted.is_empty() {
            ctx.publish(BuildMessage::FileDeleted(deleted));
        }

        for dir in parent_dirs {
            prune_if_empty(&dir);
        }

        cleared.mark_cleared(target.id.clone());
        Ok(())
    }
}

fn delete_children(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };
    let mut failed = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if remove_path(&path).is_err() {
            failed.push(path);
        }
    }
    failed
}

fn remove_path(path: &Path) -> std::io::Result<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

fn prune_if_empty(dir: &Path) {
    if let Ok(mut entries) = std::fs::read_dir(dir) {
        if entries.next().is_none() {
            let _ = std::fs::remove_dir(dir);
        }
    }
}

#[cfg(test)]
#[path = "output_cleaner_tests.rs"]
mod tests;
