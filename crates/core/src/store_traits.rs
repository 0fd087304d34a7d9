// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent-store interfaces (§6): the driver's contract with the
//! dirty-state store, source↔output map, and friends. Concrete,
//! crash-resilient implementations live in `kiln-store`; this module only
//! defines the seam, plus the minimal error type that crosses it.
//!
//! Storage file formats are a Non-goal (§1) beyond this contract — a
//! `StoreFailure::Corrupt` is the one outcome the driver's failure
//! classification (§4.1, §7) cares about by name.

use crate::chunk::TargetChunk;
use crate::target::TargetId;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The one thing the driver needs to know about a persistent-store
/// failure: whether it implies the cache is corrupt (escalate to a
/// rebuild-requested outcome) or is an ordinary I/O failure (wrap as a
/// build exception).
#[derive(Debug, Error, Clone)]
pub enum StoreFailure {
    #[error("I/O failure: {0}")]
    Io(String),
    #[error("persistent store corrupted: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreFailure>;

/// Tracks, per target, which source files must be recompiled and which
/// have been deleted since the last build (§3, §6).
pub trait DirtyStateStore: Send + Sync {
    /// `root -> dirty files under that root` for `target`.
    fn sources_to_recompile(&self, target: &TargetId) -> Vec<(PathBuf, Vec<PathBuf>)>;

    fn get_and_clear_deleted_paths(&self, target: &TargetId) -> Vec<PathBuf>;
    fn register_deleted(&self, target: &TargetId, file: PathBuf);

    fn mark_dirty(&self, target: &TargetId, root: PathBuf, file: PathBuf);
    fn mark_all_dirty(&self, target: &TargetId, roots: &[PathBuf]);

    /// Pre-round hook invoked once before a chunk's builders-for-chunk
    /// protocol begins (§4.6 step 4).
    fn before_chunk_build_start(&self, chunk: &TargetChunk);
    /// Reset round scratch at the top of every module-level pass (§4.6.1 a).
    fn before_next_round_start(&self, chunk: &TargetChunk);
    fn clear_round_data(&self, chunk: &TargetChunk);
    fn clear_chunk_data(&self, chunk: &TargetChunk);

    /// Marks every target in the chunk up to date (§4.6 step 6).
    fn mark_up_to_date(&self, chunk: &TargetChunk);

    fn clear_all(&self);
}

/// Persistent many-to-many association between source paths and produced
/// output paths (§3, §6).
pub trait SourceToOutputMap: Send + Sync {
    fn sources(&self) -> Vec<PathBuf>;
    fn outputs(&self, source: &Path) -> Vec<PathBuf>;
    fn set_outputs(&self, source: PathBuf, outputs: Vec<PathBuf>);
    fn remove_source(&self, source: &Path);
}

/// Inverse lookup used to decide whether an output is safe to delete when
/// its source disappears (§4.6.2, §8 invariant 6).
pub trait OutputToSourceRegistry: Send + Sync {
    /// Returns the subset of `outputs` not also claimed by any currently
    /// tracked source other than `source`.
    fn safe_to_delete(&self, outputs: &[PathBuf], source: &Path) -> Vec<PathBuf>;
}

/// Source path -> bound "form" file paths (e.g. a UI form bound to a
/// source class). Only module-based targets consult this (§4.6.2 step 5).
pub trait SourceFormMap: Send + Sync {
    fn get_state(&self, source: &Path) -> Vec<PathBuf>;
    fn remove(&self, source: &Path);
}

/// Aggregates the per-target persistent stores and owns their flush/clean
/// lifecycle (§6).
pub trait DataManager: Send + Sync {
    fn flush(&self, final_flush: bool) -> StoreResult<()>;
    fn save_version(&self);
    fn clean(&self) -> StoreResult<()>;
    fn close_source_to_output_storages(&self, chunks: &[TargetChunk]) -> StoreResult<()>;

    fn source_to_output_map(&self, target: &TargetId) -> std::sync::Arc<dyn SourceToOutputMap>;
    fn output_to_source_registry(&self) -> std::sync::Arc<dyn OutputToSourceRegistry>;
    fn source_to_form_map(&self) -> std::sync::Arc<dyn SourceFormMap>;
}

/// Tracks per-target compilation start stamps (§4.5 step 3, §4.7).
pub trait TimestampStorage: Send + Sync {
    fn force(&self);
    fn clean(&self) -> StoreResult<()>;
    fn update_compilation_start_stamp(&self, target: &TargetId);
}
