// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kiln-store: the default, file-backed implementations of the persistent
//! store traits defined in `kiln-core` (§3, §3.1, §6) — zstd-compressed
//! JSON snapshots, written atomically and recovered from a `.bak` copy on
//! corruption. Any type implementing those traits may replace this crate
//! entirely; nothing in `kiln-driver` depends on it directly.

mod data_manager;
mod dirty_state;
mod error;
mod persistence;
mod source_form_map;
mod source_output_map;
mod timestamp;

pub use data_manager::FsDataManager;
pub use dirty_state::FsDirtyStateStore;
pub use error::{StorageError, StorageResult};
pub use source_form_map::FsSourceFormMap;
pub use source_output_map::{
    SharedOutputToSourceRegistry, SourceOutputStore, TargetScopedSourceToOutputMap,
};
pub use timestamp::FsTimestampStorage;
