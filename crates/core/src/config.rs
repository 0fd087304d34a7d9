// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Driver configuration: the resolved environment/config inputs from §6.
//!
//! Loading this from a file format (TOML, JSON, …) is an external concern —
//! this crate only defines the resolved shape. The CLI front-end
//! demonstrates deserializing it from TOML via `toml`/`serde`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `compile.parallel.max.threads`, `compile.parallel`,
/// `generate.classpath.index`, and the system temp root, resolved into one
/// struct the driver consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// `compile.parallel`: whether the scheduler may use more than one
    /// worker thread at all.
    #[serde(default = "default_parallel_enabled")]
    pub parallel_enabled: bool,

    /// `compile.parallel.max.threads`: overrides the computed worker pool
    /// size. `None` means "use the computed default."
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// `generate.classpath.index`: whether to emit the optional
    /// classpath-index marker event (§9 Open Questions).
    #[serde(default)]
    pub generate_classpath_index: bool,

    /// `java.io.tmpdir`-equivalent: the project's system root. Temp-dir
    /// cleanup only ever deletes files under this path.
    pub system_root: PathBuf,
}

fn default_parallel_enabled() -> bool {
    true
}

impl BuildConfig {
    pub fn new(system_root: impl Into<PathBuf>) -> Self {
        Self {
            parallel_enabled: true,
            max_threads: None,
            generate_classpath_index: false,
            system_root: system_root.into(),
        }
    }

    /// `MAX_BUILDER_THREADS = max(1, min(6, CPU-1))`, overridable via
    /// `max_threads`.
    pub fn worker_thread_count(&self) -> usize {
        if let Some(n) = self.max_threads {
            return n.max(1);
        }
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        1.max(6.min(cpus.saturating_sub(1).max(1)))
    }

    /// Effective pool size after folding in `parallel_enabled`: `1` means
    /// the scheduler must fall back to sequential execution.
    pub fn effective_thread_count(&self) -> usize {
        if self.parallel_enabled {
            self.worker_thread_count()
        } else {
            1
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
