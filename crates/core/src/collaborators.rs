// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External collaborators (§6): interfaces the driver consumes but does not
//! implement. Concrete, swappable implementations — real or fake — live in
//! `kiln-adapters`.

use crate::builder::{LifecycleTask, ModuleLevelBuilder, TargetBuilder};
use crate::builder::BuilderCategory;
use crate::chunk::TargetChunk;
use crate::target::{SourceRoot, Target, TargetId};
use std::path::Path;
use std::sync::Arc;

/// The target dependency graph: every target, and the topologically sorted
/// chunk (SCC) decomposition the chunk graph builds on (§4.4).
pub trait TargetIndex: Send + Sync {
    fn all_targets(&self) -> Vec<Target>;

    /// Predecessors first. The chunk graph derives its dependency edges
    /// from target-level `dependencies(...)` crossing chunk boundaries.
    fn sorted_target_chunks(&self) -> Vec<TargetChunk>;

    fn dependencies(&self, target: &TargetId) -> Vec<TargetId>;
}

/// Source-root bookkeeping external to the driver (VFS/indexing concerns,
/// §1 Non-goals).
pub trait BuildRootIndex: Send + Sync {
    fn target_roots(&self, target: &TargetId) -> Vec<SourceRoot>;

    /// Clears any temporary source roots created for a prior chunk build
    /// (§4.6 step 7).
    fn clear_temp_roots(&self);
}

/// Reports whether a file is part of a module's tracked content, and
/// whether it is excluded from compilation (used by the output cleaner's
/// overlap check, §4.3).
pub trait ModuleExcludeIndex: Send + Sync {
    fn is_in_content(&self, file: &Path) -> bool;
    fn is_excluded(&self, file: &Path) -> bool;
}

/// The set of registered builders, grouped by category, plus the
/// before/after lifecycle tasks (§4.1 steps 5, 7).
pub trait BuilderRegistry: Send + Sync {
    fn target_builders(&self) -> Vec<Arc<dyn TargetBuilder>>;
    fn module_level_builders(&self) -> Vec<Arc<dyn ModuleLevelBuilder>>;

    fn builders(&self, category: BuilderCategory) -> Vec<Arc<dyn ModuleLevelBuilder>> {
        self.module_level_builders()
            .into_iter()
            .filter(|b| b.category() == category)
            .collect()
    }

    fn before_tasks(&self) -> Vec<Arc<dyn LifecycleTask>>;
    fn after_tasks(&self) -> Vec<Arc<dyn LifecycleTask>>;

    fn module_level_builder_count(&self) -> usize {
        self.module_level_builders().len()
    }
}

/// OS-level low-memory notification, external to the driver (§4.1 step 1).
/// The driver registers a callback that flushes persistent stores; it
/// never polls memory pressure itself.
pub trait LowMemoryWatcher: Send + Sync {
    fn register(&self, callback: Arc<dyn Fn() + Send + Sync>);
}

/// IPC with an external compiler helper process, out of scope for this
/// crate (§1 Non-goals) beyond the shutdown handshake the Lifecycle
/// Coordinator performs on every exit path.
pub trait ExternalCompilerHelper: Send + Sync {
    /// Requests a graceful shutdown, waiting up to `grace`. Returns
    /// whether the helper acknowledged in time.
    fn shutdown(&self, grace: std::time::Duration) -> bool;
    fn terminate(&self);
}
