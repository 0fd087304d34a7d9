// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build targets: the unit of work the driver schedules and builds.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

crate::define_id! {
    /// Stable identity of a [`Target`], unique within a project.
    pub struct TargetId;
}

/// Distinguishes targets whose builders support being grouped into a
/// multi-target chunk (a strongly-connected component) from targets that
/// must always appear alone in their chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    /// A module-based target: its builders are module-level builders that
    /// can run over a chunk containing several such targets at once.
    ModuleBased,
    /// Any other target kind: always built alone via target builders.
    Other,
}

impl TargetKind {
    pub fn is_module_based(self) -> bool {
        matches!(self, TargetKind::ModuleBased)
    }
}

/// A source root contributing files to a target's build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRoot {
    pub path: PathBuf,
    /// Generated roots are excluded from whole-project source-root overlap
    /// checks (see the output cleaner).
    pub generated: bool,
}

impl SourceRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            generated: false,
        }
    }

    pub fn generated(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            generated: true,
        }
    }

    pub fn contains(&self, file: &Path) -> bool {
        file.starts_with(&self.path)
    }
}

/// A filesystem root a target's builders write outputs into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRoot {
    pub path: PathBuf,
    /// Excluded output roots are always safe to delete wholesale (§4.3).
    pub excluded: bool,
}

impl OutputRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            excluded: false,
        }
    }
}

/// A unit of build work: a presentable name, a set of source/output roots,
/// and a kind discriminator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub name: String,
    pub kind: TargetKind,
    pub source_roots: Vec<SourceRoot>,
    pub output_roots: Vec<OutputRoot>,
    /// Targets this target depends on (edges point toward prerequisites).
    pub dependencies: Vec<TargetId>,
}

impl Target {
    pub fn new(id: impl Into<TargetId>, name: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            source_roots: Vec::new(),
            output_roots: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_source_root(mut self, root: SourceRoot) -> Self {
        self.source_roots.push(root);
        self
    }

    pub fn with_output_root(mut self, root: OutputRoot) -> Self {
        self.output_roots.push(root);
        self
    }

    pub fn with_dependency(mut self, dep: impl Into<TargetId>) -> Self {
        self.dependencies.push(dep.into());
        self
    }

    pub fn is_module_based(&self) -> bool {
        self.kind.is_module_based()
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
