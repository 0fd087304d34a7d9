// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builder traits, exit codes, and categories (§3, §6).
//!
//! Builders are the pluggable transformation logic the driver composes —
//! their actual transformation behavior is out of scope (§1 Non-goals);
//! this module only defines the seam the driver calls through.

use crate::chunk::TargetChunk;
use crate::context::BuildContextApi;
use crate::target::{Target, TargetId};
use std::path::PathBuf;
use thiserror::Error;

/// Errors a builder may raise from `build`. Anything not matching a more
/// specific variant is an *other build exception* (§4.1, §7).
#[derive(Debug, Error, Clone)]
pub enum BuilderError {
    #[error("{0}")]
    Message(String),
}

impl BuilderError {
    pub fn new(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }
}

/// Outcome of one `build()` invocation (§3, §4.6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderExitCode {
    Ok,
    Abort,
    NothingDone,
    AdditionalPassRequired,
    ChunkRebuildRequired,
}

impl BuilderExitCode {
    pub fn is_nothing_done(self) -> bool {
        matches!(self, BuilderExitCode::NothingDone)
    }
}

/// Declared order in which module-level builder categories run within a
/// round (§3, §4.6.1). Declaration order is build order: `derive(Ord)` on
/// a fieldless enum orders by discriminant, which tracks declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuilderCategory {
    SourceGenerator,
    Translator,
    Instrumenter,
    ClassPostProcessor,
    Packager,
}

impl BuilderCategory {
    pub const ALL: [BuilderCategory; 5] = [
        BuilderCategory::SourceGenerator,
        BuilderCategory::Translator,
        BuilderCategory::Instrumenter,
        BuilderCategory::ClassPostProcessor,
        BuilderCategory::Packager,
    ];
}

/// Gives module-level builders read access to the dirty files of the
/// chunk's targets, without exposing the whole dirty-state store.
pub trait DirtyFilesHolder: Send + Sync {
    fn dirty_files(&self, target: &TargetId) -> Vec<PathBuf>;
}

/// Accumulates a module-level build round's produced outputs and pending
/// file-generated events (the "output consumer," per the glossary).
#[derive(Debug, Default)]
pub struct OutputConsumer {
    produced: Vec<(PathBuf, PathBuf)>,
    instrumented_classes: Vec<PathBuf>,
    pending_events: Vec<PathBuf>,
}

impl OutputConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_output(&mut self, source: PathBuf, output: PathBuf) {
        self.pending_events.push(output.clone());
        self.produced.push((source, output));
    }

    pub fn register_instrumented_class(&mut self, path: PathBuf) {
        self.instrumented_classes.push(path);
    }

    pub fn produced(&self) -> &[(PathBuf, PathBuf)] {
        &self.produced
    }

    /// Persists (drains) instrumented classes so `CLASS_POST_PROCESSOR`
    /// builders see them, per §4.6.1 step c.
    pub fn take_instrumented_classes(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.instrumented_classes)
    }

    pub fn take_pending_events(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn clear(&mut self) {
        self.produced.clear();
        self.instrumented_classes.clear();
        self.pending_events.clear();
    }
}

/// A single-target, single-pass builder.
pub trait TargetBuilder: Send + Sync {
    fn presentable_name(&self) -> &str;
    fn build_started(&self, _ctx: &dyn BuildContextApi) {}
    fn build_finished(&self, _ctx: &dyn BuildContextApi) {}

    fn build_target(
        &self,
        ctx: &dyn BuildContextApi,
        target: &Target,
    ) -> Result<BuilderExitCode, BuilderError>;
}

/// A builder that runs per multi-target module chunk and may request
/// additional passes or a full chunk rebuild (§4.6.1).
pub trait ModuleLevelBuilder: Send + Sync {
    fn presentable_name(&self) -> &str;
    fn category(&self) -> BuilderCategory;

    fn build_started(&self, _ctx: &dyn BuildContextApi) {}
    fn build_finished(&self, _ctx: &dyn BuildContextApi) {}
    fn chunk_build_started(&self, _ctx: &dyn BuildContextApi, _chunk: &TargetChunk) {}
    fn chunk_build_finished(&self, _ctx: &dyn BuildContextApi, _chunk: &TargetChunk) {}

    fn build(
        &self,
        ctx: &dyn BuildContextApi,
        chunk: &TargetChunk,
        dirty: &dyn DirtyFilesHolder,
        output: &mut OutputConsumer,
    ) -> Result<BuilderExitCode, BuilderError>;
}

/// A before/after task run once per invocation around `buildChunks`.
pub trait LifecycleTask: Send + Sync {
    fn name(&self) -> &str;
    fn run(&self, ctx: &dyn BuildContextApi) -> Result<(), BuilderError>;
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
