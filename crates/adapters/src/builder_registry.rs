// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `StaticBuilderRegistry` (§6): a fixed list of builders and lifecycle
//! tasks assembled once at startup. Also hosts the no-op demo builders the
//! CLI front-end wires up to exercise the pipeline end to end; they never
//! touch a source file, since defining builders' transformation logic is
//! out of scope here.

use kiln_core::builder::{
    BuilderCategory, BuilderError, BuilderExitCode, DirtyFilesHolder, LifecycleTask,
    ModuleLevelBuilder, OutputConsumer, TargetBuilder,
};
use kiln_core::chunk::TargetChunk;
use kiln_core::collaborators::BuilderRegistry;
use kiln_core::context::BuildContextApi;
use kiln_core::target::Target;
use std::sync::Arc;

pub struct StaticBuilderRegistry {
    target_builders: Vec<Arc<dyn TargetBuilder>>,
    module_level_builders: Vec<Arc<dyn ModuleLevelBuilder>>,
    before_tasks: Vec<Arc<dyn LifecycleTask>>,
    after_tasks: Vec<Arc<dyn LifecycleTask>>,
}

impl StaticBuilderRegistry {
    pub fn new(
        target_builders: Vec<Arc<dyn TargetBuilder>>,
        module_level_builders: Vec<Arc<dyn ModuleLevelBuilder>>,
        before_tasks: Vec<Arc<dyn LifecycleTask>>,
        after_tasks: Vec<Arc<dyn LifecycleTask>>,
    ) -> Self {
        Self {
            target_builders,
            module_level_builders,
            before_tasks,
            after_tasks,
        }
    }

    /// A registry with a single no-op target builder and a single no-op
    /// module-level builder, and no lifecycle tasks. Enough to drive the
    /// pipeline end to end without any real transformation logic.
    pub fn demo() -> Self {
        Self::new(
            vec![Arc::new(NoOpTargetBuilder)],
            vec![Arc::new(NoOpModuleLevelBuilder)],
            Vec::new(),
            Vec::new(),
        )
    }
}

impl BuilderRegistry for StaticBuilderRegistry {
    fn target_builders(&self) -> Vec<Arc<dyn TargetBuilder>> {
        self.target_builders.clone()
    }

    fn module_level_builders(&self) -> Vec<Arc<dyn ModuleLevelBuilder>> {
        self.module_level_builders.clone()
    }

    fn before_tasks(&self) -> Vec<Arc<dyn LifecycleTask>> {
        self.before_tasks.clone()
    }

    fn after_tasks(&self) -> Vec<Arc<dyn LifecycleTask>> {
        self.after_tasks.clone()
    }
}

/// Always reports nothing to do. Stands in for a target-level builder
/// (source generators, packagers) in a demo pipeline.
pub struct NoOpTargetBuilder;

impl TargetBuilder for NoOpTargetBuilder {
    fn presentable_name(&self) -> &str {
        "noop target builder"
    }

    fn build_target(
        &self,
        _ctx: &dyn BuildContextApi,
        _target: &Target,
    ) -> Result<BuilderExitCode, BuilderError> {
        Ok(BuilderExitCode::NothingDone)
    }
}

/// Always reports nothing to do. Stands in for a module-level builder
/// (translators, instrumenters) in a demo pipeline.
pub struct NoOpModuleLevelBuilder;

impl ModuleLevelBuilder for NoOpModuleLevelBuilder {
    fn presentable_name(&self) -> &str {
        "noop module-level builder"
    }

    fn category(&self) -> BuilderCategory {
        BuilderCategory::Translator
    }

    fn build(
        &self,
        _ctx: &dyn BuildContextApi,
        _chunk: &TargetChunk,
        _dirty: &dyn DirtyFilesHolder,
        _output: &mut OutputConsumer,
    ) -> Result<BuilderExitCode, BuilderError> {
        Ok(BuilderExitCode::NothingDone)
    }
}

#[cfg(test)]
#[path = "builder_registry_tests.rs"]
mod tests;
