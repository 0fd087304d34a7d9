// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chunk Runner (§4.6): builds one chunk end to end, dispatching to the
//! single-target-builder path, the module-level builders pipeline
//! (`module_pipeline`), or rejecting an illegal heterogeneous chunk.

mod deleted_paths;
mod module_pipeline;

#[cfg(test)]
mod fakes;

use crate::error::BuildError;
use crate::output_cleaner::OutputCleaner;
use kiln_core::builder::BuilderExitCode;
use kiln_core::chunk::TargetChunk;
use kiln_core::collaborators::{BuildRootIndex, BuilderRegistry};
use kiln_core::context::{BuildContextApi, WrappedContext};
use kiln_core::message::{BuildMessage, CompilerMessage, TargetProgressPhase};
use kiln_core::registries::{ClearedOutputRegistry, RemovedSources};
use kiln_core::store_traits::{DataManager, DirtyStateStore};
use tracing::instrument;

/// The collaborators a chunk build needs, bundled so call sites don't thread
/// four parameters through every function.
pub struct ChunkCollaborators<'a> {
    pub dirty_state: &'a dyn DirtyStateStore,
    pub data_manager: &'a dyn DataManager,
    pub builders: &'a dyn BuilderRegistry,
    pub cleared_outputs: &'a ClearedOutputRegistry,
    pub build_root_index: &'a dyn BuildRootIndex,
}

/// Runs one chunk's build pipeline (§4.6). Always clears round/chunk scratch
/// and emits the finished progress event, even on failure; only marks the
/// chunk up to date when the pipeline actually succeeded.
#[instrument(skip_all, fields(chunk = %chunk.presentable_name()))]
pub fn run_chunk(
    ctx: &WrappedContext,
    chunk: &TargetChunk,
    deps: &ChunkCollaborators,
    removed_sources: &RemovedSources,
) -> Result<(), BuildError> {
    let target_ids: Vec<_> = chunk.target_ids().cloned().collect();
    ctx.publish(BuildMessage::TargetProgress {
        targets: target_ids.clone(),
        phase: TargetProgressPhase::Started,
    });
    ctx.clear_errors_detected();

    let result = run_pipeline(ctx, chunk, deps, removed_sources);

    deps.dirty_state.clear_round_data(chunk);
    deps.dirty_state.clear_chunk_data(chunk);
    if result.is_ok() {
        deps.dirty_state.mark_up_to_date(chunk);
    }

    deps.build_root_index.clear_temp_roots();

    ctx.publish(BuildMessage::TargetProgress {
        targets: target_ids,
        phase: TargetProgressPhase::Finished,
    });

    result
}

fn run_pipeline(
    ctx: &WrappedContext,
    chunk: &TargetChunk,
    deps: &ChunkCollaborators,
    removed_sources: &RemovedSources,
) -> Result<(), BuildError> {
    ctx.check_canceled()?;

    deleted_paths::process(ctx, chunk, deps, removed_sources)?;
    deps.dirty_state.before_chunk_build_start(chunk);

    let illegal = chunk.illegal_non_module_members();
    if !illegal.is_empty() {
        for target in &illegal {
            ctx.publish(BuildMessage::Compiler(CompilerMessage::error(
                "chunk-runner",
                format!(
                    "target {} cannot be grouped into a multi-target chunk: not module-based",
                    target.name
                ),
            )));
        }
        return Ok(());
    }

    if chunk.is_singleton_non_module() {
        run_single_target(ctx, chunk, deps)
    } else if chunk.is_all_module_based() {
        module_pipeline::run(ctx, chunk, deps, removed_sources)
    } else {
        Ok(())
    }
}

/// §4.6 single non-module target path: clean outputs for changed (not
/// deleted) sources unless the target is forced, then run every registered
/// target builder in order.
fn run_single_target(
    ctx: &WrappedContext,
    chunk: &TargetChunk,
    deps: &ChunkCollaborators,
) -> Result<(), BuildError> {
    let target = &chunk.targets[0];

    if !ctx.scope().is_forced(&target.id) {
        let source_to_output = deps.data_manager.source_to_output_map(&target.id);
        OutputCleaner::selective_clean(ctx, target, source_to_output.as_ref(), deps.cleared_outputs)?;
    }

    let builders = deps.builders.target_builders();
    let builder_count = builders.len().max(1) as f64;

    for builder in &builders {
        ctx.check_canceled()?;
        builder.build_started(ctx);
        let outcome = builder.build_target(ctx, target);
        builder.build_finished(ctx);

        match outcome {
            Ok(BuilderExitCode::Abort) => {
                return Err(BuildError::StopBuild {
                    builder: builder.presentable_name().to_string(),
                    message: "builder requested abort".to_string(),
                });
            }
            Ok(BuilderExitCode::Ok) => ctx.publish(BuildMessage::DoneSomething),
            Ok(_) => {}
            Err(err) => return Err(BuildError::Builder(err)),
        }

        ctx.set_done(ctx.done() + 1.0 / builder_count);
    }

    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
