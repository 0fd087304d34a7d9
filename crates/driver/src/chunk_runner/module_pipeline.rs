// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module-level builders pipeline (§4.6.1): the multi-pass loop that runs a
//! module-based chunk's builders in declared category order, honoring
//! additional-pass and chunk-rebuild requests.

use super::{deleted_paths, ChunkCollaborators};
use crate::error::BuildError;
use kiln_core::builder::{BuilderCategory, BuilderExitCode, DirtyFilesHolder, OutputConsumer};
use kiln_core::chunk::TargetChunk;
use kiln_core::context::{BuildContextApi, WrappedContext};
use kiln_core::message::BuildMessage;
use kiln_core::registries::RemovedSources;
use kiln_core::store_traits::DirtyStateStore;
use kiln_core::target::TargetId;
use std::path::PathBuf;

struct StoreBackedDirtyFiles<'a> {
    store: &'a dyn DirtyStateStore,
}

impl DirtyFilesHolder for StoreBackedDirtyFiles<'_> {
    fn dirty_files(&self, target: &TargetId) -> Vec<PathBuf> {
        self.store
            .sources_to_recompile(target)
            .into_iter()
            .flat_map(|(_, files)| files)
            .collect()
    }
}

pub fn run(
    ctx: &WrappedContext,
    chunk: &TargetChunk,
    deps: &ChunkCollaborators,
    removed_sources: &RemovedSources,
) -> Result<(), BuildError> {
    let modules_in_chunk = chunk.targets.len().max(1) as f64;
    let total_builder_count = deps.builders.module_level_builder_count().max(1) as f64;

    let mut forced_recompile_all = chunk.targets.iter().any(|t| ctx.scope().is_forced(&t.id));
    let mut chunk_rebuild_used = false;
    let mut output = OutputConsumer::new();
    let mut stage_count = total_builder_count;
    let initial_done = ctx.done();
    let mut done_acc = initial_done;

    for category in BuilderCategory::ALL {
        for builder in deps.builders.builders(category) {
            builder.chunk_build_started(ctx, chunk);
        }
    }

    'outer: loop {
        ctx.check_canceled()?;
        deps.dirty_state.before_next_round_start(chunk);

        if !forced_recompile_all {
            clean_outputs_for_changed_files(chunk, deps)?;
        }

        let mut additional_pass_requested = false;

        for category in BuilderCategory::ALL {
            if category == BuilderCategory::ClassPostProcessor {
                // Persist whatever the previous categories instrumented so
                // post-processors can see it.
                output.take_instrumented_classes();
            }

            for builder in deps.builders.builders(category) {
                deleted_paths::process(ctx, chunk, deps, removed_sources)?;

                let dirty = StoreBackedDirtyFiles {
                    store: deps.dirty_state,
                };
                let outcome = builder.build(ctx, chunk, &dirty, &mut output);

                match outcome {
                    Ok(BuilderExitCode::NothingDone) => {}
                    Ok(BuilderExitCode::Ok) => ctx.publish(BuildMessage::DoneSomething),
                    Ok(BuilderExitCode::Abort) => {
                        return Err(BuildError::StopBuild {
                            builder: builder.presentable_name().to_string(),
                            message: "builder requested abort".to_string(),
                        });
                    }
                    Ok(BuilderExitCode::AdditionalPassRequired) => {
                        if !additional_pass_requested {
                            stage_count += total_builder_count;
                            additional_pass_requested = true;
                        }
                    }
                    Ok(BuilderExitCode::ChunkRebuildRequired) => {
                        if !chunk_rebuild_used && !forced_recompile_all {
                            chunk_rebuild_used = true;
                            forced_recompile_all = true;
                            deps.dirty_state.clear_round_data(chunk);
                            for target in &chunk.targets {
                                let roots: Vec<PathBuf> =
                                    target.source_roots.iter().map(|r| r.path.clone()).collect();
                                deps.dirty_state.mark_all_dirty(&target.id, &roots);
                            }
                            output.clear();
                            stage_count = total_builder_count;
                            done_acc = initial_done;
                            ctx.set_done(done_acc);
                            continue 'outer;
                        }
                    }
                    Err(err) => return Err(BuildError::Builder(err)),
                }

                ctx.check_canceled()?;

                done_acc += modules_in_chunk / stage_count;
                ctx.set_done(done_acc);
            }
        }

        if !additional_pass_requested {
            break;
        }
    }

    output.take_instrumented_classes();
    let generated = output.take_pending_events();
    if !generated.is_empty() {
        ctx.publish(BuildMessage::FileGenerated(generated));
    }
    output.clear();

    for category in BuilderCategory::ALL {
        for builder in deps.builders.builders(category) {
            builder.chunk_build_finished(ctx, chunk);
        }
    }

    Ok(())
}

/// §4.6.1 step b: for every target not in forced-recompile-all mode, delete
/// the stale outputs of its currently dirty (changed, not deleted) sources
/// and clear their source↔output map entries, so the upcoming builder pass
/// re-emits them fresh.
fn clean_outputs_for_changed_files(
    chunk: &TargetChunk,
    deps: &ChunkCollaborators,
) -> Result<(), BuildError> {
    for target in &chunk.targets {
        let source_to_output = deps.data_manager.source_to_output_map(&target.id);
        for (_, files) in deps.dirty_state.sources_to_recompile(&target.id) {
            for file in files {
                for output in source_to_output.outputs(&file) {
                    remove_stale_output(&output)?;
                }
                source_to_output.remove_source(&file);
            }
        }
    }
    Ok(())
}

fn remove_stale_output(path: &std::path::Path) -> Result<(), BuildError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BuildError::Io(e)),
    }
}

#[cfg(test)]
#[path = "module_pipeline_tests.rs"]
mod tests;
