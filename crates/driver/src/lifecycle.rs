// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle Coordinator (§4.1): the top-level `build` entry point. Wires
//! together the output cleaner, chunk graph, and scheduler, and guarantees
//! the finalize path — builder `buildFinished`, store flushes, external
//! compiler-helper shutdown, async-task drain — runs on every exit, success
//! or failure.

use crate::chunk_graph::ChunkGraph;
use crate::chunk_runner::{self, ChunkCollaborators};
use crate::error::{BuildError, BuildOutcome};
use crate::output_cleaner::OutputCleaner;
use crate::scheduler;
use kiln_core::collaborators::{
    BuildRootIndex, BuilderRegistry, ExternalCompilerHelper, LowMemoryWatcher, ModuleExcludeIndex,
    TargetIndex,
};
use kiln_core::config::BuildConfig;
use kiln_core::context::{BuildContext, BuildContextApi, CancelToken, WrappedContext};
use kiln_core::message::{BuildMessage, CompilerMessage, MessageBus};
use kiln_core::scope::Scope;
use kiln_core::store_traits::{DataManager, DirtyStateStore, TimestampStorage};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

const HELPER_SHUTDOWN_GRACE: Duration = Duration::from_millis(500);
const ASYNC_TASK_POLL: Duration = Duration::from_millis(500);

/// The collaborators a `build` invocation needs, held for the coordinator's
/// own lifetime and shared with every concurrently building chunk via
/// `Arc`, since the low-memory hook may outlive any single invocation.
pub struct LifecycleCoordinator {
    pub target_index: Arc<dyn TargetIndex>,
    pub build_root_index: Arc<dyn BuildRootIndex>,
    pub module_exclude_index: Arc<dyn ModuleExcludeIndex>,
    pub builders: Arc<dyn BuilderRegistry>,
    pub dirty_state: Arc<dyn DirtyStateStore>,
    pub data_manager: Arc<dyn DataManager>,
    pub timestamps: Arc<dyn TimestampStorage>,
    pub low_memory: Option<Arc<dyn LowMemoryWatcher>>,
    pub compiler_helper: Option<Arc<dyn ExternalCompilerHelper>>,
    pub bus: MessageBus,
    pub config: BuildConfig,
}

/// A tracked async task (§9: "replace free-floating futures with a tracked
/// list of join-handles"). The two variants are the only shapes of
/// background work the coordinator ever spawns.
enum AsyncTaskHandle {
    Cleanup(std::thread::JoinHandle<()>),
    LeftoverDeletion(std::thread::JoinHandle<Vec<PathBuf>>),
}

impl AsyncTaskHandle {
    fn is_finished(&self) -> bool {
        match self {
            Self::Cleanup(h) => h.is_finished(),
            Self::LeftoverDeletion(h) => h.is_finished(),
        }
    }

    fn join(self) {
        match self {
            Self::Cleanup(h) => {
                let _ = h.join();
            }
            Self::LeftoverDeletion(h) => match h.join() {
                Ok(failed) if !failed.is_empty() => {
                    warn!(count = failed.len(), "some cleaned outputs could not be deleted asynchronously");
                }
                _ => {}
            },
        }
    }
}

impl LifecycleCoordinator {
    /// Runs one build invocation end to end (§4.1 steps 1-7), then always
    /// runs the finalize path (step 8) before returning, regardless of how
    /// the body exited.
    #[instrument(skip_all)]
    pub fn build(&self, scope: Arc<dyn Scope>, force_clean_caches: bool) -> Result<(), BuildError> {
        if let Some(watcher) = &self.low_memory {
            let data_manager = self.data_manager.clone();
            let timestamps = self.timestamps.clone();
            watcher.register(Arc::new(move || {
                if let Err(err) = data_manager.flush(false) {
                    warn!(error = %err, "low-memory flush failed");
                }
                timestamps.force();
            }));
        }

        let mut async_tasks = vec![AsyncTaskHandle::Cleanup(spawn_temp_cleanup(
            self.config.system_root.clone(),
        ))];

        let root = Arc::new(BuildContext::new(
            scope.clone(),
            self.bus.clone(),
            self.config.clone(),
        ));

        let result = self.run_body(&root, scope.as_ref(), force_clean_caches, &mut async_tasks);
        let result = self.classify_and_report(&root, result);

        self.finalize(&root, async_tasks);

        result
    }

    fn run_body(
        &self,
        ctx: &Arc<BuildContext>,
        scope: &dyn Scope,
        force_clean_caches: bool,
        async_tasks: &mut Vec<AsyncTaskHandle>,
    ) -> Result<(), BuildError> {
        if scope.is_rebuild() || force_clean_caches {
            let targets: Vec<_> = self
                .target_index
                .all_targets()
                .into_iter()
                .filter(|t| scope.affects(&t.id))
                .collect();

            let data_manager = self.data_manager.clone();
            let cleanup = OutputCleaner::whole_project_clean(
                ctx.as_ref(),
                &targets,
                self.module_exclude_index.as_ref(),
                ctx.cleared_outputs(),
                move |target_id| data_manager.source_to_output_map(target_id),
            )?;
            if let Some(cleanup) = cleanup {
                async_tasks.push(AsyncTaskHandle::LeftoverDeletion(cleanup.handle));
            }

            self.timestamps.clean()?;
            self.data_manager.clean()?;
        }

        for task in self.builders.before_tasks() {
            task.run(ctx.as_ref()).map_err(BuildError::Builder)?;
        }

        self.build_chunks(ctx)?;

        for task in self.builders.after_tasks() {
            task.run(ctx.as_ref()).map_err(BuildError::Builder)?;
        }

        Ok(())
    }

    /// §4.7: picks the parallel or sequential executor and runs every
    /// chunk to completion, closing each chunk's per-target storages and
    /// performing a non-final flush in its finalize step.
    fn build_chunks(&self, ctx: &Arc<BuildContext>) -> Result<(), BuildError> {
        let graph = ChunkGraph::build(self.target_index.as_ref());
        let thread_count = self.config.effective_thread_count();
        let cancel = ctx.cancel_token().clone();

        let build = |_index: usize, chunk: &kiln_core::chunk::TargetChunk| -> Result<(), BuildError> {
            let wrapped = WrappedContext::new(ctx.clone());
            let deps = ChunkCollaborators {
                dirty_state: self.dirty_state.as_ref(),
                data_manager: self.data_manager.as_ref(),
                builders: self.builders.as_ref(),
                cleared_outputs: ctx.cleared_outputs(),
                build_root_index: self.build_root_index.as_ref(),
            };
            chunk_runner::run_chunk(&wrapped, chunk, &deps, ctx.removed_sources())
        };

        let finalize = |_index: usize, chunk: &kiln_core::chunk::TargetChunk| -> Result<(), BuildError> {
            for target in &chunk.targets {
                self.timestamps.update_compilation_start_stamp(&target.id);
            }
            self.data_manager
                .close_source_to_output_storages(std::slice::from_ref(chunk))?;
            self.data_manager.flush(false)?;
            Ok(())
        };

        scheduler::run(graph, thread_count, &cancel, build, finalize)
    }

    /// Applies §4.1's failure classification: stop-build becomes a
    /// successful early stop, data corruption is reported and passed
    /// through as the distinct rebuild-requested outcome, and any other
    /// build exception is composed into an ERROR compiler message before
    /// being returned.
    fn classify_and_report(
        &self,
        ctx: &BuildContext,
        result: Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        let err = match result {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };

        match err.classify() {
            BuildOutcome::StopBuild => {
                if let BuildError::StopBuild { message, .. } = &err {
                    ctx.publish(BuildMessage::Progress(message.clone()));
                }
                Ok(())
            }
            BuildOutcome::RebuildRequested => {
                ctx.publish(BuildMessage::Compiler(CompilerMessage::info(
                    "lifecycle-coordinator",
                    format!("persistent store integrity compromised, requesting a rebuild: {err}"),
                )));
                Err(err)
            }
            BuildOutcome::BuildError => {
                ctx.publish(BuildMessage::Compiler(CompilerMessage::error(
                    "lifecycle-coordinator",
                    err.to_string(),
                )));
                Err(err)
            }
            BuildOutcome::Canceled | BuildOutcome::InternalAssertion => Err(err),
        }
    }

    /// §4.1 step 8, run on every exit path: notify builders, flush
    /// persistent state, shut down an attached external compiler helper,
    /// and drain async tasks (honoring cancellation).
    fn finalize(&self, ctx: &BuildContext, async_tasks: Vec<AsyncTaskHandle>) {
        for builder in self.builders.target_builders() {
            builder.build_finished(ctx);
        }
        for builder in self.builders.module_level_builders() {
            builder.build_finished(ctx);
        }

        self.timestamps.force();
        if let Err(err) = self.data_manager.flush(true) {
            warn!(error = %err, "final data manager flush failed");
        }

        if let Some(helper) = &self.compiler_helper {
            if !helper.shutdown(HELPER_SHUTDOWN_GRACE) {
                helper.terminate();
            }
        }

        wait_for_async_tasks(async_tasks, ctx.cancel_token());
    }
}

/// Deletes the immediate children of `system_root` on a background thread.
/// The project's system root is the one temp directory the driver is ever
/// allowed to touch (§4.1 step 2, §6 `java.io.tmpdir`-equivalent).
fn spawn_temp_cleanup(system_root: PathBuf) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let Ok(entries) = std::fs::read_dir(&system_root) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let result = match std::fs::symlink_metadata(&path) {
                Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(&path),
                Ok(_) => std::fs::remove_file(&path),
                Err(_) => continue,
            };
            if let Err(err) = result {
                warn!(path = %path.display(), error = %err, "temp-directory cleanup failed to remove entry");
            }
        }
    })
}

fn wait_for_async_tasks(mut tasks: Vec<AsyncTaskHandle>, cancel: &CancelToken) {
    loop {
        let (finished, pending): (Vec<_>, Vec<_>) =
            tasks.into_iter().partition(AsyncTaskHandle::is_finished);
        for task in finished {
            task.join();
        }
        if pending.is_empty() {
            return;
        }
        if cancel.is_canceled() {
            return;
        }
        std::thread::sleep(ASYNC_TASK_POLL);
        tasks = pending;
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
