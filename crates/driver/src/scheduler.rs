// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parallel Scheduler (§4.5, §5): dispatches chunk builds over a bounded
//! worker pool drawn from `std::thread`, or falls back to sequential
//! execution when parallelism is disabled or the pool would only have one
//! worker. No cooperative async machinery: threads block on a work queue
//! condvar and a countdown condvar, with bounded (500 ms) polling so
//! cancellation is observed promptly without busy-waiting.

use crate::chunk_graph::ChunkGraph;
use crate::error::BuildError;
use kiln_core::chunk::TargetChunk;
use kiln_core::context::CancelToken;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{error, warn};

const QUEUE_POLL: Duration = Duration::from_millis(500);

/// Runs every chunk in `graph` to completion, parallelizing across
/// independent chunks when `thread_count > 1`.
///
/// `build` runs the chunk's pipeline (Chunk Runner); `finalize` performs
/// the per-chunk close-out (§4.7: compilation start stamp, storage close,
/// non-final flush) and always runs, even for a chunk whose build step was
/// skipped because an earlier chunk already failed. The first error
/// observed, from either callback, across any chunk is returned; later
/// errors are logged and dropped (first writer wins, per §5's
/// `firstException` CAS).
pub fn run<B, F>(
    graph: ChunkGraph,
    thread_count: usize,
    cancel: &CancelToken,
    build: B,
    finalize: F,
) -> Result<(), BuildError>
where
    B: Fn(usize, &TargetChunk) -> Result<(), BuildError> + Sync,
    F: Fn(usize, &TargetChunk) -> Result<(), BuildError> + Sync,
{
    if graph.is_empty() {
        return Ok(());
    }
    if thread_count <= 1 {
        return run_sequential(&graph, &build, &finalize);
    }
    run_parallel(graph, thread_count, cancel, &build, &finalize)
}

fn run_sequential<B, F>(graph: &ChunkGraph, build: &B, finalize: &F) -> Result<(), BuildError>
where
    B: Fn(usize, &TargetChunk) -> Result<(), BuildError>,
    F: Fn(usize, &TargetChunk) -> Result<(), BuildError>,
{
    let mut first_error = None;
    for i in 0..graph.len() {
        let chunk = &graph.task(i).chunk;
        if first_error.is_none() {
            if let Err(err) = build(i, chunk) {
                warn!(chunk = %chunk.presentable_name(), error = %err, "chunk build failed");
                first_error = Some(err);
            }
        }
        if let Err(err) = finalize(i, chunk) {
            warn!(chunk = %chunk.presentable_name(), error = %err, "chunk finalize failed");
            first_error.get_or_insert(err);
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct Shared {
    graph: Mutex<ChunkGraph>,
    queue: Mutex<VecDeque<usize>>,
    queue_cv: Condvar,
    remaining: Mutex<usize>,
    done_cv: Condvar,
    first_error: Mutex<Option<BuildError>>,
}

fn run_parallel<B, F>(
    graph: ChunkGraph,
    thread_count: usize,
    cancel: &CancelToken,
    build: &B,
    finalize: &F,
) -> Result<(), BuildError>
where
    B: Fn(usize, &TargetChunk) -> Result<(), BuildError> + Sync,
    F: Fn(usize, &TargetChunk) -> Result<(), BuildError> + Sync,
{
    let total = graph.len();
    let initially_ready = graph.initially_ready();

    let shared = Shared {
        graph: Mutex::new(graph),
        queue: Mutex::new(initially_ready.into_iter().collect()),
        queue_cv: Condvar::new(),
        remaining: Mutex::new(total),
        done_cv: Condvar::new(),
        first_error: Mutex::new(None),
    };

    std::thread::scope(|scope| {
        for _ in 0..thread_count {
            scope.spawn(|| worker_loop(&shared, build, finalize));
        }

        let mut remaining = shared.remaining.lock();
        while *remaining > 0 {
            if cancel.is_canceled() && shared.first_error.lock().is_none() {
                // Already-dispatched chunks observe cancellation themselves
                // at their next poll; we just stop blocking the caller.
                break;
            }
            shared.done_cv.wait_for(&mut remaining, QUEUE_POLL);
        }
    });

    match shared.first_error.into_inner() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn worker_loop<B, F>(shared: &Shared, build: &B, finalize: &F)
where
    B: Fn(usize, &TargetChunk) -> Result<(), BuildError>,
    F: Fn(usize, &TargetChunk) -> Result<(), BuildError>,
{
    loop {
        let task_index = match next_task(shared) {
            Some(i) => i,
            None => return,
        };

        let chunk = shared.graph.lock().task(task_index).chunk.clone();

        if shared.first_error.lock().is_none() {
            if let Err(err) = build(task_index, &chunk) {
                error!(chunk = %chunk.presentable_name(), error = %err, "chunk build failed");
                shared.first_error.lock().get_or_insert(err);
            }
        }

        if let Err(err) = finalize(task_index, &chunk) {
            error!(chunk = %chunk.presentable_name(), error = %err, "chunk finalize failed");
            shared.first_error.lock().get_or_insert(err);
        }

        let newly_ready = {
            let mut graph = shared.graph.lock();
            match graph.mark_finished(task_index) {
                Ok(ready) => ready,
                Err(err) => {
                    error!(chunk = %chunk.presentable_name(), error = %err, "chunk graph bookkeeping error");
                    Vec::new()
                }
            }
        };

        {
            let mut queue = shared.queue.lock();
            queue.extend(newly_ready);
        }
        shared.queue_cv.notify_all();

        let mut remaining = shared.remaining.lock();
        *remaining -= 1;
        if *remaining == 0 {
            shared.done_cv.notify_all();
        }
    }
}

/// Blocks for the next ready task index, or returns `None` once every task
/// has finished (`remaining == 0`) and the queue is empty, meaning this
/// worker has no more work to do this invocation.
fn next_task(shared: &Shared) -> Option<usize> {
    let mut queue = shared.queue.lock();
    loop {
        if let Some(index) = queue.pop_front() {
            return Some(index);
        }
        if *shared.remaining.lock() == 0 {
            return None;
        }
        shared.queue_cv.wait_for(&mut queue, QUEUE_POLL);
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
