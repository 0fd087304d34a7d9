// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chunk Graph (§4.4): a DAG of `ChunkTask`s derived from the target
//! index's topologically sorted chunk list and target-level dependency
//! edges. Arena-allocated with integer indices (§9 design notes) since the
//! graph is acyclic by construction (targets are SCC-contracted into
//! chunks upstream, by `TargetIndex::sorted_target_chunks`).

use kiln_core::chunk::TargetChunk;
use kiln_core::collaborators::TargetIndex;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkGraphError {
    #[error("markFinished called on an already-finished task {0}")]
    AlreadyFinished(usize),
    #[error("dependency edge from chunk {0} to {1} was missing during markFinished")]
    MissingEdge(usize, usize),
}

/// One node of the chunk DAG. `remaining_deps` counts down to zero as
/// prerequisite chunks finish; `dependents` lists the tasks waiting on this
/// one, by arena index.
#[derive(Debug)]
pub struct ChunkTask {
    pub chunk: TargetChunk,
    pub dependents: Vec<usize>,
    remaining_deps: usize,
    finished: bool,
}

impl ChunkTask {
    pub fn is_ready(&self) -> bool {
        self.remaining_deps == 0
    }
}

/// The chunk DAG, plus bookkeeping to release dependents as chunks finish.
pub struct ChunkGraph {
    tasks: Vec<ChunkTask>,
}

impl ChunkGraph {
    /// Builds the graph from the target index's topologically sorted chunk
    /// list: for each target in a chunk, for each of its dependency
    /// targets, if the dependency's owning chunk differs, records a
    /// dependency edge. Self-edges (dependencies within the same chunk)
    /// are ignored.
    pub fn build(index: &dyn TargetIndex) -> Self {
        let chunks = index.sorted_target_chunks();

        let mut chunk_of_target = HashMap::new();
        for (i, chunk) in chunks.iter().enumerate() {
            for id in chunk.target_ids() {
                chunk_of_target.insert(id.clone(), i);
            }
        }

        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); chunks.len()];
        let mut remaining_deps = vec![0usize; chunks.len()];

        for (i, chunk) in chunks.iter().enumerate() {
            let mut seen_deps = std::collections::HashSet::new();
            for target in &chunk.targets {
                for dep in index.dependencies(&target.id) {
                    let Some(&dep_chunk) = chunk_of_target.get(&dep) else {
                        continue;
                    };
                    if dep_chunk == i {
                        continue;
                    }
                    if seen_deps.insert(dep_chunk) {
                        dependents[dep_chunk].push(i);
                        remaining_deps[i] += 1;
                    }
                }
            }
        }

        let tasks = chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| ChunkTask {
                chunk,
                dependents: std::mem::take(&mut dependents[i]),
                remaining_deps: remaining_deps[i],
                finished: false,
            })
            .collect();

        Self { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, index: usize) -> &ChunkTask {
        &self.tasks[index]
    }

    /// Indices of every task that is ready to run right now.
    pub fn initially_ready(&self) -> Vec<usize> {
        (0..self.tasks.len())
            .filter(|&i| self.tasks[i].is_ready())
            .collect()
    }

    /// Marks `index` finished; decrements `remaining_deps` on each of its
    /// dependents and returns those that newly became ready. A missing
    /// edge (a dependent whose `remaining_deps` was already zero) is a
    /// programmer error in the graph construction, not a runtime race, and
    /// is reported rather than silently ignored.
    pub fn mark_finished(&mut self, index: usize) -> Result<Vec<usize>, ChunkGraphError> {
        if self.tasks[index].finished {
            return Err(ChunkGraphError::AlreadyFinished(index));
        }
        self.tasks[index].finished = true;

        let dependents = self.tasks[index].dependents.clone();
        let mut newly_ready = Vec::new();
        for dep_index in dependents {
            let task = &mut self.tasks[dep_index];
            if task.remaining_deps == 0 {
                return Err(ChunkGraphError::MissingEdge(index, dep_index));
            }
            task.remaining_deps -= 1;
            if task.remaining_deps == 0 {
                newly_ready.push(dep_index);
            }
        }
        Ok(newly_ready)
    }
}

#[cfg(test)]
#[path = "chunk_graph_tests.rs"]
mod tests;
