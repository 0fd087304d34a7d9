// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `TargetIndex` (§6): holds a fixed target list and derives
//! strongly-connected chunks from their dependency edges via Tarjan's
//! algorithm, so cyclic module-based targets land in one chunk.

use kiln_core::chunk::TargetChunk;
use kiln_core::collaborators::TargetIndex;
use kiln_core::target::{Target, TargetId};
use std::collections::HashMap;

/// `TargetIndex` over a fixed, in-process list of targets. Typical of a
/// demonstration front-end that has already resolved its project model;
/// a real embedding would instead derive this from a project file.
pub struct InMemoryTargetIndex {
    targets: Vec<Target>,
}

impl InMemoryTargetIndex {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }
}

impl TargetIndex for InMemoryTargetIndex {
    fn all_targets(&self) -> Vec<Target> {
        self.targets.clone()
    }

    fn sorted_target_chunks(&self) -> Vec<TargetChunk> {
        tarjan_scc(&self.targets)
            .into_iter()
            .map(|ids| {
                let members = ids
                    .into_iter()
                    .filter_map(|id| self.targets.iter().find(|t| t.id == id).cloned())
                    .collect();
                TargetChunk::new(members)
            })
            .collect()
    }

    fn dependencies(&self, target: &TargetId) -> Vec<TargetId> {
        self.targets
            .iter()
            .find(|t| &t.id == target)
            .map(|t| t.dependencies.clone())
            .unwrap_or_default()
    }
}

/// Tarjan's strongly-connected-components algorithm over the targets'
/// dependency edges. Returns components in reverse-postorder, which is
/// topological for the condensation graph (prerequisites first); callers
/// that only need the grouping (like `ChunkGraph::build`) don't rely on
/// this order, but it's a natural byproduct of the algorithm.
fn tarjan_scc(targets: &[Target]) -> Vec<Vec<TargetId>> {
    struct State<'a> {
        targets: &'a [Target],
        index_of: HashMap<TargetId, usize>,
        lowlink: HashMap<TargetId, usize>,
        on_stack: HashMap<TargetId, bool>,
        stack: Vec<TargetId>,
        next_index: usize,
        components: Vec<Vec<TargetId>>,
    }

    impl<'a> State<'a> {
        fn visit(&mut self, id: &TargetId) {
            self.index_of.insert(id.clone(), self.next_index);
            self.lowlink.insert(id.clone(), self.next_index);
            self.next_index += 1;
            self.stack.push(id.clone());
            self.on_stack.insert(id.clone(), true);

            let deps = self
                .targets
                .iter()
                .find(|t| &t.id == id)
                .map(|t| t.dependencies.clone())
                .unwrap_or_default();

            for dep in &deps {
                if !self.index_of.contains_key(dep) {
                    self.visit(dep);
                    let dep_low = self.lowlink[dep];
                    let cur_low = self.lowlink[id];
                    self.lowlink.insert(id.clone(), cur_low.min(dep_low));
                } else if *self.on_stack.get(dep).unwrap_or(&false) {
                    let dep_index = self.index_of[dep];
                    let cur_low = self.lowlink[id];
                    self.lowlink.insert(id.clone(), cur_low.min(dep_index));
                }
            }

            if self.lowlink[id] == self.index_of[id] {
                let mut component = Vec::new();
                while let Some(member) = self.stack.pop() {
                    self.on_stack.insert(member.clone(), false);
                    let is_root = member == *id;
                    component.push(member);
                    if is_root {
                        break;
                    }
                }
                self.components.push(component);
            }
        }
    }

    let mut state = State {
        targets,
        index_of: HashMap::new(),
        lowlink: HashMap::new(),
        on_stack: HashMap::new(),
        stack: Vec::new(),
        next_index: 0,
        components: Vec::new(),
    };

    for target in targets {
        if !state.index_of.contains_key(&target.id) {
            state.visit(&target.id);
        }
    }

    state.components
}

#[cfg(test)]
#[path = "target_index_tests.rs"]
mod tests;
