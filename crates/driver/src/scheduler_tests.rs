// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kiln_core::collaborators::TargetIndex;
use kiln_core::target::{Target, TargetId, TargetKind};
use parking_lot::Mutex as PMutex;
use std::collections::HashMap;
use std::sync::Arc;

struct TestIndex {
    chunks: Vec<TargetChunk>,
    deps: HashMap<TargetId, Vec<TargetId>>,
}

impl TargetIndex for TestIndex {
    fn all_targets(&self) -> Vec<Target> {
        self.chunks.iter().flat_map(|c| c.targets.clone()).collect()
    }
    fn sorted_target_chunks(&self) -> Vec<TargetChunk> {
        self.chunks.clone()
    }
    fn dependencies(&self, target: &TargetId) -> Vec<TargetId> {
        self.deps.get(target).cloned().unwrap_or_default()
    }
}

fn singleton(id: &str) -> TargetChunk {
    TargetChunk::new(vec![Target::new(id, id, TargetKind::Other)])
}

#[test]
fn sequential_runs_every_chunk_in_order() {
    let index = TestIndex {
        chunks: vec![singleton("a"), singleton("b"), singleton("c")],
        deps: HashMap::from([
            (TargetId::new("b"), vec![TargetId::new("a")]),
            (TargetId::new("c"), vec![TargetId::new("b")]),
        ]),
    };
    let graph = ChunkGraph::build(&index);
    let cancel = CancelToken::new();

    let order: Arc<PMutex<Vec<String>>> = Arc::new(PMutex::new(Vec::new()));
    let build_order = order.clone();
    let finalize_order = order.clone();

    run(
        graph,
        1,
        &cancel,
        move |_i, chunk| {
            build_order.lock().push(format!("build:{}", chunk.presentable_name()));
            Ok(())
        },
        move |_i, chunk| {
            finalize_order
                .lock()
                .push(format!("finalize:{}", chunk.presentable_name()));
            Ok(())
        },
    )
    .expect("run");

    assert_eq!(
        *order.lock(),
        vec![
            "build:a", "finalize:a", "build:b", "finalize:b", "build:c", "finalize:c"
        ]
    );
}

#[test]
fn parallel_builds_every_chunk_exactly_once() {
    let index = TestIndex {
        chunks: vec![singleton("a"), singleton("b"), singleton("c"), singleton("d")],
        deps: HashMap::from([
            (TargetId::new("b"), vec![TargetId::new("a")]),
            (TargetId::new("c"), vec![TargetId::new("a")]),
            (TargetId::new("d"), vec![TargetId::new("b"), TargetId::new("c")]),
        ]),
    };
    let graph = ChunkGraph::build(&index);
    let cancel = CancelToken::new();

    let built: Arc<PMutex<Vec<String>>> = Arc::new(PMutex::new(Vec::new()));
    let built_in_build = built.clone();

    run(
        graph,
        4,
        &cancel,
        move |_i, chunk| {
            built_in_build.lock().push(chunk.presentable_name());
            Ok(())
        },
        |_i, _chunk| Ok(()),
    )
    .expect("run");

    let mut names = built.lock().clone();
    names.sort();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
}

#[test]
fn first_build_failure_is_returned_and_later_chunks_skip_the_build_step() {
    let index = TestIndex {
        chunks: vec![singleton("a"), singleton("b")],
        deps: HashMap::from([(TargetId::new("b"), vec![TargetId::new("a")])]),
    };
    let graph = ChunkGraph::build(&index);
    let cancel = CancelToken::new();

    let finalized: Arc<PMutex<Vec<String>>> = Arc::new(PMutex::new(Vec::new()));
    let finalized_clone = finalized.clone();

    let err = run(
        graph,
        1,
        &cancel,
        |_i, chunk| {
            if chunk.presentable_name() == "a" {
                Err(BuildError::InternalAssertion("boom".into()))
            } else {
                panic!("chunk b's build step should have been skipped");
            }
        },
        move |_i, chunk| {
            finalized_clone.lock().push(chunk.presentable_name());
            Ok(())
        },
    )
    .expect_err("should fail");

    assert!(matches!(err, BuildError::InternalAssertion(_)));
    assert_eq!(*finalized.lock(), vec!["a", "b"]);
}
