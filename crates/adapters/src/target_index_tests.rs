// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kiln_core::target::TargetKind;

fn target(id: &str, kind: TargetKind, deps: &[&str]) -> Target {
    let mut t = Target::new(id, id, kind);
    for dep in deps {
        t = t.with_dependency(*dep);
    }
    t
}

#[test]
fn acyclic_targets_each_land_in_their_own_chunk() {
    let index = InMemoryTargetIndex::new(vec![
        target("a", TargetKind::Other, &[]),
        target("b", TargetKind::Other, &["a"]),
        target("c", TargetKind::Other, &["b"]),
    ]);

    let chunks = index.sorted_target_chunks();
    assert_eq!(chunks.len(), 3);
    assert!(chunks.iter().all(|c| c.targets.len() == 1));
}

#[test]
fn cyclic_module_targets_land_in_one_chunk() {
    let index = InMemoryTargetIndex::new(vec![
        target("m1", TargetKind::ModuleBased, &["m2"]),
        target("m2", TargetKind::ModuleBased, &["m1"]),
        target("other", TargetKind::Other, &["m1"]),
    ]);

    let chunks = index.sorted_target_chunks();
    let cyclic_chunk = chunks
        .iter()
        .find(|c| c.targets.len() == 2)
        .expect("the cyclic pair must share one chunk");
    let ids: Vec<_> = cyclic_chunk.target_ids().into_iter().collect();
    assert!(ids.contains(&TargetId::new("m1")));
    assert!(ids.contains(&TargetId::new("m2")));
}

#[test]
fn dependencies_are_looked_up_by_target_id() {
    let index = InMemoryTargetIndex::new(vec![
        target("a", TargetKind::Other, &[]),
        target("b", TargetKind::Other, &["a"]),
    ]);

    assert_eq!(index.dependencies(&TargetId::new("b")), vec![TargetId::new("a")]);
    assert!(index.dependencies(&TargetId::new("a")).is_empty());
    assert!(index.dependencies(&TargetId::new("missing")).is_empty());
}
