// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kiln_core::target::{Target, TargetKind};

fn target(id: &str) -> Target {
    Target::new(id, id, TargetKind::ModuleBased)
}

#[test]
fn unknown_target_has_no_dirty_files() {
    let store = FsDirtyStateStore::new("/tmp/does-not-matter.bin");
    assert!(store
        .sources_to_recompile(&TargetId::new("missing"))
        .is_empty());
}

#[test]
fn mark_dirty_groups_files_by_root() {
    let store = FsDirtyStateStore::new("/tmp/does-not-matter.bin");
    let t = TargetId::new("t1");
    store.mark_dirty(&t, PathBuf::from("src"), PathBuf::from("src/a.rs"));
    store.mark_dirty(&t, PathBuf::from("src"), PathBuf::from("src/b.rs"));
    store.mark_dirty(&t, PathBuf::from("gen"), PathBuf::from("gen/c.rs"));

    let mut result = store.sources_to_recompile(&t);
    result.sort_by(|a, b| a.0.cmp(&b.0));

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].0, PathBuf::from("gen"));
    assert_eq!(result[0].1, vec![PathBuf::from("gen/c.rs")]);
    assert_eq!(result[1].0, PathBuf::from("src"));
    let mut files = result[1].1.clone();
    files.sort();
    assert_eq!(
        files,
        vec![PathBuf::from("src/a.rs"), PathBuf::from("src/b.rs")]
    );
}

#[test]
fn mark_all_dirty_surfaces_roots_with_no_explicit_files() {
    let store = FsDirtyStateStore::new("/tmp/does-not-matter.bin");
    let t = TargetId::new("t1");
    store.mark_all_dirty(&t, &[PathBuf::from("src")]);

    let result = store.sources_to_recompile(&t);
    assert_eq!(result, vec![(PathBuf::from("src"), Vec::new())]);
}

#[test]
fn mark_up_to_date_clears_dirty_state_for_chunk_targets() {
    let store = FsDirtyStateStore::new("/tmp/does-not-matter.bin");
    let t = TargetId::new("t1");
    store.mark_dirty(&t, PathBuf::from("src"), PathBuf::from("src/a.rs"));
    store.mark_all_dirty(&t, &[PathBuf::from("gen")]);

    let chunk = TargetChunk::new(vec![target("t1")]);
    store.mark_up_to_date(&chunk);

    assert!(store.sources_to_recompile(&t).is_empty());
}

#[test]
fn register_deleted_then_drain_clears_list() {
    let store = FsDirtyStateStore::new("/tmp/does-not-matter.bin");
    let t = TargetId::new("t1");
    store.register_deleted(&t, PathBuf::from("old.rs"));
    store.register_deleted(&t, PathBuf::from("older.rs"));

    let mut drained = store.get_and_clear_deleted_paths(&t);
    drained.sort();
    assert_eq!(
        drained,
        vec![PathBuf::from("old.rs"), PathBuf::from("older.rs")]
    );
    assert!(store.get_and_clear_deleted_paths(&t).is_empty());
}

#[test]
fn clear_all_wipes_every_target() {
    let store = FsDirtyStateStore::new("/tmp/does-not-matter.bin");
    let t = TargetId::new("t1");
    store.mark_dirty(&t, PathBuf::from("src"), PathBuf::from("src/a.rs"));
    store.clear_all();
    assert!(store.sources_to_recompile(&t).is_empty());
}

#[test]
fn save_and_load_round_trip_dirty_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dirty.bin");
    let t = TargetId::new("t1");

    {
        let store = FsDirtyStateStore::new(&path);
        store.mark_dirty(&t, PathBuf::from("src"), PathBuf::from("src/a.rs"));
        store.register_deleted(&t, PathBuf::from("gone.rs"));
        store.save().expect("save");
    }

    let reloaded = FsDirtyStateStore::new(&path);
    reloaded.load().expect("load");
    assert_eq!(
        reloaded.sources_to_recompile(&t),
        vec![(PathBuf::from("src"), vec![PathBuf::from("src/a.rs")])]
    );
    assert_eq!(
        reloaded.get_and_clear_deleted_paths(&t),
        vec![PathBuf::from("gone.rs")]
    );
}
