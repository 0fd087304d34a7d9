// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn unstamped_target_has_no_stamp() {
    let storage = FsTimestampStorage::new("/tmp/does-not-matter.bin");
    assert!(storage
        .compilation_start_stamp(&TargetId::new("t1"))
        .is_none());
}

#[test]
fn update_then_read_stamp() {
    let storage = FsTimestampStorage::new("/tmp/does-not-matter.bin");
    let t = TargetId::new("t1");
    storage.update_compilation_start_stamp(&t);
    assert!(storage.compilation_start_stamp(&t).is_some());
}

#[test]
fn clean_clears_all_stamps() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = FsTimestampStorage::new(dir.path().join("stamps.bin"));
    let t = TargetId::new("t1");
    storage.update_compilation_start_stamp(&t);

    storage.clean().expect("clean");
    assert!(storage.compilation_start_stamp(&t).is_none());
}

#[test]
fn force_persists_and_load_restores() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("stamps.bin");
    let t = TargetId::new("t1");

    {
        let storage = FsTimestampStorage::new(&path);
        storage.update_compilation_start_stamp(&t);
        storage.force();
    }

    let reloaded = FsTimestampStorage::new(&path);
    reloaded.load().expect("load");
    assert!(reloaded.compilation_start_stamp(&t).is_some());
}
