// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn all_scope_affects_everything_and_is_not_rebuild() {
    let scope = BuildScope::all();
    assert!(scope.affects(&TargetId::new("x")));
    assert!(!scope.is_rebuild());
    assert!(!scope.is_forced(&TargetId::new("x")));
}

#[test]
fn rebuild_scope_forces_everything() {
    let scope = BuildScope::rebuild();
    assert!(scope.is_rebuild());
    assert!(scope.affects(&TargetId::new("x")));
    assert!(scope.is_forced(&TargetId::new("x")));
}

#[test]
fn targets_scope_restricts_affected_set() {
    let scope = BuildScope::targets([TargetId::new("a"), TargetId::new("b")]);
    assert!(scope.affects(&TargetId::new("a")));
    assert!(!scope.affects(&TargetId::new("c")));
    assert!(!scope.is_rebuild());
}

#[test]
fn with_forced_marks_only_that_target() {
    let scope = BuildScope::targets([TargetId::new("a"), TargetId::new("b")])
        .with_forced(TargetId::new("a"));
    assert!(scope.is_forced(&TargetId::new("a")));
    assert!(!scope.is_forced(&TargetId::new("b")));
}

#[test]
fn affects_file_delegates_to_affects() {
    use std::path::Path;
    let scope = BuildScope::targets([TargetId::new("a")]);
    assert!(scope.affects_file(&TargetId::new("a"), Path::new("/x.rs")));
    assert!(!scope.affects_file(&TargetId::new("z"), Path::new("/x.rs")));
}
