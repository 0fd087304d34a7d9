// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn shutdown_always_succeeds() {
    let helper = NoOpExternalCompilerHelper;
    assert!(helper.shutdown(Duration::from_secs(1)));
}

#[test]
fn terminate_does_not_panic() {
    let helper = NoOpExternalCompilerHelper;
    helper.terminate();
}
