// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `NoOpExternalCompilerHelper` (§6): stands in for an external compiler
//! helper process. There is nothing running to shut down or terminate, so
//! shutdown always succeeds immediately.

use kiln_core::collaborators::ExternalCompilerHelper;
use std::time::Duration;

#[derive(Default)]
pub struct NoOpExternalCompilerHelper;

impl ExternalCompilerHelper for NoOpExternalCompilerHelper {
    fn shutdown(&self, _grace: Duration) -> bool {
        true
    }

    fn terminate(&self) {}
}

#[cfg(test)]
#[path = "compiler_helper_tests.rs"]
mod tests;
