// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kiln-adapters: default implementations of the non-persistent external
//! collaborator traits defined in `kiln-core` (§6) — `TargetIndex`,
//! `BuildRootIndex`, `ModuleExcludeIndex`, `BuilderRegistry`,
//! `LowMemoryWatcher`, `ExternalCompilerHelper` — plus the trivial demo
//! builders the CLI front-end wires up. Persistent-store collaborators
//! live in `kiln-store` instead.
//!
//! The `test-support` feature exports `Fake*` doubles of every trait here
//! for reuse by other crates' tests, following this codebase's existing
//! test-support feature convention.

mod build_root_index;
mod builder_registry;
mod compiler_helper;
mod low_memory;
mod module_exclude_index;
mod target_index;

#[cfg(any(test, feature = "test-support"))]
mod fakes;

pub use build_root_index::InMemoryBuildRootIndex;
pub use builder_registry::{NoOpModuleLevelBuilder, NoOpTargetBuilder, StaticBuilderRegistry};
pub use compiler_helper::NoOpExternalCompilerHelper;
pub use low_memory::NoOpLowMemoryWatcher;
pub use module_exclude_index::InMemoryModuleExcludeIndex;
pub use target_index::InMemoryTargetIndex;

#[cfg(any(test, feature = "test-support"))]
pub use fakes::{
    FakeBuildRootIndex, FakeBuildRootIndexWithRoots, FakeBuilderRegistry, FakeExternalCompilerHelper,
    FakeLowMemoryWatcher, FakeModuleExcludeIndex, FakeTargetIndex, ScriptedBuilder,
};
