// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kiln-core: shared types and seams for the incremental build driver.
//!
//! This crate defines the driver's vocabulary — targets, chunks, scope,
//! context, builders, and the collaborator/store traits the driver consumes
//! — without implementing scheduling, persistence, or builder logic itself.
//! Those live in `kiln-store`, `kiln-driver`, and `kiln-adapters`.

pub mod builder;
pub mod chunk;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod id;
pub mod message;
pub mod registries;
pub mod scope;
pub mod store_traits;
pub mod target;

pub use builder::{
    BuilderCategory, BuilderError, BuilderExitCode, DirtyFilesHolder, LifecycleTask,
    ModuleLevelBuilder, OutputConsumer, TargetBuilder,
};
pub use chunk::{ChunkId, TargetChunk};
pub use collaborators::{
    BuildRootIndex, BuilderRegistry, ExternalCompilerHelper, LowMemoryWatcher, ModuleExcludeIndex,
    TargetIndex,
};
pub use config::BuildConfig;
pub use context::{
    BuildContext, BuildContextApi, CanceledError, CancelToken, Key, WrappedContext,
};
pub use id::{IdGen, SequentialIdGen, ShortId, UuidIdGen};
pub use message::{
    BuildMessage, CompilerMessage, MessageBus, MessageHandler, MessageKind, TargetProgressPhase,
};
pub use registries::{ClearedOutputRegistry, RemovedSources};
pub use scope::{BuildScope, Scope};
pub use store_traits::{
    DataManager, DirtyStateStore, OutputToSourceRegistry, SourceFormMap, SourceToOutputMap,
    StoreFailure, StoreResult, TimestampStorage,
};
pub use target::{OutputRoot, SourceRoot, Target, TargetId, TargetKind};
