//! Exercises `kiln-driver`'s `LifecycleCoordinator` directly against
//! `kiln-adapters`' `test-support` fakes, independent of the CLI binary.

use kiln_adapters::{
    FakeBuildRootIndex, FakeBuilderRegistry, FakeExternalCompilerHelper, FakeLowMemoryWatcher,
    FakeModuleExcludeIndex, FakeTargetIndex, ScriptedBuilder,
};
use kiln_core::builder::{BuilderCategory, BuilderExitCode};
use kiln_core::config::BuildConfig;
use kiln_core::message::MessageBus;
use kiln_core::scope::BuildScope;
use kiln_core::target::{Target, TargetKind};
use kiln_driver::LifecycleCoordinator;
use kiln_store::{FsDataManager, FsDirtyStateStore, FsTimestampStorage};
use std::sync::Arc;

#[test]
fn lifecycle_coordinator_runs_end_to_end_over_fake_collaborators() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = BuildConfig::new(dir.path().join("system-root"));
    std::fs::create_dir_all(&config.system_root).expect("mkdir");

    let data_manager = Arc::new(FsDataManager::new(config.system_root.clone()));
    data_manager.load().expect("load must succeed on a fresh root");

    let builder = Arc::new(ScriptedBuilder::new(
        "demo",
        BuilderCategory::Translator,
        vec![BuilderExitCode::Ok],
    ));
    let registry = Arc::new(FakeBuilderRegistry::new(
        vec![builder.clone()],
        vec![builder],
        Vec::new(),
        Vec::new(),
    ));

    let low_memory = Arc::new(FakeLowMemoryWatcher::default());
    let compiler_helper = Arc::new(FakeExternalCompilerHelper::new(true));

    let coordinator = LifecycleCoordinator {
        target_index: Arc::new(FakeTargetIndex::new(vec![Target::new(
            "a",
            "a",
            TargetKind::Other,
        )])),
        build_root_index: Arc::new(FakeBuildRootIndex::default()),
        module_exclude_index: Arc::new(FakeModuleExcludeIndex),
        builders: registry,
        dirty_state: Arc::new(FsDirtyStateStore::new(config.system_root.join("dirty-state.bin"))),
        data_manager,
        timestamps: Arc::new(FsTimestampStorage::new(config.system_root.join("timestamps.bin"))),
        low_memory: Some(low_memory.clone()),
        compiler_helper: Some(compiler_helper.clone()),
        bus: MessageBus::new(),
        config,
    };

    let result = coordinator.build(Arc::new(BuildScope::all()), false);

    assert!(result.is_ok());
    low_memory.trip();
    assert_eq!(compiler_helper.terminate_calls(), 0);
}
