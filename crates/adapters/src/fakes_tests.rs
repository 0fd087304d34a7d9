// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kiln_core::builder::BuilderCategory;
use kiln_core::target::TargetKind;

#[test]
fn fake_target_index_puts_every_target_in_its_own_chunk() {
    let index = FakeTargetIndex::new(vec![
        Target::new("a", "a", TargetKind::Other),
        Target::new("b", "b", TargetKind::Other).with_dependency("a"),
    ]);

    assert_eq!(index.all_targets().len(), 2);
    assert_eq!(index.sorted_target_chunks().len(), 2);
    assert_eq!(index.dependencies(&TargetId::new("b")), vec![TargetId::new("a")]);
}

#[test]
fn fake_build_root_index_counts_clear_calls() {
    let index = FakeBuildRootIndex::default();
    index.clear_temp_roots();
    index.clear_temp_roots();
    assert_eq!(index.clear_calls(), 2);
}

#[test]
fn scripted_builder_replays_then_repeats_last_exit_code() {
    let builder = ScriptedBuilder::new(
        "scripted",
        BuilderCategory::Translator,
        vec![BuilderExitCode::AdditionalPassRequired, BuilderExitCode::Ok],
    );
    let chunk = TargetChunk::new(vec![Target::new("a", "a", TargetKind::Other)]);
    let dirty = EmptyDirtyFiles;
    let mut output = OutputConsumer::new();
    let ctx = test_context();

    let first = ModuleLevelBuilder::build(&builder, &ctx, &chunk, &dirty, &mut output)
        .expect("first build must not fail");
    let second = ModuleLevelBuilder::build(&builder, &ctx, &chunk, &dirty, &mut output)
        .expect("second build must not fail");
    let third = ModuleLevelBuilder::build(&builder, &ctx, &chunk, &dirty, &mut output)
        .expect("third build must not fail");

    assert_eq!(first, BuilderExitCode::AdditionalPassRequired);
    assert_eq!(second, BuilderExitCode::Ok);
    assert_eq!(third, BuilderExitCode::Ok);
    assert_eq!(builder.call_count(), 3);
}

#[test]
fn fake_low_memory_watcher_trips_the_registered_callback() {
    let watcher = FakeLowMemoryWatcher::default();
    let tripped = Arc::new(Mutex::new(false));
    let flag = tripped.clone();
    watcher.register(Arc::new(move || *flag.lock() = true));

    watcher.trip();

    assert!(*tripped.lock());
}

#[test]
fn fake_external_compiler_helper_reports_scripted_result_and_counts_terminate() {
    let helper = FakeExternalCompilerHelper::new(false);
    assert!(!helper.shutdown(std::time::Duration::from_secs(1)));
    helper.terminate();
    helper.terminate();
    assert_eq!(helper.terminate_calls(), 2);
}

struct EmptyDirtyFiles;
impl DirtyFilesHolder for EmptyDirtyFiles {
    fn dirty_files(&self, _target: &TargetId) -> Vec<std::path::PathBuf> {
        Vec::new()
    }
}

fn test_context() -> kiln_core::context::BuildContext {
    kiln_core::context::BuildContext::new(
        Arc::new(kiln_core::scope::BuildScope::all()),
        kiln_core::message::MessageBus::new(),
        kiln_core::config::BuildConfig::new("/tmp"),
    )
}
