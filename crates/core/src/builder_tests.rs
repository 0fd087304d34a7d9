// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn categories_are_ordered_by_declaration() {
    let mut cats = BuilderCategory::ALL;
    cats.sort();
    assert_eq!(cats, BuilderCategory::ALL);
    assert!(BuilderCategory::SourceGenerator < BuilderCategory::Translator);
    assert!(BuilderCategory::ClassPostProcessor < BuilderCategory::Packager);
}

#[test]
fn output_consumer_tracks_produced_outputs_and_events() {
    let mut consumer = OutputConsumer::new();
    consumer.register_output(PathBuf::from("a.rs"), PathBuf::from("a.o"));
    consumer.register_output(PathBuf::from("b.rs"), PathBuf::from("b.o"));

    assert_eq!(consumer.produced().len(), 2);
    let events = consumer.take_pending_events();
    assert_eq!(events, vec![PathBuf::from("a.o"), PathBuf::from("b.o")]);
    // Draining events doesn't drop the produced record.
    assert_eq!(consumer.produced().len(), 2);
}

#[test]
fn output_consumer_instrumented_classes_drain_once() {
    let mut consumer = OutputConsumer::new();
    consumer.register_instrumented_class(PathBuf::from("A.class"));
    let drained = consumer.take_instrumented_classes();
    assert_eq!(drained, vec![PathBuf::from("A.class")]);
    assert!(consumer.take_instrumented_classes().is_empty());
}

#[test]
fn output_consumer_clear_resets_everything() {
    let mut consumer = OutputConsumer::new();
    consumer.register_output(PathBuf::from("a.rs"), PathBuf::from("a.o"));
    consumer.register_instrumented_class(PathBuf::from("A.class"));
    consumer.clear();
    assert!(consumer.produced().is_empty());
    assert!(consumer.take_pending_events().is_empty());
    assert!(consumer.take_instrumented_classes().is_empty());
}

#[test]
fn exit_code_nothing_done_predicate() {
    assert!(BuilderExitCode::NothingDone.is_nothing_done());
    assert!(!BuilderExitCode::Ok.is_nothing_done());
}
