// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

crate::define_id! {
    pub struct TestId;
}

#[test]
fn define_id_new_and_as_str() {
    let id = TestId::new("abc123");
    assert_eq!(id.as_str(), "abc123");
}

#[test]
fn define_id_display() {
    let id = TestId::new("chunk-7");
    assert_eq!(id.to_string(), "chunk-7");
}

#[test]
fn define_id_short_truncates() {
    let id = TestId::new("0123456789abcdef");
    assert_eq!(id.short(6), "012345");
}

#[test]
fn define_id_short_noop_when_shorter_than_n() {
    let id = TestId::new("abc");
    assert_eq!(id.short(6), "abc");
}

#[test]
fn define_id_eq_str() {
    let id = TestId::new("x");
    assert_eq!(id, *"x");
}

#[test]
fn sequential_id_gen_increments() {
    let gen = SequentialIdGen::new("t");
    assert_eq!(gen.next(), "t-1");
    assert_eq!(gen.next(), "t-2");
    assert_eq!(gen.next(), "t-3");
}

#[test]
fn short_id_trait_on_str() {
    let s = "abcdefgh";
    assert_eq!(ShortId::short(s, 3), "abc");
}
