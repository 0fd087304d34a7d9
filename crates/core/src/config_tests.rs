// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn explicit_max_threads_overrides_computed_default() {
    let mut cfg = BuildConfig::new("/tmp/proj");
    cfg.max_threads = Some(3);
    assert_eq!(cfg.worker_thread_count(), 3);
}

#[test]
fn max_threads_is_floored_at_one() {
    let mut cfg = BuildConfig::new("/tmp/proj");
    cfg.max_threads = Some(0);
    assert_eq!(cfg.worker_thread_count(), 1);
}

#[test]
fn parallel_disabled_forces_single_effective_thread() {
    let mut cfg = BuildConfig::new("/tmp/proj");
    cfg.parallel_enabled = false;
    cfg.max_threads = Some(4);
    assert_eq!(cfg.effective_thread_count(), 1);
}

#[test]
fn parallel_enabled_uses_worker_thread_count() {
    let mut cfg = BuildConfig::new("/tmp/proj");
    cfg.max_threads = Some(4);
    assert_eq!(cfg.effective_thread_count(), cfg.worker_thread_count());
}

#[test]
fn computed_default_is_at_least_one_and_at_most_six() {
    let cfg = BuildConfig::new("/tmp/proj");
    let n = cfg.worker_thread_count();
    assert!((1..=6).contains(&n));
}

#[test]
fn deserializes_from_toml() {
    let toml = r#"
        parallel_enabled = false
        max_threads = 2
        generate_classpath_index = true
        system_root = "/tmp/proj"
    "#;
    let cfg: BuildConfig = toml::from_str(toml).expect("valid config");
    assert!(!cfg.parallel_enabled);
    assert_eq!(cfg.max_threads, Some(2));
    assert!(cfg.generate_classpath_index);
}
