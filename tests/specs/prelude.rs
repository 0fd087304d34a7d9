//! Test helpers for the kiln CLI behavioral specifications.

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// Locates the built `kiln` binary. `Command::cargo_bin` only resolves
/// binaries owned by the package under test, and this root package builds
/// no binary of its own, so the path is found relative to the workspace
/// target directory instead.
fn binary_path() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug/kiln");
    if standard.exists() {
        return standard;
    }

    // Fallback: resolve relative to this test binary, which lives at
    // target/debug/deps/specs-<hash>.
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join("kiln");
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// A `kiln` invocation rooted at `dir` via `-C`.
pub fn kiln_in(dir: &Path) -> Command {
    let mut cmd = Command::new(binary_path());
    cmd.arg("-C").arg(dir);
    cmd
}

pub fn temp_project() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}
