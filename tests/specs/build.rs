use crate::prelude::{kiln_in, temp_project};

#[test]
fn build_succeeds_on_a_fresh_project() {
    let dir = temp_project();
    kiln_in(dir.path()).arg("build").assert().success();
}

#[test]
fn build_is_idempotent_across_two_invocations() {
    let dir = temp_project();
    kiln_in(dir.path()).arg("build").assert().success();
    kiln_in(dir.path()).arg("build").assert().success();
}

#[test]
fn build_creates_the_system_root() {
    let dir = temp_project();
    kiln_in(dir.path()).arg("build").assert().success();
    assert!(dir.path().join(".kiln-tmp").exists());
}
