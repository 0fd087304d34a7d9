use crate::prelude::{kiln_in, temp_project};

#[test]
fn rebuild_succeeds_after_a_build() {
    let dir = temp_project();
    kiln_in(dir.path()).arg("build").assert().success();
    kiln_in(dir.path()).arg("rebuild").assert().success();
}

#[test]
fn rebuild_succeeds_on_a_project_with_no_prior_build() {
    let dir = temp_project();
    kiln_in(dir.path()).arg("rebuild").assert().success();
}
