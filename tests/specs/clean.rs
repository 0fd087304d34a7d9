use crate::prelude::{kiln_in, temp_project};

#[test]
fn clean_succeeds_on_a_fresh_project() {
    let dir = temp_project();
    kiln_in(dir.path()).arg("clean").assert().success();
}

#[test]
fn clean_after_build_reports_both_demo_targets() {
    let dir = temp_project();
    kiln_in(dir.path()).arg("build").assert().success();

    let output = kiln_in(dir.path())
        .arg("clean")
        .output()
        .expect("clean must run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout must be utf8");
    assert!(stdout.contains("cleaned 2 target(s)"), "stdout was: {stdout}");
}
