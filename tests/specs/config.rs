use crate::prelude::{kiln_in, temp_project};

#[test]
fn build_honors_a_toml_config_files_system_root() {
    let dir = temp_project();
    let system_root = dir.path().join("custom-tmp");
    let config_path = dir.path().join("kiln.toml");
    std::fs::write(
        &config_path,
        format!(
            "parallel_enabled = false\nsystem_root = \"{}\"\n",
            system_root.display()
        ),
    )
    .expect("write config");

    kiln_in(dir.path())
        .arg("--config")
        .arg(&config_path)
        .arg("build")
        .assert()
        .success();

    assert!(system_root.exists());
    assert!(!dir.path().join(".kiln-tmp").exists());
}

#[test]
fn build_fails_when_the_config_file_is_missing() {
    let dir = temp_project();
    kiln_in(dir.path())
        .arg("--config")
        .arg(dir.path().join("does-not-exist.toml"))
        .arg("build")
        .assert()
        .failure();
}
