use std::{fs, path::Path, process::Command};

use tempfile::tempdir;

#[test]
fn rounds_that_cannot_start_are_skipped() {
    let dir = tempdir().expect("create temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "version = 1\n\n[mushrooms]\nprefabs = []\n").expect("write config");

    let output = shroom_sniff(dir.path(), &config_path, "2");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");
    assert!(stderr.contains("round 1 skipped"), "stderr: {stderr}");
    assert!(stderr.contains("round 2 skipped"), "the loop kept going: {stderr}");
    assert!(stdout.contains("coins: 0"), "stdout: {stdout}");
}

#[test]
fn shipped_config_plays_a_round() {
    let dir = tempdir().expect("create temp dir");
    let config_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/shroom_sniff.toml");

    let output = shroom_sniff(dir.path(), &config_path, "1");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.starts_with("Welcome to Shroom Sniff."), "stdout: {stdout}");
    assert!(stdout.contains("round 1: "), "stdout: {stdout}");
    assert!(stdout.contains("coins: "), "stdout: {stdout}");
}

fn shroom_sniff(dir: &Path, config_path: &Path, rounds: &str) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_shroom-sniff"))
        .current_dir(dir)
        .env("RUST_LOG", "info")
        .arg("--config")
        .arg(config_path)
        .arg("--save")
        .arg(dir.join("save.json"))
        .args(["--seed", "1", "--rounds", rounds])
        .output()
        .expect("run shroom-sniff")
}
