use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn backdropctl(config_dir: &std::path::Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_backdropctl"));
    command
        .env("BACKDROP_CONFIG_DIR", config_dir)
        .env_remove("BACKDROP_SETTINGS");
    command
}

#[test]
fn check_reports_defaults_without_settings_file() {
    let root = TempDir::new().unwrap();

    let output = backdropctl(root.path())
        .arg("check")
        .output()
        .expect("failed to run backdropctl check");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("missing, using defaults"));
    assert!(stdout.contains("Fade duration: 200 ms"));
    assert!(stdout.contains("tr=#99000000"));
    assert!(stdout.contains("Blacklist: (empty)"));
}

#[test]
fn check_reads_settings_from_config_dir() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("settings.toml"),
        r##"
[background]
duration = "350ms"
colors = ["#11000000", "#22000000", "#33000000", "#44000000"]

[blur]
radius = 12
blacklist = ["ChatOverlay", "NoSuchScreen", "Button"]
"##,
    )
    .unwrap();

    let output = backdropctl(root.path())
        .arg("check")
        .output()
        .expect("failed to run backdropctl check");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Fade duration: 350 ms"));
    assert!(stdout.contains("tr=#22000000 tl=#11000000 bl=#44000000 br=#33000000"));
    assert!(stdout.contains("radius 12"));
    assert!(stdout.lines().any(|line| line.contains("ChatOverlay") && line.ends_with("ok")));
    assert!(stdout
        .lines()
        .any(|line| line.contains("NoSuchScreen") && line.ends_with("skipped")));
    assert!(stdout.lines().any(|line| line.contains("Button") && line.ends_with("skipped")));
}

#[test]
fn check_fails_on_invalid_settings() {
    let root = TempDir::new().unwrap();
    let settings = root.path().join("broken.toml");
    fs::write(&settings, "[blur]\nradius = \"wide\"\n").unwrap();

    let output = backdropctl(root.path())
        .arg("--settings")
        .arg(&settings)
        .arg("check")
        .output()
        .expect("failed to run backdropctl check");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("broken.toml"));
}
