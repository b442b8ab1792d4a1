use std::fs;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

fn run_json(settings: &str, args: &[&str]) -> Vec<Value> {
    let root = TempDir::new().unwrap();
    let path = root.path().join("settings.toml");
    fs::write(&path, settings).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_backdropctl"))
        .env("BACKDROP_CONFIG_DIR", root.path())
        .arg("--settings")
        .arg(&path)
        .args(args)
        .arg("--json")
        .output()
        .expect("failed to run backdropctl");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn simulate_emits_one_json_line_per_frame() {
    let frames = run_json(
        "[background]\nduration = 100\n",
        &["simulate", "--overlay", "PauseMenu", "--frames", "4", "--frame-ms", "50"],
    );

    assert_eq!(frames.len(), 4);
    assert_eq!(frames[0]["fading_in"], true);
    assert_eq!(frames[0]["corners"]["top_left"], "#00000000");
    assert_eq!(frames[2]["fading_in"], false);
    assert_eq!(frames[3]["corners"]["top_left"], "#99000000");
}

#[test]
fn simulate_close_drops_blur_radius() {
    let frames = run_json(
        "",
        &[
            "simulate",
            "--overlay",
            "InventoryScreen",
            "--frames",
            "3",
            "--close-at",
            "1",
        ],
    );

    assert_eq!(frames[0]["blurring"], true);
    assert!(frames[0].get("blur_radius").is_some());
    assert_eq!(frames[1]["has_overlay"], false);
    assert!(frames[1].get("blur_radius").is_none());
}

#[test]
fn audio_ducks_towards_inactive_volume() {
    let ticks = run_json(
        "[audio]\ninactive_volume = 0.9\n",
        &["audio", "--pattern", "iiia", "--channel-volume", "0.5"],
    );

    assert_eq!(ticks.len(), 4);
    let multiplier = ticks[1]["multiplier"].as_f64().unwrap();
    assert!((multiplier - 0.9).abs() < 1e-4);
    assert_eq!(ticks[3]["multiplier"].as_f64().unwrap(), 1.0);
    assert!((ticks[3]["pushed"].as_f64().unwrap() - 0.5).abs() < 1e-6);
}

#[test]
fn simulate_rejects_unknown_overlay() {
    let status = Command::new(env!("CARGO_BIN_EXE_backdropctl"))
        .env("BACKDROP_CONFIG_DIR", TempDir::new().unwrap().path())
        .args(["simulate", "--overlay", "NotAScreen"])
        .status()
        .expect("failed to run backdropctl");

    assert!(!status.success());
}
