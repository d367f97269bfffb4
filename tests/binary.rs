//! Integration test: run the binary and inspect its JSON report

use std::path::PathBuf;
use std::process::{Command, Output};

/// Scratch directory with a config file that keeps the log out of the user's
/// state directory.
fn scratch(name: &str) -> (PathBuf, PathBuf) {
    let dir = std::env::temp_dir().join(format!("vlayout_binary_{name}"));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    let config = dir.join("config.toml");
    let log = dir.join("vlayout.log");
    std::fs::write(
        &config,
        format!(
            "log_file_path = {:?}\nseed = 11\n",
            log.display().to_string()
        ),
    )
    .expect("write config");
    (dir, config)
}

fn run(config: &PathBuf, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vlayout"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("VLAYOUT_CONFIG")
        .env_remove("VLAYOUT_STRATEGY")
        .env_remove("VLAYOUT_DIRECTION")
        .output()
        .expect("Failed to execute binary")
}

fn report(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "binary failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn binary_prints_version() {
    // EXPECT: Binary prints version from Cargo.toml
    let output = Command::new(env!("CARGO_BIN_EXE_vlayout"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "Expected output to contain version, but got: {}",
        stdout
    );
}

#[test]
fn grid_report_has_range_and_positions() {
    let (_dir, config) = scratch("grid");
    let output = run(
        &config,
        &[
            "--strategy",
            "grid",
            "-n",
            "10",
            "--columns",
            "3",
            "--viewport",
            "300x200",
            "--overhang",
            "0",
        ],
    );

    let json = report(&output);
    assert_eq!(json["strategy"], "grid");
    assert_eq!(json["scroll_size"], 400.0);
    assert_eq!(json["range"]["first"], 0);
    assert_eq!(json["range"]["last"], 5);
    let item = &json["items"][4];
    assert_eq!(item["index"], 4);
    assert_eq!(item["position"]["top"], 100.0);
    assert_eq!(item["position"]["left"], 100.0);
}

#[test]
fn measurements_file_feeds_natural_grid() {
    let (dir, config) = scratch("natural");
    let sizes = dir.join("sizes.json");
    std::fs::write(&sizes, r#"{"0": {"width": 150, "height": 100}}"#).expect("write sizes");

    let output = run(
        &config,
        &[
            "--strategy",
            "natural-size-grid",
            "-n",
            "100",
            "--viewport",
            "640x480",
            "-m",
            sizes.to_str().expect("utf-8 temp path"),
        ],
    );

    let json = report(&output);
    let item = &json["items"][5];
    assert_eq!(item["position"]["top"], 116.0);
    assert_eq!(item["position"]["left"], 166.0);
}

#[test]
fn scroll_to_reports_position_change_event() {
    let (_dir, config) = scratch("scroll_to");
    let output = run(
        &config,
        &[
            "--strategy",
            "grid",
            "-n",
            "100",
            "--viewport",
            "100x300",
            "--scroll-to",
            "50",
            "--align",
            "start",
            "--events",
        ],
    );

    let json = report(&output);
    assert_eq!(json["scroll_position"], 5000.0);
    let events = json["events"].as_array().expect("events requested");
    assert!(events
        .iter()
        .any(|event| event["event"] == "scroll_position_changed" && event["position"] == 5000.0));
}

#[test]
fn invalid_ideal_size_fails() {
    let (_dir, config) = scratch("invalid");
    let output = run(&config, &["--ideal-size", "0"]);
    assert!(!output.status.success());
}
