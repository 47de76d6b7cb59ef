//! CLI Integration Tests
//!
//! These tests verify the CLI commands work correctly end-to-end.
//! They test the "wiring" between the CLI and the core library.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

fn cli_cmd() -> Command {
    Command::cargo_bin("memo-web").expect("Failed to find memo-web binary")
}

/// Write `contents` to `name` inside `dir`, returning the path
fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write fixture");
    path
}

const GALLERY_SCENARIO: &str = r#"{
    "widgets": { "lightbox_available": true },
    "elements": [
        { "id": "main-menu-burger" },
        { "id": "main-menu" },
        { "id": "content" }
    ],
    "steps": [
        { "type": "evaluate" },
        { "type": "loaded" },
        { "type": "swap", "status": 200, "container": "content", "rerun_scripts": true,
          "elements": [
            { "id": "photos-count-w" },
            { "parent": "photos-count-w", "classes": ["current-count"], "text": "5" },
            { "parent": "photos-count-w", "classes": ["total-records"], "text": "20" },
            { "id": "photo-gallery" }
          ] },
        { "type": "notify", "event": "PhotoDeletedEvent" },
        { "type": "click", "target": "main-menu-burger" },
        { "type": "evaluate" }
    ]
}"#;

// ============================================================================
// Slug Command Tests
// ============================================================================

#[test]
fn test_slug_command() {
    cli_cmd()
        .args(["slug", "My Album!! 2024", "   "])
        .assert()
        .success()
        .stdout("my-album-2024\n-\n");
}

#[test]
fn test_slug_requires_label() {
    cli_cmd().arg("slug").assert().failure();
}

// ============================================================================
// Swap Command Tests
// ============================================================================

#[test]
fn test_swap_command() {
    cli_cmd()
        .args(["swap", "422", "502"])
        .assert()
        .success()
        .stdout(predicate::str::contains("422: swap=true error=false (policy)"))
        .stdout(predicate::str::contains("502: swap=false error=true (engine default)"));
}

#[test]
fn test_swap_with_config() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "client.json", r#"{"swap": {"error_codes": [502]}}"#);

    cli_cmd()
        .arg("--config")
        .arg(&config)
        .args(["swap", "502", "422"])
        .assert()
        .success()
        .stdout(predicate::str::contains("502: swap=true error=false (policy)"))
        .stdout(predicate::str::contains("422: swap=false error=true (engine default)"));
}

#[test]
fn test_bad_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "client.json", r#"{"unknown": true}"#);

    cli_cmd()
        .arg("--config")
        .arg(&config)
        .args(["swap", "200"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_swap_rejects_non_numeric_status() {
    cli_cmd().args(["swap", "ok"]).assert().failure();
}

// ============================================================================
// Replay Command Tests
// ============================================================================

#[test]
fn test_replay_summary() {
    let dir = TempDir::new().unwrap();
    let scenario = write_file(&dir, "session.json", GALLERY_SCENARIO);

    cli_cmd()
        .arg("replay")
        .arg(&scenario)
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered features: 5"))
        .stdout(predicate::str::contains("nav (X_NAV_EVENTS)"))
        .stdout(predicate::str::contains("Lightbox inits: 1"));
}

#[test]
fn test_replay_json_report() {
    let dir = TempDir::new().unwrap();
    let scenario = write_file(&dir, "session.json", GALLERY_SCENARIO);

    let output = cli_cmd()
        .arg("replay")
        .arg(&scenario)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let dom = report["dom"].as_array().unwrap();
    let texts: Vec<&str> = dom.iter().filter_map(|e| e["text"].as_str()).collect();
    assert_eq!(texts, vec!["4", "19"]);

    let burger = dom.iter().find(|e| e["id"] == "main-menu-burger").unwrap();
    assert_eq!(burger["classes"], serde_json::json!(["is-active"]));

    // second evaluate registers nothing new
    assert_eq!(report["steps"][5]["handled"], 0);
    assert_eq!(report["steps"][2]["swap"]["should_swap"], true);
}

#[test]
fn test_replay_missing_target_fails() {
    let dir = TempDir::new().unwrap();
    let scenario = write_file(
        &dir,
        "session.json",
        r#"{"steps": [{"type": "evaluate"}, {"type": "click", "target": "ghost"}]}"#,
    );

    cli_cmd()
        .arg("replay")
        .arg(&scenario)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown element: #ghost"));
}

#[test]
fn test_replay_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    cli_cmd()
        .arg("replay")
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load scenario"));
}

// ============================================================================
// Features Command Tests
// ============================================================================

#[test]
fn test_features_command() {
    cli_cmd()
        .arg("features")
        .assert()
        .success()
        .stdout(predicate::str::contains("create-album"))
        .stdout(predicate::str::contains("X_GALLERY_EVENTS"))
        .stdout(predicate::str::contains("X_BEFORE_SWAP"));
}
