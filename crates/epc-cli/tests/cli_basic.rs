//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_epc"))
        .env("EPC_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_status_before_onboarding() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["status"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No scores yet"));

    let status = run_json(dir.path(), &["status", "--json"]);
    assert!(status["scores"].is_null());
    assert!(status["burnout"].is_null());
}

#[test]
fn test_onboard_and_complete_tool() {
    let dir = tempfile::tempdir().unwrap();
    let scores = run_json(dir.path(), &["onboard", "scores", "80", "70", "75", "--json"]);
    assert_eq!(scores["energy"], 80.0);

    let first = run_json(dir.path(), &["tool", "complete", "hydrationHero", "--json"]);
    assert_eq!(first["newScores"]["energy"], 82.0);
    assert_eq!(first["cooldown"]["effectivenessPercentage"], 100);
    assert_eq!(first["buffer"]["multiplier"], 0.5);

    let second = run_json(dir.path(), &["tool", "complete", "hydrationHero", "--json"]);
    assert_eq!(second["cooldown"]["effectivenessPercentage"], 0);
    assert_eq!(second["newScores"]["energy"], 82.0);

    let status = run_json(dir.path(), &["status", "--json"]);
    assert_eq!(status["buffer"]["buffer"]["source"], "hydrationHero");
    assert!(status["buffer"]["expiresAt"].is_string());
    assert_eq!(status["burnout"], 24);
}

#[test]
fn test_onboard_from_assessment() {
    let dir = tempfile::tempdir().unwrap();
    let scores = run_json(
        dir.path(),
        &[
            "onboard", "assess", "--energy", "5,5", "--purpose", "1,3", "--connection", "3", "--json",
        ],
    );
    assert_eq!(scores["energy"], 100.0);
    assert_eq!(scores["purpose"], 25.0);
    assert_eq!(scores["connection"], 50.0);

    let (_, stderr, code) = run_cli(
        dir.path(),
        &["onboard", "assess", "--energy", "6", "--purpose", "3", "--connection", "3"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("outside 1-5"));
}

#[test]
fn test_unknown_tool_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["tool", "complete", "teleport"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown tool: teleport"));
}

#[test]
fn test_complete_before_onboarding_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["tool", "complete", "friendCall"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("onboarding"));
}

#[test]
fn test_tool_list_covers_registry() {
    let dir = tempfile::tempdir().unwrap();
    let rows = run_json(dir.path(), &["tool", "list", "--json"]);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 18);
    assert!(rows.iter().all(|r| r["effectivenessPercentage"] == 100));
}

#[test]
fn test_tick_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["onboard", "scores", "60", "60", "60", "--json"]);

    // Onboarding starts the decay clock, so an immediate tick is not due.
    let report = run_json(dir.path(), &["tick", "--json"]);
    assert_eq!(report["decay"]["decayApplied"], false);
    let again = run_json(dir.path(), &["tick", "--json"]);
    assert_eq!(again["decay"]["decayApplied"], false);
}

#[test]
fn test_activity_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["activity", "set", "--steps", "9000"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("9000 steps"));

    let today = run_json(dir.path(), &["activity", "show", "--json"]);
    assert_eq!(today["steps"], 9000);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "decay.base_rate_per_hour"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "0.5");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "rules.amplifier_factor", "1.5"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "rules.amplifier_factor"]);
    assert_eq!(stdout.trim(), "1.5");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "rules.amplifier_factor", "9"]);
    assert_eq!(code, 1);
    let (_, _, code) = run_cli(dir.path(), &["config", "get", "nope.nothing"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_unknown_key_lists_sections() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "decay.speed", "2"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key: decay.speed"));
    assert!(stderr.contains("decay.base_rate_per_hour"));
    assert!(stderr.contains("decay.sleep.start_hour"));
    assert!(stderr.contains("history.retention_days"));

    // A section is not a printable value.
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "rules"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("rules.saturation_factor"));

    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[decay.sleep]"));
}

#[test]
fn test_reset_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["onboard", "scores", "50", "50", "50", "--json"]);

    let (_, _, code) = run_cli(dir.path(), &["reset"]);
    assert_eq!(code, 1);
    assert!(!run_json(dir.path(), &["status", "--json"])["scores"].is_null());

    let (_, _, code) = run_cli(dir.path(), &["reset", "--yes"]);
    assert_eq!(code, 0);
    assert!(run_json(dir.path(), &["status", "--json"])["scores"].is_null());
    assert!(run_json(dir.path(), &["history", "--json"]).as_array().unwrap().is_empty());
}
