//! Integration tests for the share-sim binary

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

/// Get a Command for the share-sim binary
fn sim_cmd() -> Command {
    let mut cmd = Command::cargo_bin("share-sim").expect("Failed to find share-sim binary");
    cmd.env("NO_COLOR", "1").env_remove("SHARE_SETTINGS");
    cmd
}

fn scenario(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/scenarios")
        .join(name)
}

fn run_json(args: &[&str]) -> Value {
    let output = sim_cmd().args(args).output().expect("failed to run share-sim");
    assert!(output.status.success(), "share-sim failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn actor<'a>(report: &'a Value, id: &str) -> &'a Value {
    report["actors"]
        .as_array()
        .expect("actors array")
        .iter()
        .find(|a| a["identity"] == id)
        .unwrap_or_else(|| panic!("actor {id} missing"))
}

// ============================================================================
// Basic Commands
// ============================================================================

#[test]
fn test_no_command_shows_hint() {
    sim_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("share-sim --help"));
}

#[test]
fn test_phases_lists_interception_points() {
    sim_cmd()
        .arg("phases")
        .assert()
        .success()
        .stdout(predicate::str::contains("actor-prepare-base-data"))
        .stdout(predicate::str::contains("effect-remaining-duration"))
        .stdout(predicate::str::contains("override"))
        .stdout(predicate::str::contains("delete-actor"));
}

// ============================================================================
// run Command Tests
// ============================================================================

#[test]
fn test_run_party_text() {
    sim_cmd()
        .arg("run")
        .arg(scenario("party.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled"))
        .stdout(predicate::str::contains("update Actor.wolf"))
        .stdout(predicate::str::contains("master of 2"))
        .stdout(predicate::str::contains("slave of kyra"));
}

#[test]
fn test_run_party_json() {
    let report = run_json(&["run", scenario("party.toml").to_str().unwrap(), "--json"]);

    assert_eq!(report["enabled"], true);
    assert_eq!(report["steps"].as_array().unwrap().len(), 2);

    let kyra = actor(&report, "kyra");
    assert_eq!(kyra["hp"], 38);
    assert_eq!(kyra["hero_points"], 1);
    assert_eq!(kyra["slaves"].as_array().unwrap().len(), 2);

    let amiri = actor(&report, "amiri");
    assert_eq!(amiri["hp"], 38);
    assert_eq!(amiri["hp_max"], 50);
    assert_eq!(amiri["hero_points"], 1);
    assert_eq!(amiri["master"], "kyra");

    let wolf = actor(&report, "wolf");
    assert_eq!(wolf["hp"], 38);
    assert_eq!(wolf["hero_points"], 0);
}

#[test]
fn test_run_encounter_turns() {
    let report = run_json(&["run", scenario("encounter.toml").to_str().unwrap(), "--json"]);

    let steps = report["steps"].as_array().unwrap();
    assert_eq!(steps[0]["action"], "turn");
    assert_eq!(steps[0]["report"]["event"], "turn-start");
    assert_eq!(steps[0]["report"]["processed"], serde_json::json!(["wolf"]));
    assert_eq!(steps[0]["report"]["skipped"], serde_json::json!(["bear"]));
    assert_eq!(steps[1]["report"]["event"], "turn-end");
    assert_eq!(
        steps[2]["actors"],
        serde_json::json!(["kyra", "wolf", "bear"])
    );
}

#[test]
fn test_settings_file_overrides_scenario() {
    let dir = TempDir::new().unwrap();
    let settings = dir.path().join("share.toml");
    std::fs::write(&settings, "[share]\nenabled = false\n").unwrap();

    let report = run_json(&[
        "run",
        scenario("party.toml").to_str().unwrap(),
        "--settings",
        settings.to_str().unwrap(),
        "--json",
    ]);

    assert_eq!(report["enabled"], false);
    assert_eq!(actor(&report, "kyra")["hp"], 50);
    assert_eq!(actor(&report, "wolf")["hp"], 38);
    assert_eq!(actor(&report, "wolf")["master"], "kyra");
}

#[test]
fn test_disabled_scenario_leaves_actors_alone() {
    let report = run_json(&["run", scenario("disabled.toml").to_str().unwrap(), "--json"]);

    assert_eq!(report["enabled"], false);
    assert_eq!(actor(&report, "wolf")["hp"], 24);
    assert!(actor(&report, "kyra")["slaves"].as_array().unwrap().is_empty());
}

#[test]
fn test_run_missing_scenario() {
    sim_cmd()
        .args(["run", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Scenario not found"));
}

#[test]
fn test_run_missing_settings_file() {
    sim_cmd()
        .arg("run")
        .arg(scenario("party.toml"))
        .args(["--settings", "missing-settings.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing-settings.toml"));
}

#[test]
fn test_run_invalid_scenario() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[[actors]]\nid = 3\n").unwrap();

    sim_cmd()
        .arg("run")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid scenario"));
}

// ============================================================================
// masters Command Tests
// ============================================================================

#[test]
fn test_masters_of_a_slave() {
    let form = run_json(&["masters", scenario("party.toml").to_str().unwrap(), "wolf", "--json"]);

    assert_eq!(form["masterId"], "kyra");
    let masters: Vec<&str> = form["masters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["value"].as_str().unwrap())
        .collect();
    // amiri already follows kyra, so it cannot lead
    assert_eq!(masters, vec!["kyra"]);
    let categories: Vec<&str> = form["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["category"].as_str().unwrap())
        .collect();
    assert_eq!(categories, vec!["health", "turn", "armor"]);
}

#[test]
fn test_masters_of_a_master_text() {
    sim_cmd()
        .arg("masters")
        .arg(scenario("party.toml"))
        .arg("kyra")
        .assert()
        .success()
        .stdout(predicate::str::contains("(no candidates)"))
        .stdout(predicate::str::contains("skills"));
}

#[test]
fn test_masters_when_disabled() {
    sim_cmd()
        .arg("masters")
        .arg(scenario("disabled.toml"))
        .arg("wolf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No share configuration"));
}
