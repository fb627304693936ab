//! Integration tests for the `vcoctl` binary.
//!
//! Argument parsing, help, completions, environment errors and the offline
//! `provision --plan` path. Nothing here needs a live orchestrator.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

const ENV_VARS: &[&str] = &[
    "VCO",
    "VCO_TOKEN",
    "ENT_LOG_ID",
    "BRANCH_PROF_LOG_ID",
    "BRANCH_LIC_LOG_ID",
    "GOOGLE_MAPS_API_KEY",
    "ZSCALER_SUB_LOG_ID",
    "VCOCTL_OUTPUT",
    "VCOCTL_TIMEOUT",
    "VCOCTL_INSECURE",
    "RUST_LOG",
];

/// Build a [`Command`] for `vcoctl` running in `dir` with env isolation.
///
/// Clears every variable the binary reads and points config directories at
/// a nonexistent path, so neither the user's `.env` nor their policy file
/// leaks in.
fn vcoctl_in(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("vcoctl");
    cmd.current_dir(dir)
        .env("HOME", "/tmp/vcoctl-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/vcoctl-cli-test-nonexistent");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn workdir() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

const BRANCH_TOML: &str = r#"
name = "branch-311"
country = "US"
postal_code = "62269"
contact_name = "Pat Doe"
contact_email = "pat@example.com"
transit_net = "10.31.0.0/30"
corporate_nets = ["10.31.10.0/24"]
byod_net = "10.31.30.0/24"
guest_net = "10.31.40.0/24"

[[wans]]
name = "ISP-A"
network = "198.51.100.0/29"
local = "198.51.100.2"
gateway = "198.51.100.1"
upstream_mbps = 20
downstream_mbps = 200

[[wans]]
name = "ISP-B"
network = "203.0.113.8/30"
local = "203.0.113.10"
gateway = "203.0.113.9"
upstream_mbps = 50
downstream_mbps = 50
standby = true
"#;

fn interface(name: &str, cellular: bool) -> Value {
    let mut iface = json!({
        "name": name,
        "addressing": { "type": "STATIC" },
        "l2": { "probeInterval": "1" },
        "subinterfaces": [ { "addressing": {} }, { "addressing": {} } ]
    });
    if cellular {
        iface["cellular"] = json!({ "simPin": "" });
    }
    iface
}

fn device_settings() -> Value {
    json!({
        "id": 5012,
        "name": "deviceSettings",
        "data": {
            "lan": { "networks": [ { "vlanId": 1, "cidrIp": "10.0.1.1" } ] },
            "segments": [ { "routes": { "static": [] } } ],
            "routedInterfaces": [
                interface("GE3", false),
                interface("GE2", true),
                interface("GE4", false)
            ]
        }
    })
}

fn write_fixtures(dir: &Path) {
    std::fs::write(dir.join("branch.toml"), BRANCH_TOML).unwrap();
    std::fs::write(
        dir.join("device-settings.json"),
        serde_json::to_string_pretty(&device_settings()).unwrap(),
    )
    .unwrap();
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = workdir();
    let output = vcoctl_in(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let dir = workdir();
    vcoctl_in(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("audit")
            .and(predicate::str::contains("provision"))
            .and(predicate::str::contains("edges"))
            .and(predicate::str::contains("licenses")),
    );
}

#[test]
fn test_version_flag() {
    let dir = workdir();
    vcoctl_in(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vcoctl"));
}

#[test]
fn test_completions_zsh() {
    let dir = workdir();
    vcoctl_in(dir.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    let dir = workdir();
    vcoctl_in(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_subcommand() {
    let dir = workdir();
    let output = vcoctl_in(dir.path()).arg("foobar").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Environment errors ──────────────────────────────────────────────

#[test]
fn test_audit_without_host_names_variable() {
    let dir = workdir();
    vcoctl_in(dir.path())
        .arg("audit")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("VCO"));
}

#[test]
fn test_env_file_is_loaded() {
    let dir = workdir();
    let env_file = dir.path().join("site.env");
    std::fs::write(&env_file, "VCO=vco.example.net\n").unwrap();

    vcoctl_in(dir.path())
        .args(["--env-file", env_file.to_str().unwrap(), "edges", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("VCO_TOKEN"));
}

#[test]
fn test_dotenv_in_working_directory() {
    let dir = workdir();
    std::fs::write(dir.path().join(".env"), "VCO=vco.example.net\n").unwrap();

    vcoctl_in(dir.path())
        .args(["licenses", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("VCO_TOKEN"));
}

#[test]
fn test_missing_explicit_env_file_fails() {
    let dir = workdir();
    vcoctl_in(dir.path())
        .args(["--env-file", "does-not-exist.env", "audit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.env"));
}

#[test]
fn test_provision_needs_enterprise_id() {
    let dir = workdir();
    write_fixtures(dir.path());
    vcoctl_in(dir.path())
        .args(["provision", "branch.toml"])
        .env("VCO", "vco.example.net")
        .env("VCO_TOKEN", "token")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ENT_LOG_ID"));
}

#[test]
fn test_zero_timeout_is_usage_error() {
    let dir = workdir();
    vcoctl_in(dir.path())
        .args(["--timeout", "0", "audit"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("timeout"));
}

#[test]
fn test_unreachable_orchestrator_is_connection_error() {
    let dir = workdir();
    vcoctl_in(dir.path())
        .args(["--timeout", "5", "edges", "list"])
        .env("VCO", "http://127.0.0.1:1")
        .env("VCO_TOKEN", "token")
        .assert()
        .code(7);
}

#[test]
fn test_provision_help_offers_zscaler_now() {
    let dir = workdir();
    vcoctl_in(dir.path())
        .args(["provision", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--zscaler-now"));
}

#[test]
fn test_zscaler_now_conflicts_with_plan() {
    let dir = workdir();
    write_fixtures(dir.path());
    vcoctl_in(dir.path())
        .args([
            "provision",
            "branch.toml",
            "--plan",
            "--device-settings",
            "device-settings.json",
            "--zscaler-now",
        ])
        .assert()
        .code(2);
}

// ── Offline plan ────────────────────────────────────────────────────

#[test]
fn test_plan_outputs_patch_and_overlay() {
    let dir = workdir();
    write_fixtures(dir.path());

    let output = vcoctl_in(dir.path())
        .args([
            "--output",
            "json",
            "provision",
            "branch.toml",
            "--plan",
            "--device-settings",
            "device-settings.json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let plan: Value = serde_json::from_slice(&output.stdout).unwrap();
    let ops = plan["device_settings"].as_array().unwrap();
    // 1 route + 3 vlan + 5 + 5 uplink + 12 transit
    assert_eq!(ops.len(), 26);
    assert_eq!(ops[0]["path"], "/segments/0/routes/static/-");
    assert_eq!(ops[0]["value"]["gateway"], "10.31.0.2");
    assert_eq!(
        ops.last().unwrap(),
        &json!({ "op": "remove", "path": "/routedInterfaces/0/cellular" })
    );

    let links = plan["wan_overlay"]["links"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["interfaces"], json!(["GE3"]));
    assert_eq!(links[1]["backupOnly"], true);
}

#[test]
fn test_plan_table_output() {
    let dir = workdir();
    write_fixtures(dir.path());

    vcoctl_in(dir.path())
        .args([
            "provision",
            "branch.toml",
            "--plan",
            "--device-settings",
            "device-settings.json",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("deviceSettings patch")
                .and(predicate::str::contains("/routedInterfaces/0/cellular"))
                .and(predicate::str::contains("WAN overlay")),
        );
}

#[test]
fn test_plan_requires_device_settings() {
    let dir = workdir();
    write_fixtures(dir.path());
    vcoctl_in(dir.path())
        .args(["provision", "branch.toml", "--plan"])
        .assert()
        .code(2);
}

#[test]
fn test_plan_missing_interface_is_not_found() {
    let dir = workdir();
    write_fixtures(dir.path());
    let mut doc = device_settings();
    doc["data"]["routedInterfaces"]
        .as_array_mut()
        .unwrap()
        .retain(|i| i["name"] != "GE4");
    std::fs::write(dir.path().join("device-settings.json"), doc.to_string()).unwrap();

    vcoctl_in(dir.path())
        .args([
            "provision",
            "branch.toml",
            "--plan",
            "--device-settings",
            "device-settings.json",
        ])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("GE4"));
}

#[test]
fn test_invalid_branch_is_usage_error() {
    let dir = workdir();
    write_fixtures(dir.path());
    let broken = BRANCH_TOML.replace("gateway = \"198.51.100.1\"", "gateway = \"192.0.2.1\"");
    std::fs::write(dir.path().join("branch.toml"), broken).unwrap();

    vcoctl_in(dir.path())
        .args([
            "provision",
            "branch.toml",
            "--plan",
            "--device-settings",
            "device-settings.json",
        ])
        .assert()
        .code(2);
}

#[test]
fn test_policy_file_changes_transit_interface() {
    let dir = workdir();
    write_fixtures(dir.path());
    std::fs::write(
        dir.path().join("vcoctl.toml"),
        "[provision]\ntransit_interface = \"GE9\"\n",
    )
    .unwrap();

    vcoctl_in(dir.path())
        .args([
            "provision",
            "branch.toml",
            "--plan",
            "--device-settings",
            "device-settings.json",
        ])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("GE9"));
}
