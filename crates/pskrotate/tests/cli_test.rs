//! Integration tests for the `pskrotate` CLI binary.
//!
//! Argument parsing, exit codes, and config handling run without any API.
//! The rotation tests point the dashboard client at a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `pskrotate` binary with env isolation.
///
/// Clears every credential and `PSKROTATE_*` variable and points the
/// config and data directories at `home`.
fn pskrotate_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("pskrotate");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("MERAKI_API_KEY")
        .env_remove("MERAKI_ORG_ID")
        .env_remove("WEBEX_BOT_TOKEN")
        .env_remove("WEBEX_PAT")
        .env_remove("WEBEX_ROOM_ID")
        .env_remove("WEBEX_USER_ID")
        .env_remove("PSKROTATE_OUTPUT")
        .env_remove("PSKROTATE_TIMEOUT")
        .env_remove("PSKROTATE_DATA_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn report_files(dir: &Path, prefix: &str) -> Vec<std::path::PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = pskrotate_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    pskrotate_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("update-tagged")
            .and(predicate::str::contains("ssids"))
            .and(predicate::str::contains("rooms")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    pskrotate_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pskrotate"));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    pskrotate_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = pskrotate_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_update_requires_name_or_number() {
    let home = tempfile::tempdir().unwrap();
    pskrotate_cmd(home.path())
        .args(["ssids", "update", "--network-id", "N1", "--psk", "Summer2024!"])
        .assert()
        .code(2);
}

#[test]
fn test_short_psk_is_rejected_before_any_request() {
    let home = tempfile::tempdir().unwrap();
    pskrotate_cmd(home.path())
        .args(["ssids", "update", "--network-id", "N1", "--number", "2", "--psk", "short"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("psk"));
}

#[test]
fn test_update_tagged_without_psk_fails_non_interactive() {
    let home = tempfile::tempdir().unwrap();
    pskrotate_cmd(home.path())
        .args(["update-tagged"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--psk"));
}

#[test]
fn test_room_name_requires_notify() {
    let home = tempfile::tempdir().unwrap();
    pskrotate_cmd(home.path())
        .args(["update-tagged", "--psk", "Summer2024!", "--room-name", "Reports"])
        .assert()
        .code(2);
}

// ── Credentials ─────────────────────────────────────────────────────

#[test]
fn test_orgs_list_without_key_is_auth_error() {
    let home = tempfile::tempdir().unwrap();
    pskrotate_cmd(home.path())
        .args(["orgs", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("MERAKI_API_KEY"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    let home = tempfile::tempdir().unwrap();
    pskrotate_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_defaults() {
    let home = tempfile::tempdir().unwrap();
    pskrotate_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("MX-GuestPSK")
                .and(predicate::str::contains("MXW-GuestPSK"))
                .and(predicate::str::contains("WEBEX_BOT_TOKEN: not set")),
        );
}

#[test]
fn test_set_credential_writes_file() {
    let home = tempfile::tempdir().unwrap();
    pskrotate_cmd(home.path())
        .args(["config", "set-credential", "WEBEX_ROOM_ID", "--value", "ROOM-1"])
        .assert()
        .success();

    pskrotate_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("WEBEX_ROOM_ID: set (credential file)")
                .and(predicate::str::contains("ROOM-1").not()),
        );
}

#[test]
fn test_set_credential_rejects_unknown_name() {
    let home = tempfile::tempdir().unwrap();
    pskrotate_cmd(home.path())
        .args(["config", "set-credential", "NOPE", "--value", "x"])
        .assert()
        .code(2);
}

// ── Tagged rotation against a mock dashboard ────────────────────────

async fn mock_dashboard(server: &MockServer, failing_put: bool) {
    Mock::given(method("GET"))
        .and(path("/api/v1/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "O1", "name": "Retail" }
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations/O1/networks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "N1", "name": "Store 1", "tags": ["MX-GuestPSK"], "productTypes": ["wireless"] },
            { "id": "N2", "name": "Store 2", "tags": ["MXW-GuestPSK"], "productTypes": ["appliance"] },
            { "id": "N3", "name": "Office", "tags": [], "productTypes": ["wireless"] }
        ])))
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/networks/N1/wireless/ssids/2"))
        .and(body_json(json!({ "psk": "Summer2024!" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 2, "name": "Guest", "enabled": true
        })))
        .expect(1)
        .mount(server)
        .await;

    let appliance = if failing_put {
        ResponseTemplate::new(400).set_body_json(json!({ "errors": ["SSID is disabled"] }))
    } else {
        ResponseTemplate::new(200).set_body_json(json!({
            "number": 2, "name": "Guest", "enabled": true
        }))
    };
    Mock::given(method("PUT"))
        .and(path("/api/v1/networks/N2/appliance/ssids/2"))
        .respond_with(appliance)
        .expect(1)
        .mount(server)
        .await;
}

fn rotation_cmd(home: &Path, server: &MockServer, reports: &Path) -> assert_cmd::Command {
    let mut cmd = pskrotate_cmd(home);
    cmd.env(
        "PSKROTATE_DASHBOARD__BASE_URL",
        format!("{}/api/v1", server.uri()),
    )
    .env("MERAKI_API_KEY", "test-key")
    .args(["--output", "json", "--data-dir"])
    .arg(reports)
    .args(["update-tagged", "--org-id", "O1", "--psk", "Summer2024!", "-y"]);
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_tagged_rotates_and_writes_report() {
    let server = MockServer::start().await;
    mock_dashboard(&server, false).await;
    let home = tempfile::tempdir().unwrap();
    let reports = home.path().join("reports");

    let output = rotation_cmd(home.path(), &server, &reports).output().unwrap();
    let text = combined_output(&output);
    assert_eq!(output.status.code(), Some(0), "{text}");

    let stdout: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stdout.as_array().map(Vec::len), Some(2));

    let successes = report_files(&reports, "successful_psk_changes");
    assert_eq!(successes.len(), 1);
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&successes[0]).unwrap()).unwrap();
    assert_eq!(written.as_array().map(Vec::len), Some(2));
    assert!(report_files(&reports, "unsuccessful_psk_changes").is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_tagged_failure_exits_nonzero_after_reporting() {
    let server = MockServer::start().await;
    mock_dashboard(&server, true).await;
    let home = tempfile::tempdir().unwrap();
    let reports = home.path().join("reports");

    let output = rotation_cmd(home.path(), &server, &reports).output().unwrap();
    let text = combined_output(&output);
    assert_eq!(output.status.code(), Some(1), "{text}");
    assert!(text.contains("1 of 2 PSK updates failed"), "{text}");

    assert_eq!(report_files(&reports, "successful_psk_changes").len(), 1);
    assert_eq!(report_files(&reports, "unsuccessful_psk_changes").len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_tagged_requires_yes_when_not_interactive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "O1", "name": "Retail" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    pskrotate_cmd(home.path())
        .env(
            "PSKROTATE_DASHBOARD__BASE_URL",
            format!("{}/api/v1", server.uri()),
        )
        .env("MERAKI_API_KEY", "test-key")
        .args(["update-tagged", "--org-id", "O1", "--psk", "Summer2024!"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_tagged_prints_outcomes_when_report_cannot_be_written() {
    let server = MockServer::start().await;
    mock_dashboard(&server, false).await;
    let home = tempfile::tempdir().unwrap();
    // A regular file where the report directory should be.
    let blocker = home.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();

    let output = rotation_cmd(home.path(), &server, &blocker).output().unwrap();
    let text = combined_output(&output);

    assert!(!output.status.success(), "{text}");
    let stdout: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = stdout
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|o| o["network_id"].as_str())
        .collect();
    assert_eq!(ids, vec!["N1", "N2"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ssids_list_both_families() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "O1", "name": "Retail" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/networks/N1/wireless/ssids"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "number": 0, "name": "Corp", "enabled": true },
            { "number": 2, "name": "Guest", "enabled": true }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/networks/N1/appliance/ssids"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "number": 2, "name": "Guest MX", "enabled": false }
        ])))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let output = pskrotate_cmd(home.path())
        .env(
            "PSKROTATE_DASHBOARD__BASE_URL",
            format!("{}/api/v1", server.uri()),
        )
        .env("MERAKI_API_KEY", "test-key")
        .args(["--output", "plain", "ssids", "list", "--network-id", "N1", "--type", "both"])
        .output()
        .unwrap();

    let text = combined_output(&output);
    assert!(output.status.success(), "{text}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec!["wireless\t0\tCorp", "wireless\t2\tGuest", "appliance\t2\tGuest MX"]
    );
}
