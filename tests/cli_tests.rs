//! Binary-level CLI behavior: exit codes and usage text.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn fleetmux() -> Command {
    Command::cargo_bin("fleetmux").unwrap()
}

/// A config whose state dir is isolated inside `dir`.
fn isolated_config(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("fleetmux.toml");
    let state_dir = dir.path().join("state");
    fs::write(
        &path,
        format!("[state]\ndir = \"{}\"\n", state_dir.display()),
    )
    .expect("write temp config");
    path
}

#[test]
fn invalid_subcommand_prints_usage_and_exits_2() {
    fleetmux()
        .arg("frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn malformed_flag_prints_usage_and_exits_2() {
    fleetmux()
        .args(["console", "--bogus"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_subcommand_exits_2() {
    fleetmux()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_exits_0() {
    fleetmux()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("console"))
        .stdout(predicate::str::contains("start"));
}

#[test]
fn start_rejects_zero_servers() {
    let dir = tempfile::tempdir().unwrap();
    fleetmux()
        .args(["start", "--servers", "0"])
        .arg("--config")
        .arg(isolated_config(&dir))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("num_servers"));
}

#[test]
fn start_rejects_replicas_matching_server_count() {
    let dir = tempfile::tempdir().unwrap();
    fleetmux()
        .args(["start", "--servers", "4", "--replicas", "4"])
        .arg("--config")
        .arg(isolated_config(&dir))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("num_replicas"));
}

#[test]
fn start_rejects_disjunct_overflow_of_the_fleet() {
    let dir = tempfile::tempdir().unwrap();
    fleetmux()
        .args(["start", "--servers", "100"])
        .arg("--config")
        .arg(isolated_config(&dir))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("disjunct"));
}

#[test]
fn stop_without_a_manifest_is_a_noop_success() {
    let dir = tempfile::tempdir().unwrap();
    fleetmux()
        .arg("stop")
        .arg("--config")
        .arg(isolated_config(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("No cluster running"));
}

#[test]
fn status_without_a_manifest_reports_no_cluster() {
    let dir = tempfile::tempdir().unwrap();
    fleetmux()
        .arg("status")
        .arg("--config")
        .arg(isolated_config(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("no cluster running"));
}

#[test]
fn console_with_an_empty_serverlist_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    fleetmux()
        .args(["console", "-s", ","])
        .arg("--config")
        .arg(isolated_config(&dir))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no hosts"));
}

#[test]
fn unparseable_config_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fleetmux.toml");
    fs::write(&path, "[fleet]\ncoordinator_port = \"not-a-port\"\n").unwrap();

    fleetmux()
        .arg("status")
        .arg("--config")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load config"));
}
