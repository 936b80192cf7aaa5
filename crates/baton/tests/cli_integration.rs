// End-to-end checks of the dispatch surface: help, version, routing,
// usage failures, and the session lifecycle against a scratch store.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn baton(store: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_baton"));
    cmd.env("BATON_SESSION_DIR", store.path().join("sessions"));
    cmd
}

#[test]
fn no_arguments_prints_help_and_exits_zero() {
    let store = TempDir::new().unwrap();
    baton(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("Create a new session"));
}

#[test]
fn version_flag_prints_name_and_version() {
    let store = TempDir::new().unwrap();
    baton(&store)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!(
            "baton v",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn subcommand_help_carries_the_full_documentation() {
    let store = TempDir::new().unwrap();
    baton(&store)
        .args(["init", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"))
        .stdout(predicate::str::contains("Refuses to overwrite"));
}

#[test]
fn unknown_subcommand_fails_with_usage_error() {
    let store = TempDir::new().unwrap();
    baton(&store)
        .arg("bogus")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn unknown_flag_fails_with_usage_error() {
    let store = TempDir::new().unwrap();
    baton(&store)
        .args(["init", "tomo", "--bogus"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unexpected argument"));
}

#[test]
fn malformed_numeric_flag_fails_with_usage_error() {
    let store = TempDir::new().unwrap();
    baton(&store)
        .args(["log", "tomo", "--lines", "many"])
        .assert()
        .code(2);
}

#[test]
fn missing_required_argument_fails_with_usage_error() {
    let store = TempDir::new().unwrap();
    baton(&store).arg("init").assert().code(2);
}

#[test]
fn session_lifecycle_init_show_cp_mv_rm() {
    let store = TempDir::new().unwrap();

    baton(&store)
        .args(["init", "tomo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created session 'tomo'"));

    baton(&store)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("tomo"))
        .stdout(predicate::str::contains("Session tomo."));

    baton(&store).args(["cp", "tomo", "tomo-night"]).assert().success();
    baton(&store).args(["mv", "tomo", "tomo-day"]).assert().success();

    baton(&store)
        .args(["rm", "tomo-day", "tomo-night"])
        .assert()
        .success();

    baton(&store)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions"));
}

#[test]
fn init_refuses_duplicates_unless_forced() {
    let store = TempDir::new().unwrap();
    baton(&store).args(["init", "tomo"]).assert().success();
    baton(&store)
        .args(["init", "tomo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
    baton(&store).args(["init", "tomo", "--force"]).assert().success();
}

#[test]
fn show_of_a_missing_session_fails_with_handler_error() {
    let store = TempDir::new().unwrap();
    baton(&store)
        .args(["show", "ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn show_json_emits_parseable_entries() {
    let store = TempDir::new().unwrap();
    baton(&store).args(["init", "tomo"]).assert().success();
    let output = baton(&store)
        .args(["show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed[0]["name"], "tomo");
}

#[test]
fn import_rejects_files_without_the_descriptor_extension() {
    let store = TempDir::new().unwrap();
    let stray = store.path().join("notes.txt");
    std::fs::write(&stray, "not a descriptor").unwrap();
    baton(&store)
        .args(["import", stray.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot import"));
}

#[test]
fn export_then_fetch_restores_a_session_elsewhere() {
    let origin = TempDir::new().unwrap();
    let archive = origin.path().join("tomo.tar.gz");

    baton(&origin).args(["init", "tomo"]).assert().success();
    baton(&origin)
        .args(["export", "tomo", "--output", archive.to_str().unwrap()])
        .assert()
        .success();

    let destination = TempDir::new().unwrap();
    baton(&destination)
        .args(["fetch", archive.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fetched session 'tomo'"));
    baton(&destination)
        .args(["show", "tomo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session tomo."));
}

#[cfg(unix)]
#[test]
fn start_runs_the_configured_runner_and_logs_the_outcome() {
    let store = TempDir::new().unwrap();
    baton(&store).args(["init", "tomo"]).assert().success();
    baton(&store)
        .args(["start", "tomo"])
        .env("BATON_RUNNER", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains("completed"));
    baton(&store)
        .args(["log", "tomo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("starting with runner"))
        .stdout(predicate::str::contains("runner exited with"));
}

#[cfg(unix)]
#[test]
fn start_fails_when_the_runner_fails() {
    let store = TempDir::new().unwrap();
    baton(&store).args(["init", "tomo"]).assert().success();
    baton(&store)
        .args(["start", "tomo"])
        .env("BATON_RUNNER", "false")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("runner exited"));
}
