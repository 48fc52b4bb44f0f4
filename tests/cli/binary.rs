//! Runs the built binary
//!
//! Each run gets an empty config home so a user's own configuration file
//! never leaks into the results.

use crate::common::{write_config, write_events, SCRIPTED_EVENTS};
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn printqueue(home: &TempDir) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_printqueue"));
    command
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("NO_COLOR", "1")
        .args(["--log-level", "off"]);
    command
}

fn run_with_input(mut command: Command, input: &str) -> Output {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_simulate_prints_replay_and_history() {
    let home = tempfile::tempdir().unwrap();
    let (_dir, events) = write_events(SCRIPTED_EVENTS);

    let output = printqueue(&home)
        .args(["--capacity", "5", "--aging-interval", "3", "--expiry-time", "10"])
        .arg("simulate")
        .arg(&events)
        .args(["--delay-ms", "0", "--json-history"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("=== Starting Simulation ==="));
    assert!(stdout.contains("Added job doc1 from user1 (priority 2)"));
    assert!(stdout.contains("Batch submit: 2 succeeded, 0 failed"));

    let doc2 = stdout.find("Printed job doc2 from user2").unwrap();
    let doc1 = stdout.find("Printed job doc1 from user1").unwrap();
    assert!(doc2 < doc1);
    assert!(stdout.contains("=== Print Queue Status [Time: 7] ==="));

    let (_, history) = stdout.split_once("=== Simulation Ended ===").unwrap();
    let history: serde_json::Value = serde_json::from_str(history.trim()).unwrap();
    let last = history.as_array().unwrap().last().unwrap();
    assert_eq!(last["event"], "shutdown");
    assert_eq!(last["queue_size"], 2);
}

#[test]
fn test_simulate_uses_config_file() {
    let home = tempfile::tempdir().unwrap();
    let (_events_dir, events) = write_events(
        r#"[
            {"type": "enqueue", "user_id": "u", "job_id": "a", "priority": 1},
            {"type": "enqueue", "user_id": "u", "job_id": "b", "priority": 1}
        ]"#,
    );
    let (_config_dir, config) = write_config("capacity = 1\ndelay-ms = 0\n");

    let output = printqueue(&home)
        .arg("-c")
        .arg(&config)
        .arg("simulate")
        .arg(&events)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Added job a from u (priority 1)"));
    assert!(stdout.contains("Queue full! Could not add job b"));
}

#[test]
fn test_missing_events_file_fails() {
    let home = tempfile::tempdir().unwrap();
    let output = printqueue(&home)
        .args(["simulate", "/definitely/not/here.json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_missing_config_file_fails_before_running() {
    let home = tempfile::tempdir().unwrap();
    let output = printqueue(&home)
        .args(["-c", "/definitely/not/here.toml", "shell"])
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("does not exist"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_shell_session_over_stdin() {
    let home = tempfile::tempdir().unwrap();
    let mut command = printqueue(&home);
    command.args(["--capacity", "2", "shell"]);

    let output = run_with_input(
        command,
        "enqueue alice doc1 2\n\
         enqueue bob doc2 1\n\
         enqueue carol doc3 0\n\
         tick 2\n\
         print\n\
         bogus\n\
         quit\n",
    );
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Added job doc1"));
    assert!(stdout.contains("Queue is full!"));
    assert!(stdout.contains("=== Print Queue Status [Time: 2] ==="));
    assert!(stdout.contains("Printed job doc2 from bob"));
    assert!(stdout.contains("Unknown command 'bogus'"));
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    let output = printqueue(&home).arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("printqueue "));
}
