//! CLI TOML configuration tests
//!
//! Configuration files on disk, and how their values combine with the command line.

use crate::common::write_config;
use clap::Parser;
use printqueue::app::cli::{load_config_file, Args, Settings};
use printqueue::app::error::AppError;
use printqueue::queue::QueueConfig;
use std::path::PathBuf;
use std::time::Duration;

fn resolve(cli: &[&str], config: &str) -> Settings {
    let (_dir, path) = write_config(config);
    let table = load_config_file(Some(&path)).unwrap();
    let args = Args::try_parse_from(std::iter::once("printqueue").chain(cli.iter().copied())).unwrap();
    Settings::resolve(&args, table.as_ref()).unwrap()
}

#[test]
fn test_file_configures_queue() {
    let settings = resolve(
        &[],
        r#"
        capacity = 5
        aging-interval = 3
        expiry-time = 10
        delay-ms = 0
        "#,
    );
    assert_eq!(settings.queue, QueueConfig::new(5, 3, 10));
    assert_eq!(settings.delay, Duration::ZERO);
}

#[test]
fn test_command_line_beats_file() {
    let settings = resolve(
        &["--capacity", "8", "--log-format", "ext", "--no-color"],
        r#"
        capacity = 5
        expiry-time = 12
        log-format = "json"
        color = true
        "#,
    );
    assert_eq!(settings.queue.capacity, 8);
    assert_eq!(settings.queue.expiry_time, 12);
    assert_eq!(settings.log_format, "ext");
    assert_eq!(settings.color, Some(false));
}

#[test]
fn test_verbosity_beats_file_log_level() {
    let settings = resolve(&["-v"], r#"log-level = "warn""#);
    assert_eq!(settings.log_level, "debug");

    let settings = resolve(&[], r#"log-level = "warn""#);
    assert_eq!(settings.log_level, "warn");
}

#[test]
fn test_log_file_from_file_and_cli() {
    let settings = resolve(&[], r#"log-file = "/var/tmp/pq.log""#);
    assert_eq!(settings.log_file, Some(PathBuf::from("/var/tmp/pq.log")));

    let settings = resolve(&["--log-file", "none"], r#"log-file = "/var/tmp/pq.log""#);
    assert_eq!(settings.log_file, None);
}

#[test]
fn test_invalid_values_in_file_rejected() {
    for config in [
        "capacity = 0",
        "aging-interval = -1",
        "expiry-time = \"soon\"",
        "log-format = \"xml\"",
        "color = \"yes\"",
        "delay-ms = -10",
    ] {
        let (_dir, path) = write_config(config);
        let table = load_config_file(Some(&path)).unwrap();
        assert!(
            Settings::resolve(&Args::default(), table.as_ref()).is_err(),
            "accepted {}",
            config
        );
    }
}

#[test]
fn test_missing_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config_file(Some(&dir.path().join("nope.toml"))).unwrap_err();
    match err {
        AppError::Config { message } => assert!(message.contains("does not exist")),
        other => panic!("expected a config error, got {:?}", other),
    }
}

#[test]
fn test_unparseable_file() {
    let (_dir, path) = write_config("capacity = [");
    assert!(matches!(
        load_config_file(Some(&path)),
        Err(AppError::Config { .. })
    ));
}
