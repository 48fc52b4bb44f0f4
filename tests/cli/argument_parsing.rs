//! CLI argument parsing tests

use clap::Parser;
use printqueue::app::cli::{Args, Command, SimulateArgs};
use std::path::PathBuf;

static COMMAND_NAME: &str = "printqueue";

fn parse(args: &[&str]) -> Result<Args, clap::Error> {
    Args::try_parse_from(std::iter::once(COMMAND_NAME).chain(args.iter().copied()))
}

#[test]
fn test_simulate_with_all_options() {
    let args = parse(&[
        "--capacity",
        "5",
        "--aging-interval",
        "3",
        "--expiry-time",
        "10",
        "simulate",
        "events.json",
        "--delay-ms",
        "0",
        "--json-history",
    ])
    .unwrap();

    assert_eq!(args.capacity, Some(5));
    assert_eq!(args.aging_interval, Some(3));
    assert_eq!(args.expiry_time, Some(10));
    assert_eq!(
        args.selected_command(),
        Command::Simulate(SimulateArgs {
            file: PathBuf::from("events.json"),
            delay_ms: Some(0),
            json_history: true,
        })
    );
}

#[test]
fn test_simulate_requires_file() {
    assert!(parse(&["simulate"]).is_err());
}

#[test]
fn test_shell_is_explicit_or_default() {
    assert_eq!(parse(&["shell"]).unwrap().selected_command(), Command::Shell);
    assert_eq!(parse(&[]).unwrap().selected_command(), Command::Shell);
}

#[test]
fn test_logging_options() {
    let args = parse(&[
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "--log-file",
        "/tmp/printqueue.log",
    ])
    .unwrap();
    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format.as_deref(), Some("json"));
    assert_eq!(args.log_file, Some(PathBuf::from("/tmp/printqueue.log")));

    assert!(parse(&["--log-level", "loud"]).is_err());
}

#[test]
fn test_verbosity_counts() {
    assert_eq!(parse(&["-vv"]).unwrap().verbosity(), 2);
    assert_eq!(parse(&["-q"]).unwrap().verbosity(), -1);
    assert!(parse(&["-v", "-q"]).is_err());
}

#[test]
fn test_non_numeric_queue_option_rejected() {
    assert!(parse(&["--capacity", "lots"]).is_err());
    assert!(parse(&["--expiry-time", "-4"]).is_err());
}

#[test]
fn test_colour_flags() {
    assert_eq!(parse(&["--color"]).unwrap().color_override(), Some(true));
    assert_eq!(parse(&["--no-color"]).unwrap().color_override(), Some(false));
    assert_eq!(
        parse(&["--no-color", "--color"]).unwrap().color_override(),
        Some(true)
    );
}
