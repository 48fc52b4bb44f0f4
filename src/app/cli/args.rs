//! Command-line arguments
//!
//! Global options configure the queue and logging and may appear before or
//! after the sub-command. Every option left unset falls back to the TOML
//! configuration file and then to built-in defaults.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "printqueue")]
#[command(about = "Bounded print-job queue simulator with priority aging and job expiry")]
#[command(version, long_version = crate::LONG_VERSION)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Maximum number of pending jobs
    #[arg(long, value_name = "JOBS", global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub capacity: Option<u64>,

    /// Ticks a job must wait per step of priority aging
    #[arg(long = "aging-interval", value_name = "TICKS", global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub aging_interval: Option<u64>,

    /// Ticks a job may wait before it expires
    #[arg(long = "expiry-time", value_name = "TICKS", global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub expiry_time: Option<u64>,

    /// Log level
    #[arg(long = "log-level", value_name = "LEVEL", global = true, value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", global = true, value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to log to stderr)
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Force coloured output
    #[arg(long = "color", global = true, overrides_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color", global = true, overrides_with = "color")]
    pub no_color: bool,

    /// More log output (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive queue shell (default)
    Shell,
    /// Replay a JSON events file against a fresh queue
    Simulate(SimulateArgs),
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct SimulateArgs {
    /// JSON file holding an array of events
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Pause between events in milliseconds
    #[arg(long = "delay-ms", value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Print the full event history as JSON when the replay ends
    #[arg(long = "json-history")]
    pub json_history: bool,
}

impl Args {
    /// `--color` → `Some(true)`, `--no-color` → `Some(false)`, neither → `None`
    pub fn color_override(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Net `-v`/`-q` count
    pub fn verbosity(&self) -> i8 {
        let verbose = self.verbose.min(i8::MAX as u8) as i8;
        let quiet = self.quiet.min(i8::MAX as u8) as i8;
        verbose - quiet
    }

    /// The sub-command to run, `shell` when none was given
    pub fn selected_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Shell)
    }
}
