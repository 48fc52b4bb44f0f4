//! Command-line parsing and configuration file handling

pub mod args;
pub mod config;

pub use args::{Args, Command, SimulateArgs};
pub use config::{default_config_path, load_config_file, Settings};
