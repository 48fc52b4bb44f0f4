//! Application layer: CLI, interactive shell and startup

pub mod cli;
pub mod display;
pub mod error;
pub mod shell;
pub mod startup;
