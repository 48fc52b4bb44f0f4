pub mod app;
pub mod core;
pub mod queue;
pub mod simulator;

include!(concat!(env!("OUT_DIR"), "/version.rs"));
