//! File-driven event replay
//!
//! Reads a JSON array of events (see [`event`]) and replays it against a
//! fresh [`PrintQueueManager`](crate::queue::PrintQueueManager), reporting
//! one [`EventOutcome`] per event.
//!
//! ```rust,no_run
//! # async fn demo() -> printqueue::simulator::SimulationResult<()> {
//! use printqueue::queue::QueueConfig;
//! use printqueue::simulator::{load_events, Simulator};
//! use std::time::Duration;
//!
//! let events = load_events(std::path::Path::new("events.json")).await?;
//! let simulator = Simulator::new(QueueConfig::default())?;
//! let report = simulator
//!     .run(events, Duration::from_millis(500), |outcome, status| {
//!         println!("{}\n{}", outcome, status);
//!     })
//!     .await;
//! println!("completed: {}", report.completed);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod event;
pub mod runner;

pub use error::{SimulationError, SimulationResult};
pub use event::{load_events, parse_events, ParsedEvent, SimulationEvent};
pub use runner::{EventOutcome, SimulationReport, Simulator};
