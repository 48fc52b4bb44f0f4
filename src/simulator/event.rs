//! Replay events and their JSON encoding
//!
//! An events file is a JSON array of objects tagged by `type`:
//!
//! ```json
//! [
//!   {"type": "enqueue", "user_id": "alice", "job_id": "report", "priority": 2},
//!   {"type": "batch_submit", "jobs": [{"user_id": "bob", "job_id": "memo", "priority": 1}]},
//!   {"type": "tick", "ticks": 3},
//!   {"type": "print"},
//!   {"type": "status", "detailed": false}
//! ]
//! ```
//!
//! Each element is decoded on its own, so one malformed event does not
//! invalidate the rest of the file.

use crate::queue::{JobRequest, PRIORITY_FLOOR};
use crate::simulator::error::{SimulationError, SimulationResult};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const KNOWN_EVENT_TYPES: &[&str] = &["enqueue", "batch_submit", "tick", "print", "status"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimulationEvent {
    Enqueue {
        user_id: String,
        job_id: String,
        #[serde(default)]
        priority: i64,
    },
    BatchSubmit {
        #[serde(default)]
        jobs: Vec<JobRequest>,
    },
    Tick {
        #[serde(default = "default_ticks")]
        ticks: u32,
    },
    /// Dequeue the most urgent job without blocking and complete it
    Print,
    Status {
        #[serde(default = "default_detailed")]
        detailed: bool,
    },
    /// A well-formed event whose `type` this runner does not handle
    #[serde(skip_deserializing)]
    Unknown { event_type: String },
}

fn default_ticks() -> u32 {
    1
}

fn default_detailed() -> bool {
    true
}

/// Per-event decode result; `Err` entries are skipped by the runner
pub type ParsedEvent = Result<SimulationEvent, SimulationError>;

impl SimulationEvent {
    fn from_value(index: usize, value: Value) -> ParsedEvent {
        let invalid = |message: String| SimulationError::InvalidEvent { index, message };

        let event_type = match value.get("type").and_then(Value::as_str) {
            Some(event_type) => event_type.to_string(),
            None => return Err(invalid("missing string field `type`".to_string())),
        };
        if !KNOWN_EVENT_TYPES.contains(&event_type.as_str()) {
            return Ok(SimulationEvent::Unknown { event_type });
        }

        let event: SimulationEvent =
            serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
        event.check_fields().map_err(invalid)?;
        Ok(event)
    }

    // Batch entries are left to the queue, which counts each bad entry as a failure
    fn check_fields(&self) -> Result<(), String> {
        if let SimulationEvent::Enqueue {
            user_id,
            job_id,
            priority,
        } = self
        {
            if user_id.trim().is_empty() || job_id.trim().is_empty() {
                return Err("enqueue requires non-empty user_id and job_id".to_string());
            }
            if *priority < PRIORITY_FLOOR {
                return Err(format!("priority {} is negative", priority));
            }
        }
        Ok(())
    }
}

/// Decode a JSON array of events
///
/// Fails as a whole only when the input is not a JSON array.
pub fn parse_events(input: &str) -> SimulationResult<Vec<ParsedEvent>> {
    let values: Vec<Value> =
        serde_json::from_str(input).map_err(|e| SimulationError::Parse {
            message: format!("expected a JSON array of events: {}", e),
        })?;

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(index, value)| SimulationEvent::from_value(index, value))
        .collect())
}

pub async fn load_events(path: &Path) -> SimulationResult<Vec<ParsedEvent>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SimulationError::Io {
            path: path.display().to_string(),
            source,
        })?;
    parse_events(&contents)
}
