//! Append-only event log
//!
//! Every state transition of the queue records a [`HistoryEntry`] carrying
//! the logical time, the event kind and a snapshot of the ordered queue.

use crate::queue::job::Job;
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    Enqueue,
    Dequeue,
    Complete,
    Aging,
    Expire,
    Tick,
    BatchSubmit,
    Shutdown,
}

/// Structured data attached to some events
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPayload {
    Tick {
        current_time: u64,
        expired_jobs: Vec<String>,
    },
    Aging {
        aged_jobs: Vec<String>,
    },
    BatchSubmit {
        success: usize,
        failed: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Logical clock value when the event happened
    pub timestamp: u64,
    pub event: EventKind,
    pub job_id: Option<String>,
    pub queue_size: usize,
    /// Job descriptions in queue order after the event
    pub queue_state: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<EventPayload>,
}

impl HistoryEntry {
    /// Expired job ids for a tick entry, empty for any other kind
    pub fn expired_jobs(&self) -> &[String] {
        match &self.payload {
            Some(EventPayload::Tick { expired_jobs, .. }) => expired_jobs,
            _ => &[],
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct EventLog {
    entries: Vec<HistoryEntry>,
}

impl EventLog {
    pub(crate) fn record(
        &mut self,
        timestamp: u64,
        event: EventKind,
        job_id: Option<&str>,
        queue: &[Job],
        payload: Option<EventPayload>,
    ) {
        log::trace!("history: {} {:?} at t={}", event, job_id, timestamp);
        self.entries.push(HistoryEntry {
            timestamp,
            event,
            job_id: job_id.map(str::to_string),
            queue_size: queue.len(),
            queue_state: queue.iter().map(Job::to_string).collect(),
            payload,
        });
    }

    pub(crate) fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
