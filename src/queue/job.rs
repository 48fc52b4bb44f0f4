//! Print job records
//!
//! A [`Job`] is owned by the queue. Callers only ever receive clones, and
//! every mutator is crate-private so a record can only change while the
//! queue lock is held.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use strum_macros::{AsRefStr, Display};

/// Lowest value a job's priority can reach through aging
pub const PRIORITY_FLOOR: i64 = 0;

/// Lifecycle of a print job
///
/// Pending -> Printing -> Completed, or Pending -> Expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
pub enum JobStatus {
    Pending,
    Printing,
    Completed,
    Expired,
}

/// A submission request: what a producer hands to the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    pub user_id: String,
    pub job_id: String,
    pub priority: i64,
}

impl JobRequest {
    pub fn new(user_id: impl Into<String>, job_id: impl Into<String>, priority: i64) -> Self {
        Self {
            user_id: user_id.into(),
            job_id: job_id.into(),
            priority,
        }
    }
}

/// A print job tracked by the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    user_id: String,
    job_id: String,
    priority: i64,
    waiting_time: u64,
    created_at: u64,
    status: JobStatus,
}

impl Job {
    pub(crate) fn pending(request: JobRequest, created_at: u64) -> Self {
        Self {
            user_id: request.user_id,
            job_id: request.job_id,
            priority: request.priority,
            waiting_time: 0,
            created_at,
            status: JobStatus::Pending,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// Ticks spent pending
    pub fn waiting_time(&self) -> u64 {
        self.waiting_time
    }

    /// Logical tick at which the job was enqueued
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Advance the waiting counter. Frozen once the job leaves Pending.
    pub(crate) fn wait_one_tick(&mut self) {
        if self.status == JobStatus::Pending {
            self.waiting_time += 1;
        }
    }

    /// Whether this tick lands on an aging boundary for the job
    pub(crate) fn is_aging_due(&self, aging_interval: u64) -> bool {
        self.status == JobStatus::Pending
            && self.waiting_time > 0
            && self.waiting_time % aging_interval == 0
    }

    /// Lower the priority value by one step. Returns false when already at the floor.
    pub(crate) fn age(&mut self) -> bool {
        if self.priority > PRIORITY_FLOOR {
            self.priority -= 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_status(&mut self, status: JobStatus) {
        self.status = status;
    }
}

/// Queue order: lower priority value first, then longer waiting time first.
///
/// Jobs equal on both keys compare equal, so a stable sort keeps them in
/// submission order.
pub fn queue_order(a: &Job, b: &Job) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| b.waiting_time.cmp(&a.waiting_time))
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Job {} (User: {}) - Priority: {}, Waiting: {}s, Status: {}",
            self.job_id, self.user_id, self.priority, self.waiting_time, self.status
        )
    }
}
