//! Print Queue Core
//!
//! A bounded, priority-ordered print-job queue driven by a logical clock.
//! Producers submit jobs, consumers take the most urgent one, and an external
//! driver advances time with [`PrintQueueManager::tick`].
//!
//! # Overview
//!
//! - **Capacity**: at most `capacity` pending jobs; extra submissions fail, nothing is evicted
//! - **Ordering**: lower priority value first, longer-waiting job first among equals
//! - **Aging**: a job gains one step of urgency every `aging_interval` ticks it waits
//! - **Expiry**: a job waiting more than `expiry_time` ticks is dropped
//! - **Blocking dequeue**: consumers may park until a job arrives or the queue shuts down
//! - **History**: every transition is appended to an in-memory event log
//!
//! # Architecture
//!
//! ```text
//!  producers                     driver                     consumers
//!  enqueue / submit_batch        tick()                     dequeue(blocking)
//!        │                         │                              ▲
//!        ▼                         ▼                              │
//! ┌────────────────────────────────────────────────────────────────┴──┐
//! │ PrintQueueManager                                                  │
//! │   Mutex<QueueState> ── jobs (sorted) · printing · clock · history  │
//! │   Condvar ─────────── notify_all on enqueue / shutdown             │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use printqueue::queue::{JobStatus, PrintQueueManager};
//!
//! let queue = PrintQueueManager::new(5, 3, 10).unwrap();
//! queue.enqueue("user1", "doc1", 2).unwrap();
//!
//! for _ in 0..3 {
//!     queue.tick();
//! }
//! assert_eq!(queue.pending_jobs()[0].priority(), 1);
//!
//! let job = queue.dequeue(false).unwrap();
//! let done = queue.complete(job.job_id()).unwrap();
//! assert_eq!(done.status(), JobStatus::Completed);
//! ```

mod config;
mod error;
mod history;
mod job;
mod manager;
mod status;

pub use config::{QueueConfig, DEFAULT_AGING_INTERVAL, DEFAULT_CAPACITY, DEFAULT_EXPIRY_TIME};
pub use error::{QueueError, QueueResult};
pub use history::{EventKind, EventPayload, HistoryEntry};
pub use job::{queue_order, Job, JobRequest, JobStatus, PRIORITY_FLOOR};
pub use manager::{BatchResult, PrintQueueManager, TickReport};
pub use status::QueueStatus;

#[cfg(test)]
mod tests;
