//! PrintQueueManager - bounded priority queue with aging and expiry
//!
//! The manager owns every job record, the logical clock and the event log
//! behind one mutex. Blocking consumers park on a condition variable bound
//! to that same mutex.

use crate::queue::config::QueueConfig;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::history::{EventKind, EventLog, EventPayload, HistoryEntry};
use crate::queue::job::{queue_order, Job, JobRequest, JobStatus};
use crate::queue::status::QueueStatus;
use std::collections::HashMap;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Aggregate outcome of [`PrintQueueManager::submit_batch`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub success_count: usize,
    pub failed_count: usize,
    /// Ids of the rejected entries, in submission order
    pub failed_jobs: Vec<String>,
}

/// What a single [`PrintQueueManager::tick`] changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub current_time: u64,
    /// Jobs whose priority was lowered this tick
    pub aged_jobs: Vec<String>,
    /// Jobs removed because they waited longer than the expiry time
    pub expired_jobs: Vec<String>,
}

/// Shared mutable state, only touched while holding the manager lock
#[derive(Debug, Default)]
struct QueueState {
    /// Pending jobs, kept sorted by [`queue_order`]
    jobs: Vec<Job>,
    /// Dequeued jobs awaiting completion, keyed by job id
    printing: HashMap<String, Job>,
    history: EventLog,
    current_time: u64,
    shutdown: bool,
}

impl QueueState {
    fn sort(&mut self) {
        self.jobs.sort_by(queue_order);
    }

    fn log(&mut self, event: EventKind, job_id: Option<&str>, payload: Option<EventPayload>) {
        self.history
            .record(self.current_time, event, job_id, &self.jobs, payload);
    }

    fn is_active_id(&self, job_id: &str) -> bool {
        self.printing.contains_key(job_id) || self.jobs.iter().any(|j| j.job_id() == job_id)
    }

    fn admit(&mut self, capacity: usize, request: JobRequest) -> QueueResult<()> {
        if self.shutdown {
            return Err(QueueError::ShutDown);
        }
        if request.user_id.trim().is_empty() {
            return Err(QueueError::InvalidJob {
                reason: "user id must not be empty".to_string(),
            });
        }
        if request.job_id.trim().is_empty() {
            return Err(QueueError::InvalidJob {
                reason: "job id must not be empty".to_string(),
            });
        }
        if request.priority < 0 {
            return Err(QueueError::InvalidPriority {
                priority: request.priority,
            });
        }
        if self.jobs.len() >= capacity {
            return Err(QueueError::QueueFull { capacity });
        }
        if self.is_active_id(&request.job_id) {
            return Err(QueueError::DuplicateJob {
                job_id: request.job_id,
            });
        }

        let job = Job::pending(request, self.current_time);
        let job_id = job.job_id().to_string();
        self.jobs.push(job);
        self.sort();
        self.log(EventKind::Enqueue, Some(&job_id), None);
        log::debug!("enqueued {} (queue size {})", job_id, self.jobs.len());
        Ok(())
    }

    fn take_next(&mut self) -> Option<Job> {
        if self.jobs.is_empty() {
            return None;
        }
        let mut job = self.jobs.remove(0);
        job.set_status(JobStatus::Printing);
        self.printing.insert(job.job_id().to_string(), job.clone());
        self.log(EventKind::Dequeue, Some(job.job_id()), None);
        log::debug!("dequeued {} for printing", job.job_id());
        Some(job)
    }

    fn apply_aging(&mut self, aging_interval: u64) -> Vec<String> {
        let mut aged = Vec::new();
        for job in self.jobs.iter_mut() {
            if job.is_aging_due(aging_interval) && job.age() {
                aged.push(job.job_id().to_string());
            }
        }
        self.sort();
        aged
    }

    fn remove_expired(&mut self, expiry_time: u64) -> Vec<String> {
        let (expired, remaining): (Vec<Job>, Vec<Job>) = std::mem::take(&mut self.jobs)
            .into_iter()
            .partition(|job| job.waiting_time() > expiry_time);
        self.jobs = remaining;

        let mut expired_ids = Vec::with_capacity(expired.len());
        for mut job in expired {
            job.set_status(JobStatus::Expired);
            log::info!("job {} expired after waiting {} ticks", job.job_id(), job.waiting_time());
            self.log(EventKind::Expire, Some(job.job_id()), None);
            expired_ids.push(job.job_id().to_string());
        }
        expired_ids
    }
}

/// Bounded print queue shared by concurrent producers and consumers
///
/// Wrap in `Arc` to share across threads. Every operation takes the single
/// state lock for its full duration, so no caller ever observes a
/// half-applied mutation.
///
/// # Example
///
/// ```rust
/// use printqueue::queue::PrintQueueManager;
///
/// let queue = PrintQueueManager::new(5, 3, 10).unwrap();
/// queue.enqueue("user1", "doc1", 2).unwrap();
/// queue.enqueue("user2", "doc2", 1).unwrap();
///
/// let job = queue.dequeue(false).unwrap();
/// assert_eq!(job.job_id(), "doc2");
/// ```
#[derive(Debug)]
pub struct PrintQueueManager {
    config: QueueConfig,
    state: Mutex<QueueState>,
    job_available: Condvar,
}

impl PrintQueueManager {
    pub fn new(capacity: usize, aging_interval: u64, expiry_time: u64) -> QueueResult<Self> {
        Self::with_config(QueueConfig::new(capacity, aging_interval, expiry_time))
    }

    pub fn with_config(config: QueueConfig) -> QueueResult<Self> {
        config.validate()?;
        log::debug!(
            "creating print queue: capacity={}, aging_interval={}, expiry_time={}",
            config.capacity,
            config.aging_interval,
            config.expiry_time
        );
        Ok(Self {
            config,
            state: Mutex::new(QueueState::default()),
            job_available: Condvar::new(),
        })
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    // A panic in another holder must not take the whole queue down with it
    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit a job
    ///
    /// Fails without side effects when the queue is full, the job id is
    /// already pending or printing, the priority is negative, or the queue
    /// has been shut down.
    pub fn enqueue(&self, user_id: &str, job_id: &str, priority: i64) -> QueueResult<()> {
        self.submit(JobRequest::new(user_id, job_id, priority))
    }

    /// Submit a prepared [`JobRequest`]
    pub fn submit(&self, request: JobRequest) -> QueueResult<()> {
        let mut state = self.lock_state();
        let job_id = request.job_id.clone();
        match state.admit(self.config.capacity, request) {
            Ok(()) => {
                self.job_available.notify_all();
                Ok(())
            }
            Err(e) => {
                log::warn!("rejected job {}: {}", job_id, e);
                Err(e)
            }
        }
    }

    /// Submit several jobs atomically with respect to other operations
    ///
    /// Entries are attempted in order; earlier successes are kept when a
    /// later entry fails.
    pub fn submit_batch(&self, requests: &[JobRequest]) -> BatchResult {
        let mut state = self.lock_state();
        let mut result = BatchResult::default();

        for request in requests {
            match state.admit(self.config.capacity, request.clone()) {
                Ok(()) => result.success_count += 1,
                Err(e) => {
                    log::warn!("batch entry {} rejected: {}", request.job_id, e);
                    result.failed_count += 1;
                    result.failed_jobs.push(request.job_id.clone());
                }
            }
        }

        state.log(
            EventKind::BatchSubmit,
            None,
            Some(EventPayload::BatchSubmit {
                success: result.success_count,
                failed: result.failed_count,
            }),
        );
        if result.success_count > 0 {
            self.job_available.notify_all();
        }
        result
    }

    /// Take the most urgent job and mark it Printing
    ///
    /// Non-blocking calls return `None` on an empty queue. Blocking calls
    /// wait until a job arrives or the queue shuts down. After shutdown this
    /// always returns `None`; check [`is_shutdown`](Self::is_shutdown) to tell
    /// the two apart.
    pub fn dequeue(&self, blocking: bool) -> Option<Job> {
        let mut state = self.lock_state();
        if blocking {
            state = self
                .job_available
                .wait_while(state, |s| s.jobs.is_empty() && !s.shutdown)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.shutdown {
            return None;
        }
        state.take_next()
    }

    /// Mark a printing job Completed and release its id
    pub fn complete(&self, job_id: &str) -> QueueResult<Job> {
        let mut state = self.lock_state();
        let mut job = state
            .printing
            .remove(job_id)
            .ok_or_else(|| QueueError::JobNotPrinting {
                job_id: job_id.to_string(),
            })?;
        job.set_status(JobStatus::Completed);
        state.log(EventKind::Complete, Some(job_id), None);
        log::debug!("completed {}", job_id);
        Ok(job)
    }

    /// Advance the logical clock by one
    ///
    /// Every pending job waits one more tick, jobs landing on an aging
    /// boundary gain one step of urgency, and jobs waiting longer than the
    /// expiry time are removed.
    pub fn tick(&self) -> TickReport {
        let mut state = self.lock_state();
        state.current_time += 1;
        for job in state.jobs.iter_mut() {
            job.wait_one_tick();
        }

        let aged_jobs = state.apply_aging(self.config.aging_interval);
        if !aged_jobs.is_empty() {
            state.log(
                EventKind::Aging,
                None,
                Some(EventPayload::Aging {
                    aged_jobs: aged_jobs.clone(),
                }),
            );
        }

        let expired_jobs = state.remove_expired(self.config.expiry_time);
        state.sort();

        let current_time = state.current_time;
        state.log(
            EventKind::Tick,
            None,
            Some(EventPayload::Tick {
                current_time,
                expired_jobs: expired_jobs.clone(),
            }),
        );
        log::debug!(
            "tick {}: {} aged, {} expired",
            current_time,
            aged_jobs.len(),
            expired_jobs.len()
        );

        TickReport {
            current_time,
            aged_jobs,
            expired_jobs,
        }
    }

    pub fn status(&self, detailed: bool) -> QueueStatus {
        let state = self.lock_state();
        QueueStatus {
            current_time: state.current_time,
            capacity: self.config.capacity,
            size: state.jobs.len(),
            ticks_until_next_aging: self.config.aging_interval
                - (state.current_time % self.config.aging_interval),
            jobs: detailed.then(|| state.jobs.clone()),
        }
    }

    /// Copy of the full event log
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.lock_state().history.entries().to_vec()
    }

    /// Ordered copy of the pending jobs
    pub fn pending_jobs(&self) -> Vec<Job> {
        self.lock_state().jobs.clone()
    }

    /// Copy of the jobs dequeued but not yet completed, in no particular order
    pub fn printing_jobs(&self) -> Vec<Job> {
        self.lock_state().printing.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock_state().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_state().jobs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lock_state().jobs.len() >= self.config.capacity
    }

    pub fn current_time(&self) -> u64 {
        self.lock_state().current_time
    }

    pub fn is_shutdown(&self) -> bool {
        self.lock_state().shutdown
    }

    /// Stop the queue and release every blocked consumer. Safe to call repeatedly.
    pub fn shutdown(&self) {
        let mut state = self.lock_state();
        if !state.shutdown {
            state.shutdown = true;
            state.log(EventKind::Shutdown, None, None);
            log::info!("print queue shut down with {} pending jobs", state.jobs.len());
        }
        self.job_available.notify_all();
    }
}
