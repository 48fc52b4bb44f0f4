//! Event replay runner
//!
//! Feeds decoded events to one queue instance with a pause between events.
//! A run stops early on [`Simulator::stop`] or when the shutdown channel
//! fires, and always shuts its queue down before returning.

use crate::queue::{BatchResult, PrintQueueManager, QueueConfig, QueueError, QueueStatus};
use crate::simulator::error::SimulationResult;
use crate::simulator::event::{ParsedEvent, SimulationEvent};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Notify};

/// What the runner did with one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Enqueued {
        user_id: String,
        job_id: String,
        priority: i64,
    },
    EnqueueFailed {
        job_id: String,
        error: QueueError,
    },
    BatchSubmitted(BatchResult),
    EmptyBatch,
    Ticked {
        ticks: u32,
        expired_jobs: Vec<String>,
    },
    Printed {
        job_id: String,
        user_id: String,
    },
    NothingToPrint,
    Status(QueueStatus),
    /// Malformed or unknown events; the queue never saw them
    Ignored {
        reason: String,
    },
}

impl EventOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, EventOutcome::Ignored { .. })
    }
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventOutcome::Enqueued {
                user_id,
                job_id,
                priority,
            } => write!(f, "Added job {} from {} (priority {})", job_id, user_id, priority),
            EventOutcome::EnqueueFailed {
                job_id,
                error: QueueError::QueueFull { .. },
            } => write!(f, "Queue full! Could not add job {}", job_id),
            EventOutcome::EnqueueFailed { job_id, error } => {
                write!(f, "Could not add job {}: {}", job_id, error)
            }
            EventOutcome::BatchSubmitted(result) => write!(
                f,
                "Batch submit: {} succeeded, {} failed",
                result.success_count, result.failed_count
            ),
            EventOutcome::EmptyBatch => write!(f, "Empty batch submission"),
            EventOutcome::Ticked { ticks, .. } => write!(f, "Advanced time by {} tick(s)", ticks),
            EventOutcome::Printed { job_id, user_id } => {
                write!(f, "Printed job {} from {}", job_id, user_id)
            }
            EventOutcome::NothingToPrint => write!(f, "No jobs available to print"),
            EventOutcome::Status(status) => write!(f, "{}", status),
            EventOutcome::Ignored { reason } => write!(f, "Skipped event: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    /// One outcome per event handled, in file order
    pub outcomes: Vec<EventOutcome>,
    /// False when the run was stopped before the last event
    pub completed: bool,
}

impl SimulationReport {
    pub fn ignored_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ignored()).count()
    }
}

#[derive(Debug, Clone)]
pub struct Simulator {
    queue: Arc<PrintQueueManager>,
    running: Arc<AtomicBool>,
    stop_notify: Arc<Notify>,
}

impl Simulator {
    pub fn new(config: QueueConfig) -> SimulationResult<Self> {
        let queue = PrintQueueManager::with_config(config)?;
        Ok(Self::with_queue(Arc::new(queue)))
    }

    /// Drive an existing queue, e.g. one shared with other producers
    pub fn with_queue(queue: Arc<PrintQueueManager>) -> Self {
        Self {
            queue,
            running: Arc::new(AtomicBool::new(false)),
            stop_notify: Arc::new(Notify::new()),
        }
    }

    pub fn queue(&self) -> &Arc<PrintQueueManager> {
        &self.queue
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop after the event in progress and shut the queue down
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        self.stop_notify.notify_one();
        self.queue.shutdown();
    }

    /// Apply one event to the queue
    pub fn handle_event(&self, event: &SimulationEvent) -> EventOutcome {
        let outcome = match event {
            SimulationEvent::Enqueue {
                user_id,
                job_id,
                priority,
            } => match self.queue.enqueue(user_id, job_id, *priority) {
                Ok(()) => EventOutcome::Enqueued {
                    user_id: user_id.clone(),
                    job_id: job_id.clone(),
                    priority: *priority,
                },
                Err(error) => EventOutcome::EnqueueFailed {
                    job_id: job_id.clone(),
                    error,
                },
            },
            SimulationEvent::BatchSubmit { jobs } if jobs.is_empty() => {
                log::warn!("Empty batch submission");
                EventOutcome::EmptyBatch
            }
            SimulationEvent::BatchSubmit { jobs } => {
                EventOutcome::BatchSubmitted(self.queue.submit_batch(jobs))
            }
            SimulationEvent::Tick { ticks } => {
                let mut expired_jobs = Vec::new();
                for _ in 0..*ticks {
                    expired_jobs.extend(self.queue.tick().expired_jobs);
                }
                EventOutcome::Ticked {
                    ticks: *ticks,
                    expired_jobs,
                }
            }
            SimulationEvent::Print => self.print_next(),
            SimulationEvent::Status { detailed } => {
                EventOutcome::Status(self.queue.status(*detailed))
            }
            SimulationEvent::Unknown { event_type } => {
                log::warn!("Unknown event type '{}'", event_type);
                EventOutcome::Ignored {
                    reason: format!("unknown event type '{}'", event_type),
                }
            }
        };
        log::debug!("{}", outcome);
        outcome
    }

    fn print_next(&self) -> EventOutcome {
        let Some(job) = self.queue.dequeue(false) else {
            return EventOutcome::NothingToPrint;
        };
        if let Err(e) = self.queue.complete(job.job_id()) {
            log::warn!("Printed job {} could not be completed: {}", job.job_id(), e);
        }
        EventOutcome::Printed {
            job_id: job.job_id().to_string(),
            user_id: job.user_id().to_string(),
        }
    }

    /// Replay `events`, pausing `delay` between them
    ///
    /// `on_event` sees every outcome together with a detailed status taken
    /// right after the event. Malformed events become
    /// [`EventOutcome::Ignored`] and do not touch the queue. Nothing is
    /// replayed once the queue is shut down, including by a `stop()` that
    /// landed before the run started.
    pub async fn run<F>(&self, events: Vec<ParsedEvent>, delay: Duration, mut on_event: F) -> SimulationReport
    where
        F: FnMut(&EventOutcome, &QueueStatus),
    {
        self.running.store(true, Ordering::Release);
        let total = events.len();
        log::info!("Starting simulation with {} events", total);

        let mut outcomes = Vec::with_capacity(total);
        for (index, event) in events.into_iter().enumerate() {
            if !self.is_running() || self.queue.is_shutdown() {
                log::info!("Simulation stopped after {} of {} events", index, total);
                break;
            }

            let outcome = match event {
                Ok(event) => self.handle_event(&event),
                Err(e) => {
                    log::warn!("{}", e);
                    EventOutcome::Ignored {
                        reason: e.to_string(),
                    }
                }
            };
            on_event(&outcome, &self.queue.status(true));
            outcomes.push(outcome);

            if index + 1 < total && !delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = self.stop_notify.notified() => {}
                }
            }
        }

        let completed = outcomes.len() == total;
        self.running.store(false, Ordering::Release);
        self.queue.shutdown();
        log::info!(
            "Simulation ended at time {} with {} jobs pending",
            self.queue.current_time(),
            self.queue.len()
        );

        SimulationReport {
            outcomes,
            completed,
        }
    }

    /// [`Simulator::run`] that also stops when `shutdown_rx` fires
    pub async fn run_until_shutdown<F>(
        &self,
        events: Vec<ParsedEvent>,
        delay: Duration,
        mut shutdown_rx: broadcast::Receiver<()>,
        on_event: F,
    ) -> SimulationReport
    where
        F: FnMut(&EventOutcome, &QueueStatus),
    {
        let stopper = self.clone();
        let watcher = tokio::spawn(async move {
            if !matches!(
                shutdown_rx.recv().await,
                Err(broadcast::error::RecvError::Closed)
            ) {
                stopper.stop();
            }
        });

        let report = self.run(events, delay, on_event).await;
        watcher.abort();
        report
    }
}
