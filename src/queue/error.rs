//! Queue Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Queue is full (capacity: {capacity})")]
    QueueFull { capacity: usize },

    #[error("Job {job_id} is already pending or printing")]
    DuplicateJob { job_id: String },

    #[error("Invalid priority {priority}: priority must be a non-negative integer")]
    InvalidPriority { priority: i64 },

    #[error("Invalid job: {reason}")]
    InvalidJob { reason: String },

    #[error("Job {job_id} is not currently printing")]
    JobNotPrinting { job_id: String },

    #[error("Queue has been shut down")]
    ShutDown,

    #[error("Invalid queue configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
