//! Queue configuration

use crate::queue::error::{QueueError, QueueResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPACITY: usize = 10;
pub const DEFAULT_AGING_INTERVAL: u64 = 5;
pub const DEFAULT_EXPIRY_TIME: u64 = 30;

/// Tunables for a [`PrintQueueManager`](crate::queue::PrintQueueManager).
///
/// All three values must be strictly positive. `aging_interval` and
/// `expiry_time` are measured in logical ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum number of pending jobs
    pub capacity: usize,
    /// Waiting ticks between priority aging steps
    pub aging_interval: u64,
    /// A job waiting strictly longer than this is expired
    pub expiry_time: u64,
}

impl QueueConfig {
    pub fn new(capacity: usize, aging_interval: u64, expiry_time: u64) -> Self {
        Self {
            capacity,
            aging_interval,
            expiry_time,
        }
    }

    pub fn validate(&self) -> QueueResult<()> {
        if self.capacity == 0 {
            return Err(QueueError::InvalidConfig {
                message: "capacity must be greater than 0".to_string(),
            });
        }
        if self.aging_interval == 0 {
            return Err(QueueError::InvalidConfig {
                message: "aging interval must be greater than 0".to_string(),
            });
        }
        if self.expiry_time == 0 {
            return Err(QueueError::InvalidConfig {
                message: "expiry time must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_AGING_INTERVAL, DEFAULT_EXPIRY_TIME)
    }
}
