//! Point-in-time queue status report

use crate::queue::job::Job;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    pub current_time: u64,
    pub capacity: usize,
    pub size: usize,
    pub ticks_until_next_aging: u64,
    /// Ordered pending jobs, only populated for detailed reports
    pub jobs: Option<Vec<Job>>,
}

impl QueueStatus {
    pub fn header(&self) -> String {
        format!("=== Print Queue Status [Time: {}] ===", self.current_time)
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        writeln!(f, "Capacity: {}/{}", self.size, self.capacity)?;
        writeln!(f, "Jobs in queue: {}", self.size)?;
        write!(f, "Next aging in: {} ticks", self.ticks_until_next_aging)?;

        if let Some(jobs) = self.jobs.as_ref().filter(|jobs| !jobs.is_empty()) {
            write!(f, "\n\nCurrent Queue:")?;
            for (idx, job) in jobs.iter().enumerate() {
                write!(f, "\n{}. {}", idx + 1, job)?;
            }
        }
        Ok(())
    }
}
