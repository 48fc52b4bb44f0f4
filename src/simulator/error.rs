//! Simulator Error Types

use crate::queue::QueueError;

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// Events file could not be read
    #[error("Could not read events file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Events file is not a JSON array
    #[error("Could not parse events: {message}")]
    Parse { message: String },

    /// A single event is malformed; the rest of the file is still usable
    #[error("Event #{index} is invalid: {message}")]
    InvalidEvent { index: usize, message: String },

    /// The queue rejected the simulator's own configuration
    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl crate::core::error_handling::ContextualError for SimulationError {
    fn is_user_actionable(&self) -> bool {
        match self {
            SimulationError::Parse { .. } => true,
            SimulationError::InvalidEvent { .. } => true,
            SimulationError::Queue(QueueError::InvalidConfig { .. }) => true,
            SimulationError::Queue(_) => false,
            SimulationError::Io { .. } => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            SimulationError::Parse { message } => Some(message),
            SimulationError::InvalidEvent { message, .. } => Some(message),
            SimulationError::Queue(QueueError::InvalidConfig { message }) => Some(message),
            _ => None,
        }
    }
}

pub type SimulationResult<T> = Result<T, SimulationError>;
