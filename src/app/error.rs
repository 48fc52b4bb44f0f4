//! Application-level error type for the binary

use crate::core::error_handling::ContextualError;
use crate::core::validation::ValidationError;
use crate::queue::QueueError;
use crate::simulator::SimulationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Configuration file missing, unreadable or not valid TOML
    #[error("{message}")]
    Config { message: String },

    #[error("Could not initialise logging: {message}")]
    Logging { message: String },

    #[error("Could not start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Could not encode event history: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AppError::Validation(e) => e.is_user_actionable(),
            AppError::Simulation(e) => e.is_user_actionable(),
            AppError::Queue(QueueError::InvalidConfig { .. }) => true,
            AppError::Config { .. } => true,
            _ => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            AppError::Validation(e) => e.user_message(),
            AppError::Simulation(e) => e.user_message(),
            AppError::Queue(QueueError::InvalidConfig { message }) => Some(message),
            AppError::Config { message } => Some(message),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
