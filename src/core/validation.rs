//! Validation of user-supplied settings
//!
//! Used by the CLI and TOML config layers before a queue is built.

use crate::core::error_handling::ContextualError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub const LOG_FORMATS: &[&str] = &["text", "ext", "json"];
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace", "off"];

/// Validate a strictly positive integer setting named `field`
pub fn validate_positive_int(field: &str, value: i64) -> ValidationResult<u64> {
    if value <= 0 {
        return Err(ValidationError::new(format!(
            "{} must be greater than 0 (got {})",
            field, value
        )));
    }
    Ok(value as u64)
}

pub fn validate_log_format(format: &str) -> ValidationResult<String> {
    let lowered = format.to_ascii_lowercase();
    if LOG_FORMATS.contains(&lowered.as_str()) {
        Ok(lowered)
    } else {
        Err(ValidationError::new(format!(
            "Invalid log format '{}'. Expected one of: {}",
            format,
            LOG_FORMATS.join(", ")
        )))
    }
}

pub fn validate_log_level(level: &str) -> ValidationResult<String> {
    let lowered = level.to_ascii_lowercase();
    if LOG_LEVELS.contains(&lowered.as_str()) {
        Ok(lowered)
    } else {
        Err(ValidationError::new(format!(
            "Invalid log level '{}'. Expected one of: {}",
            level,
            LOG_LEVELS.join(", ")
        )))
    }
}
