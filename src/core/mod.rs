//! Cross-cutting infrastructure: logging, errors, styling and shutdown

pub mod error_handling;
pub mod logging;
pub mod shutdown;
pub mod styles;
pub mod validation;
