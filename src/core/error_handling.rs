//! Fatal error reporting shared by the binary's entry points

/// Errors that know whether their message is fit to show a user directly
///
/// When `is_user_actionable()` is `true`, `user_message()` must return
/// `Some`. Configuration mistakes and bad arguments are actionable; IO
/// failures and runtime setup problems are not, and get the operation
/// context instead.
pub trait ContextualError: std::error::Error {
    fn is_user_actionable(&self) -> bool;

    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error at the detail level its kind warrants
///
/// Actionable errors print their own message; anything else prints
/// `operation_context`. The full error always goes to the debug log.
///
/// ```rust,no_run
/// # use printqueue::core::error_handling::log_error_with_context;
/// # use printqueue::core::validation::ValidationError;
/// let err = ValidationError::new("capacity must be greater than 0");
/// log_error_with_context(&err, "Loading configuration");
/// // FATAL: capacity must be greater than 0
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("FATAL: {}", fatal_message(error, operation_context));
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

fn fatal_message<'a, E: ContextualError>(error: &'a E, operation_context: &'a str) -> &'a str {
    if error.is_user_actionable() {
        error.user_message().unwrap_or(operation_context)
    } else {
        operation_context
    }
}
