//! Error reporting for the command line front end
//!
//! Errors split into two groups: mistakes the operator can fix (bad flags,
//! bad config values) and system failures (storage, I/O). The first group is
//! reported verbatim, the second with a short context line and the full
//! detail at debug level.

/// Errors that know whether their message is meant for the operator
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; otherwise it must return `None`.
pub trait ContextualError: std::error::Error {
    /// True when the message tells the operator exactly what to fix
    fn is_user_actionable(&self) -> bool;

    /// The message to show when the error is user-actionable
    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error with the level of detail its kind deserves
///
/// ```rust,no_run
/// use prioq::app::cli::error::CliError;
/// use prioq::core::error_handling::log_error_with_context;
///
/// let err = CliError::Config {
///     message: "priorities must be at least 1".to_string(),
/// };
/// log_error_with_context(&err, "Loading configuration");
/// // Logs: "FATAL: priorities must be at least 1"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
