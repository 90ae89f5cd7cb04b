//! CLI Error Types

use crate::core::error_handling::ContextualError;
use crate::queue::QueueError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{message}")]
    Config { message: String },

    #[error("{message}")]
    Usage { message: String },

    #[error("Queue operation failed: {0}")]
    Queue(#[from] QueueError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Turn argument mistakes reported by the queue into usage errors
    pub fn from_queue(err: QueueError) -> Self {
        match err {
            QueueError::InvalidPriority { .. }
            | QueueError::InvalidPriorityRange { .. }
            | QueueError::PriorityCountMismatch { .. } => {
                CliError::Usage {
                    message: err.to_string(),
                }
            }
            other => CliError::Queue(other),
        }
    }
}

impl ContextualError for CliError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, CliError::Config { .. } | CliError::Usage { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            CliError::Config { message } | CliError::Usage { message } => Some(message),
            _ => None,
        }
    }
}
