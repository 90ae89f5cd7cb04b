//! Channel Error Types

use crate::queue::QueueError;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel is closed")]
    Closed,

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("Internal channel error: {message}")]
    Internal { message: String },
}

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;
