//! Queue Error Types

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Invalid priority {requested} (maximum is {max})")]
    InvalidPriority { requested: u64, max: u64 },

    #[error("Invalid priority range: a queue needs at least one priority level, got {priorities}")]
    InvalidPriorityRange { priorities: u64 },

    #[error("Queue file was created with {stored} priorities, cannot open it with {requested}")]
    PriorityCountMismatch { stored: u64, requested: u64 },

    #[error("Cannot requeue a message that was never dequeued (no key)")]
    RequeueWithoutKey,

    #[error("Storage transaction failed: {0}")]
    StorageTransaction(#[source] redb::Error),

    #[error("Failed to open queue storage {}: {source}", path.display())]
    StorageOpen {
        path: PathBuf,
        #[source]
        source: redb::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize payload: {message}")]
    Serialization { message: String },

    #[error("Failed to deserialize payload: {message}")]
    Deserialization { message: String },

    #[error("Internal queue error: {message}")]
    Internal { message: String },
}

// Every redb failure raised inside a transaction funnels into StorageTransaction
macro_rules! storage_error_from {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for QueueError {
                fn from(err: $source) -> Self {
                    QueueError::StorageTransaction(redb::Error::from(err))
                }
            }
        )+
    };
}

storage_error_from!(
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
