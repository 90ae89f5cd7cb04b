//! Construction-time settings for a queue

use crate::queue::key::KeyGenerator;
use std::sync::Arc;

/// Options applied when a [`PriorityQueue`](crate::queue::PriorityQueue) is opened
///
/// ```
/// use prioq::queue::{KeyGenerator, QueueOptions};
/// use std::sync::Arc;
///
/// let shared = Arc::new(KeyGenerator::new());
/// let options = QueueOptions::new()
///     .retain_on_close(true)
///     .key_generator(Arc::clone(&shared));
/// assert!(options.retains_on_close());
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueueOptions {
    retain_on_close: bool,
    key_generator: Option<Arc<KeyGenerator>>,
    adopt_stored_priorities: bool,
}

impl QueueOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the backing file when the queue is closed (default: delete it)
    pub fn retain_on_close(mut self, retain: bool) -> Self {
        self.retain_on_close = retain;
        self
    }

    /// Mint keys from a generator shared with other queues
    ///
    /// Queues sharing a generator agree on one ordering, so a message moved
    /// from one queue to another keeps its place relative to messages
    /// enqueued afterwards.
    pub fn key_generator(mut self, keys: Arc<KeyGenerator>) -> Self {
        self.key_generator = Some(keys);
        self
    }

    /// Take the priority count recorded in an existing file
    ///
    /// Without this, opening a file with a count other than the one it was
    /// created with fails with
    /// [`PriorityCountMismatch`](crate::queue::QueueError::PriorityCountMismatch).
    /// The requested count still applies to new files.
    pub fn adopt_stored_priorities(mut self, adopt: bool) -> Self {
        self.adopt_stored_priorities = adopt;
        self
    }

    pub fn adopts_stored_priorities(&self) -> bool {
        self.adopt_stored_priorities
    }

    pub fn retains_on_close(&self) -> bool {
        self.retain_on_close
    }

    pub(crate) fn take_key_generator(&mut self) -> Arc<KeyGenerator> {
        self.key_generator
            .take()
            .unwrap_or_else(|| Arc::new(KeyGenerator::new()))
    }
}
