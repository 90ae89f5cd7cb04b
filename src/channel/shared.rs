//! Queue handle shared by the drain task and the producers
//!
//! Whoever closes first takes the engine out; later calls see an empty slot.
//! Closing waits for in-flight operations because it needs the write lock.

use crate::core::sync::{handle_rwlock_read, handle_rwlock_write};
use crate::queue::{PriorityQueue, QueueError, QueueResult};
use std::sync::RwLock;

pub(crate) struct SharedQueue {
    engine: RwLock<Option<PriorityQueue>>,
}

impl SharedQueue {
    pub(crate) fn new(engine: PriorityQueue) -> Self {
        Self {
            engine: RwLock::new(Some(engine)),
        }
    }

    /// Run `op` against the engine; `Ok(None)` once the queue is closed
    pub(crate) fn with<T>(
        &self,
        op: impl FnOnce(&PriorityQueue) -> QueueResult<T>,
    ) -> QueueResult<Option<T>> {
        let slot = handle_rwlock_read(self.engine.read(), |message| QueueError::Internal {
            message,
        })?;
        slot.as_ref().map(op).transpose()
    }

    pub(crate) fn approx_size(&self) -> i64 {
        handle_rwlock_read(self.engine.read(), |message| message)
            .ok()
            .and_then(|slot| slot.as_ref().map(PriorityQueue::approx_size))
            .unwrap_or(0)
    }

    /// Close the engine; `Ok(false)` if it was already closed
    pub(crate) fn close(&self) -> QueueResult<bool> {
        let engine = handle_rwlock_write(self.engine.write(), |message| QueueError::Internal {
            message,
        })?
        .take();
        match engine {
            Some(engine) => engine.close().map(|()| true),
            None => Ok(false),
        }
    }
}
