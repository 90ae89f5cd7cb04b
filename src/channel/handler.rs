//! Error handler slot shared by a channel's background tasks

use crate::core::sync::{handle_rwlock_read, handle_rwlock_write};
use crate::queue::QueueError;
use log::{debug, warn};
use std::sync::{Arc, RwLock};

pub type ErrorHandler = Arc<dyn Fn(&QueueError) + Send + Sync>;

/// Where background failures are reported
///
/// Errors raised while draining or forwarding have no caller to return to.
/// They go to the installed handler if there is one and are logged otherwise.
#[derive(Clone, Default)]
pub(crate) struct HandlerSlot {
    handler: Arc<RwLock<Option<ErrorHandler>>>,
}

impl HandlerSlot {
    pub(crate) fn set<F>(&self, handler: F)
    where
        F: Fn(&QueueError) + Send + Sync + 'static,
    {
        match handle_rwlock_write(self.handler.write(), |msg| msg) {
            Ok(mut slot) => *slot = Some(Arc::new(handler)),
            Err(msg) => warn!("Could not install channel error handler: {}", msg),
        }
    }

    pub(crate) fn report(&self, error: &QueueError) {
        // clone out so the handler runs without holding the lock
        let handler = handle_rwlock_read(self.handler.read(), |msg| msg)
            .ok()
            .and_then(|slot| slot.clone());
        match handler {
            Some(handler) => {
                debug!("Reporting channel error to handler: {}", error);
                handler(error);
            }
            None => warn!("Channel error dropped (no handler installed): {}", error),
        }
    }
}
