//! Wake-up tokens from producers to the drain task
//!
//! One token is emitted for every successful enqueue. Emitting and closing
//! share a lock, so once `close` returns no producer can add to the queue.

use crate::channel::error::{ChannelError, ChannelResult};
use crate::core::sync::handle_mutex_poison;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

pub(crate) struct Signal {
    tokens: Mutex<Option<mpsc::UnboundedSender<()>>>,
    closed: AtomicBool,
}

impl Signal {
    pub(crate) fn new() -> (Self, mpsc::UnboundedReceiver<()>) {
        let (tokens, receiver) = mpsc::unbounded_channel();
        let signal = Self {
            tokens: Mutex::new(Some(tokens)),
            closed: AtomicBool::new(false),
        };
        (signal, receiver)
    }

    /// Run `produce` and emit a token if it succeeds
    ///
    /// Fails with [`ChannelError::Closed`] without running `produce` once the
    /// signal has been closed.
    pub(crate) fn notify_after<T>(
        &self,
        produce: impl FnOnce() -> ChannelResult<T>,
    ) -> ChannelResult<T> {
        let guard = handle_mutex_poison(self.tokens.lock(), |message| {
            ChannelError::Internal { message }
        })?;
        let Some(tokens) = guard.as_ref() else {
            return Err(ChannelError::Closed);
        };

        let produced = produce()?;
        if tokens.send(()).is_err() {
            debug!("Drain task has stopped, message left in storage");
        }
        Ok(produced)
    }

    /// Close exactly once; later calls get [`ChannelError::Closed`]
    pub(crate) fn close(&self) -> ChannelResult<()> {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ChannelError::Closed);
        }
        let mut guard = handle_mutex_poison(self.tokens.lock(), |message| {
            ChannelError::Internal { message }
        })?;
        guard.take();
        Ok(())
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Producer-side owner of a signal
///
/// Every producer handle shares one owner; when the last handle goes away
/// the signal closes, so the drain task can finish without an explicit
/// `close`.
pub(crate) struct SignalOwner {
    signal: Arc<Signal>,
}

impl SignalOwner {
    pub(crate) fn new(signal: Arc<Signal>) -> Self {
        Self { signal }
    }

    pub(crate) fn signal(&self) -> &Signal {
        &self.signal
    }
}

impl Drop for SignalOwner {
    fn drop(&mut self) {
        if self.signal.close().is_ok() {
            debug!("Last channel producer dropped, closing signal");
        }
    }
}
