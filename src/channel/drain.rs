//! Background task moving messages from storage to consumers
//!
//! The task is the only caller of `dequeue` for its channel, so consumers see
//! messages in engine order. It holds at most one dequeued message at a time
//! and keeps listening for new tokens while it waits for a consumer, so the
//! pending count never falls behind the producers.

use crate::channel::handler::HandlerSlot;
use crate::channel::shared::SharedQueue;
use crate::channel::signal::Signal;
use crate::queue::{Message, QueueError, QueueResult};
use log::{debug, trace};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrainState {
    /// Storage looked empty; sleep until a producer signals
    WaitingForSignal,
    /// Try to move one message to a consumer
    Draining,
    /// Signal closed and storage empty, or every consumer is gone
    Closed,
}

pub(crate) struct Drain {
    engine: Arc<SharedQueue>,
    signal: Arc<Signal>,
    tokens: mpsc::UnboundedReceiver<()>,
    output: mpsc::Sender<Vec<u8>>,
    handler: HandlerSlot,
    // tokens received but not yet matched by a delivered message
    pending: u64,
    signal_closed: bool,
}

impl Drain {
    pub(crate) fn new(
        engine: Arc<SharedQueue>,
        signal: Arc<Signal>,
        tokens: mpsc::UnboundedReceiver<()>,
        output: mpsc::Sender<Vec<u8>>,
        handler: HandlerSlot,
    ) -> Self {
        Self {
            engine,
            signal,
            tokens,
            output,
            handler,
            pending: 0,
            signal_closed: false,
        }
    }

    pub(crate) async fn run(mut self) {
        // Anything persisted by an earlier run goes out first
        let mut state = DrainState::Draining;
        while state != DrainState::Closed {
            state = match state {
                DrainState::WaitingForSignal => self.wait_for_signal().await,
                DrainState::Draining => self.drain_one().await,
                DrainState::Closed => DrainState::Closed,
            };
        }
        self.shutdown().await;
    }

    async fn wait_for_signal(&mut self) -> DrainState {
        if self.signal_closed {
            return DrainState::Closed;
        }
        match self.tokens.recv().await {
            Some(()) => self.pending += 1,
            // flush whatever was stored before the close
            None => self.signal_closed = true,
        }
        DrainState::Draining
    }

    async fn drain_one(&mut self) -> DrainState {
        let idle = if self.signal_closed {
            DrainState::Closed
        } else {
            DrainState::WaitingForSignal
        };

        let engine = Arc::clone(&self.engine);
        match run_blocking(move || engine.with(|queue| queue.dequeue())).await {
            Ok(Some(Some(message))) => {
                self.pending = self.pending.saturating_sub(1);
                self.deliver(message).await
            }
            Ok(Some(None)) => idle,
            // closed underneath us; nothing left to drain
            Ok(None) => DrainState::Closed,
            Err(err) => {
                self.handler.report(&err);
                idle
            }
        }
    }

    /// Hand `message` to whichever consumer is ready first
    async fn deliver(&mut self, message: Message) -> DrainState {
        let undelivered = loop {
            tokio::select! {
                token = self.tokens.recv(), if !self.signal_closed => {
                    match token {
                        Some(()) => self.pending += 1,
                        None => self.signal_closed = true,
                    }
                }
                permit = self.output.reserve() => {
                    match permit {
                        Ok(permit) => {
                            permit.send(message.into_value());
                            break None;
                        }
                        Err(_) => break Some(message),
                    }
                }
            }
        };

        match undelivered {
            None => {
                trace!("Delivered message ({} pending signals)", self.pending);
                DrainState::Draining
            }
            Some(message) => {
                debug!("All channel receivers dropped, putting message back");
                self.put_back(message).await;
                DrainState::Closed
            }
        }
    }

    async fn put_back(&mut self, message: Message) {
        let engine = Arc::clone(&self.engine);
        let priority = message.priority();
        let requeued = run_blocking(move || engine.with(|queue| queue.requeue(priority, &message)));
        if let Err(err) = requeued.await {
            self.handler.report(&err);
        }
    }

    async fn shutdown(self) {
        let Self {
            engine,
            signal,
            output,
            handler,
            ..
        } = self;

        // No producer can reach the engine once the signal is closed
        if signal.close().is_ok() {
            debug!("Closed channel signal after consumers went away");
        }
        if let Err(err) = run_blocking(move || engine.close()).await {
            handler.report(&err);
        }

        // receivers see the end only after the file is released
        drop(output);
        debug!("Channel drain task finished");
    }
}

async fn run_blocking<T, F>(work: F) -> QueueResult<T>
where
    F: FnOnce() -> QueueResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| QueueError::Internal {
            message: format!("blocking queue operation failed: {}", err),
        })?
}
