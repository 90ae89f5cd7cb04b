//! Producer side of a channel

use crate::channel::error::{ChannelError, ChannelResult};
use crate::channel::handler::HandlerSlot;
use crate::channel::shared::SharedQueue;
use crate::channel::signal::SignalOwner;
use crate::queue::QueueError;
use futures::{Stream, StreamExt};
use log::debug;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Channels only use the lowest priority level
pub(crate) const CHANNEL_PRIORITY: u64 = 0;

/// Sending half used by the streamed mode
///
/// Capacity is one: a write completes once the forwarding task has taken the
/// previous one. Dropping every clone closes the channel.
pub type StreamSender = mpsc::Sender<Vec<u8>>;

#[derive(Clone)]
pub(crate) struct Producer {
    engine: Arc<SharedQueue>,
    // dropping the last clone closes the channel
    owner: Arc<SignalOwner>,
    pub(crate) handler: HandlerSlot,
}

impl Producer {
    pub(crate) fn new(engine: Arc<SharedQueue>, owner: SignalOwner, handler: HandlerSlot) -> Self {
        Self {
            engine,
            owner: Arc::new(owner),
            handler,
        }
    }

    pub(crate) fn send(&self, value: &[u8]) -> ChannelResult<()> {
        self.owner.signal().notify_after(|| {
            self.engine
                .with(|engine| engine.enqueue_value(CHANNEL_PRIORITY, value))?
                .ok_or(ChannelError::Closed)
        })
    }

    pub(crate) fn close(&self) -> ChannelResult<()> {
        self.owner.signal().close()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.owner.signal().is_closed()
    }

    pub(crate) fn backlog(&self) -> i64 {
        self.engine.approx_size()
    }

    /// Enqueue every item of `stream`, then close the channel
    pub(crate) async fn forward<S>(self, stream: S)
    where
        S: Stream<Item = Vec<u8>> + Send + 'static,
    {
        futures::pin_mut!(stream);
        while let Some(item) = stream.next().await {
            let producer = self.clone();
            let sent = tokio::task::spawn_blocking(move || producer.send(&item)).await;
            match sent {
                Ok(Ok(())) => {}
                Ok(Err(ChannelError::Closed)) => {
                    debug!("Channel closed while forwarding, dropping the rest of the stream");
                    return;
                }
                Ok(Err(ChannelError::Queue(err))) => self.handler.report(&err),
                Ok(Err(ChannelError::Internal { message })) => {
                    self.handler.report(&QueueError::Internal { message })
                }
                Err(join) => self.handler.report(&QueueError::Internal {
                    message: format!("forwarding task failed: {}", join),
                }),
            }
        }
        if self.close().is_err() {
            debug!("Stream ended after the channel was already closed");
        }
    }
}

/// Sending half used by the direct mode
///
/// `send` blocks on storage I/O; from async code prefer calling it through
/// `tokio::task::spawn_blocking` or use the streamed mode instead. Dropping
/// the last clone closes the channel like [`close`](Self::close) does.
#[derive(Clone)]
pub struct ChannelSender {
    producer: Producer,
}

impl ChannelSender {
    pub(crate) fn new(producer: Producer) -> Self {
        Self { producer }
    }

    /// Store `value` and wake the drain task
    ///
    /// Returns the storage error if the enqueue failed and
    /// [`ChannelError::Closed`] once the channel has been closed.
    pub fn send(&self, value: impl AsRef<[u8]>) -> ChannelResult<()> {
        self.producer.send(value.as_ref())
    }

    pub fn send_string(&self, value: &str) -> ChannelResult<()> {
        self.producer.send(value.as_bytes())
    }

    /// Stop accepting sends; queued messages are still delivered
    ///
    /// Only the first close succeeds, later calls from any clone return
    /// [`ChannelError::Closed`]. Dropping every clone has the same effect.
    pub fn close(&self) -> ChannelResult<()> {
        self.producer.close()
    }

    pub fn is_closed(&self) -> bool {
        self.producer.is_closed()
    }

    pub fn set_error_handler<F>(&self, handler: F)
    where
        F: Fn(&QueueError) + Send + Sync + 'static,
    {
        self.producer.handler.set(handler);
    }

    /// Messages stored but not yet handed to a consumer (approximate)
    pub fn backlog(&self) -> i64 {
        self.producer.backlog()
    }
}
