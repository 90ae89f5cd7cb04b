//! Channel construction and mode selection

use crate::channel::drain::Drain;
use crate::channel::handler::HandlerSlot;
use crate::channel::receiver::ChannelReceiver;
use crate::channel::sender::{ChannelSender, Producer, StreamSender};
use crate::channel::shared::SharedQueue;
use crate::channel::signal::{Signal, SignalOwner};
use crate::queue::{PriorityQueue, QueueError, QueueOptions, QueueResult};
use futures::Stream;
use log::debug;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Unbounded persistent channel, not yet committed to a sending mode
///
/// The drain task starts as soon as the channel exists, so messages left in
/// the file by an earlier run are offered to consumers right away. Pick the
/// producer side with [`into_direct`](Self::into_direct) or
/// [`into_streamed`](Self::into_streamed); both consume the channel, so one
/// channel can never be fed both ways. Dropping a channel without picking a
/// mode closes it, and the receiver side goes with it:
///
/// ```compile_fail
/// # async fn demo() -> prioq::queue::QueueResult<()> {
/// let channel = prioq::channel::Channel::open("/tmp/jobs/")?;
/// let (writes, reads) = channel.into_streamed();
/// let (sender, _) = channel.into_direct(); // channel was moved above
/// # Ok(())
/// # }
/// ```
pub struct Channel {
    runtime: Handle,
    producer: Producer,
    receiver: ChannelReceiver,
}

impl Channel {
    /// Open a channel over a new or existing queue file
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(path: impl AsRef<Path>) -> QueueResult<Self> {
        Self::open_with(path, QueueOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: QueueOptions) -> QueueResult<Self> {
        Self::of(PriorityQueue::open_with(path, 1, options)?)
    }

    /// Build a channel over an existing engine
    ///
    /// Producers write at priority 0. Messages already stored at higher
    /// priorities are still drained first.
    pub fn of(engine: PriorityQueue) -> QueueResult<Self> {
        let runtime = Handle::try_current().map_err(|err| QueueError::Internal {
            message: format!("a channel needs a Tokio runtime: {}", err),
        })?;

        let engine = Arc::new(SharedQueue::new(engine));
        let (signal, tokens) = Signal::new();
        let signal = Arc::new(signal);
        let (output, received) = mpsc::channel(1);
        let handler = HandlerSlot::default();

        let producer = Producer::new(
            Arc::clone(&engine),
            SignalOwner::new(Arc::clone(&signal)),
            handler.clone(),
        );
        let drain = Drain::new(engine, signal, tokens, output, handler);
        runtime.spawn(drain.run());
        debug!("Started channel drain task");

        Ok(Self {
            runtime,
            producer,
            receiver: ChannelReceiver::new(received),
        })
    }

    /// Install the callback for errors raised by background tasks
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

    /// Send synchronously through [`ChannelSender`]
    pub fn into_direct(self) -> (ChannelSender, ChannelReceiver) {
        (ChannelSender::new(self.producer), self.receiver)
    }

    /// Send by writing to a bounded stream drained by a forwarding task
    ///
    /// The channel closes once every clone of the returned sender is dropped.
    pub fn into_streamed(self) -> (StreamSender, ChannelReceiver) {
        let (writes, pending) = mpsc::channel(1);
        let stream = futures::stream::unfold(pending, |mut pending| async move {
            pending.recv().await.map(|item| (item, pending))
        });
        (writes, self.forward(stream))
    }

    /// Feed the channel from any stream; the channel closes when it ends
    pub fn forward<S>(self, stream: S) -> ChannelReceiver
    where
        S: Stream<Item = Vec<u8>> + Send + 'static,
    {
        self.runtime.spawn(self.producer.forward(stream));
        self.receiver
    }
}
