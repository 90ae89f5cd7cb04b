//! Persistent Unbounded Channel
//!
//! Turns a single-priority [`PriorityQueue`](crate::queue::PriorityQueue) into
//! a producer/consumer pipe whose buffer lives on disk. Producers never wait
//! for consumers; consumers wait until something is stored.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐ enqueue  ┌──────────────┐ dequeue  ┌────────────┐ recv  ┌────────────┐
//! │  Producers │ ───────▶ │ PriorityQueue│ ───────▶ │ Drain task │ ────▶ │ Consumers  │
//! └─────┬──────┘          └──────────────┘          └─────▲──────┘       └────────────┘
//!       │                 one token per enqueue           │
//!       └─────────────────────────────────────────────────┘
//! ```
//!
//! The drain task is the only reader of the queue. It sleeps while storage is
//! empty and wakes on the next token. Closing the channel, or dropping every
//! producer handle, stops producers; the task keeps delivering until storage
//! is empty, then closes the queue (deleting its file unless retained) and
//! ends the receiver stream.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use prioq::channel::Channel;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let channel = Channel::open("/tmp/outbox/")?;
//! channel.set_error_handler(|err| eprintln!("outbox: {}", err));
//! let (sender, receiver) = channel.into_direct();
//!
//! sender.send_string("hello")?;
//! sender.close()?;
//!
//! while let Some(text) = receiver.recv_string().await {
//!     println!("{}", text);
//! }
//! # Ok(())
//! # }
//! ```

mod adapter;
pub mod api;
mod drain;
mod error;
mod handler;
mod receiver;
mod sender;
mod shared;
mod signal;

pub use adapter::Channel;
pub use error::{ChannelError, ChannelResult};
pub use handler::ErrorHandler;
pub use receiver::ChannelReceiver;
pub use sender::{ChannelSender, StreamSender};

#[cfg(test)]
mod tests;
