//! Persistent Priority Queue
//!
//! A priority queue stored in a single redb file. Messages are enqueued at a
//! numeric priority and dequeued highest priority first, strictly oldest
//! first within a priority. Everything lives in the file, so queued messages
//! survive a restart (when the file is retained on close).
//!
//! # Storage layout
//!
//! ```text
//! queue.db
//! ├── prioq-meta  "priorities" → 3
//! ├── pq-02       key (u64 BE) → payload     ← dequeued first
//! ├── pq-01       key (u64 BE) → payload
//! └── pq-00       key (u64 BE) → payload     ← dequeued last
//! ```
//!
//! Bucket names encode the priority at a fixed width (1, 2, 4 or 8 bytes,
//! chosen from the highest priority), see [`BucketWidth`]. The priority count
//! is recorded on creation and checked on every later open. Keys come from a
//! [`KeyGenerator`] and are strictly increasing, so the first entry of a
//! bucket is always its oldest message.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use prioq::queue::{Message, PriorityQueue, QueueOptions};
//!
//! # fn main() -> prioq::queue::QueueResult<()> {
//! let queue = PriorityQueue::open_with(
//!     "/var/lib/app/work.db",
//!     4,
//!     QueueOptions::new().retain_on_close(true),
//! )?;
//!
//! queue.enqueue(1, &Message::from("resize image 17"))?;
//! queue.enqueue(3, &prioq::message!("page {}", "oncall"))?;
//!
//! while let Some(msg) = queue.dequeue()? {
//!     println!("p{} {}", msg.priority(), msg);
//! }
//! queue.close()?;
//! # Ok(())
//! # }
//! ```

pub mod api;
mod bucket;
mod engine;
mod error;
mod key;
mod message;
mod options;
mod typed;

pub use bucket::BucketWidth;
pub use engine::PriorityQueue;
pub use error::{QueueError, QueueResult};
pub use key::{decode_key, KeyGenerator, KEY_LEN};
pub use message::Message;
pub use options::QueueOptions;

#[cfg(test)]
mod tests;
