//! Public API for the queue system
//!
//! External modules should import from here rather than directly from the
//! internal modules.

// Engine and construction settings
pub use crate::queue::engine::PriorityQueue;
pub use crate::queue::options::QueueOptions;

// Message types and key ordering
pub use crate::queue::key::KeyGenerator;
pub use crate::queue::message::Message;

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};
