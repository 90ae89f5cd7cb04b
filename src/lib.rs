//! Persistent priority queue and unbounded channel on redb
//!
//! - [`queue`]: the priority queue engine ([`queue::PriorityQueue`])
//! - [`channel`]: a producer/consumer channel buffered by a queue file
//! - [`core`]: logging, error reporting and build metadata
//! - [`app`]: the `prioq` command line tool

pub mod app;
pub mod channel;
pub mod core;
pub mod queue;

/// On-disk layout version of queue files written by this build
pub fn storage_format_version() -> u32 {
    core::version::storage_format_version()
}
