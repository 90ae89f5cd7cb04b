//! Public API for the channel adapter

pub use crate::channel::adapter::Channel;
pub use crate::channel::error::{ChannelError, ChannelResult};
pub use crate::channel::handler::ErrorHandler;
pub use crate::channel::receiver::ChannelReceiver;
pub use crate::channel::sender::{ChannelSender, StreamSender};
