//! Typed payloads
//!
//! Messages are opaque bytes to the engine. These helpers store any serde
//! value as JSON so callers can queue structured jobs without writing their
//! own encoding layer.

use crate::queue::engine::PriorityQueue;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::message::Message;
use serde::de::DeserializeOwned;
use serde::Serialize;

impl Message {
    /// Serialize `value` into a new message
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> QueueResult<Self> {
        let bytes = serde_json::to_vec(value).map_err(|e| QueueError::Serialization {
            message: e.to_string(),
        })?;
        Ok(Self::new(bytes))
    }

    /// Deserialize the payload into `T`
    pub fn decode<T: DeserializeOwned>(&self) -> QueueResult<T> {
        serde_json::from_slice(self.value()).map_err(|e| QueueError::Deserialization {
            message: format!("{} ({} byte payload)", e, self.value().len()),
        })
    }
}

impl PriorityQueue {
    pub fn enqueue_serialized<T: Serialize + ?Sized>(
        &self,
        priority: u64,
        value: &T,
    ) -> QueueResult<()> {
        self.enqueue(priority, &Message::encode(value)?)
    }

    /// Dequeue the head message and decode it
    ///
    /// A payload that fails to decode is still removed from the queue; the
    /// error carries the decoder's message.
    pub fn dequeue_deserialized<T: DeserializeOwned>(&self) -> QueueResult<Option<T>> {
        match self.dequeue()? {
            Some(message) => message.decode().map(Some),
            None => Ok(None),
        }
    }
}
