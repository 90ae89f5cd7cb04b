//! Queue message type

use crate::queue::key::{decode_key, KEY_LEN};
use std::fmt;

/// A payload travelling through a [`PriorityQueue`](crate::queue::PriorityQueue)
///
/// Messages built by callers carry no key. The engine attaches the storage
/// key (and the bucket priority) when it hands a message back from
/// `dequeue`, which is what allows the message to be requeued ahead of newer
/// entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    key: Option<[u8; KEY_LEN]>,
    value: Vec<u8>,
    priority: u64,
}

impl Message {
    /// Create a message from raw bytes
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: None,
            value: value.into(),
            priority: 0,
        }
    }

    /// Create a message from format arguments, see also the [`message!`](crate::message) macro
    pub fn formatted(args: fmt::Arguments<'_>) -> Self {
        Self::new(fmt::format(args))
    }

    pub(crate) fn stored(key: [u8; KEY_LEN], value: Vec<u8>, priority: u64) -> Self {
        Self {
            key: Some(key),
            value,
            priority,
        }
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn into_value(self) -> Vec<u8> {
        self.value
    }

    /// Priority of the bucket this message was dequeued from (0 for new messages)
    pub fn priority(&self) -> u64 {
        self.priority
    }

    /// Storage key, present only on dequeued messages
    pub fn key(&self) -> Option<u64> {
        self.key.as_ref().and_then(|key| decode_key(key))
    }

    pub(crate) fn key_bytes(&self) -> Option<&[u8; KEY_LEN]> {
        self.key.as_ref()
    }

    /// View the payload as UTF-8 text
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.value))
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl From<Vec<u8>> for Message {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl From<&[u8]> for Message {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

/// Build a [`Message`](crate::queue::Message) with `format!` syntax
///
/// ```
/// let msg = prioq::message!("job-{}", 7);
/// assert_eq!(msg.as_str(), Some("job-7"));
/// ```
#[macro_export]
macro_rules! message {
    ($($arg:tt)*) => {
        $crate::queue::Message::formatted(format_args!($($arg)*))
    };
}
