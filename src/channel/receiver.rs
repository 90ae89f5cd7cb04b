//! Consumer side of a channel

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Receiving half of a channel
///
/// Clones share one stream: every message goes to exactly one of them, with
/// no fairness guarantee between clones.
#[derive(Clone)]
pub struct ChannelReceiver {
    inner: Arc<Mutex<mpsc::Receiver<Vec<u8>>>>,
}

impl ChannelReceiver {
    pub(crate) fn new(inner: mpsc::Receiver<Vec<u8>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Next message, or `None` once the channel is closed and drained
    pub async fn recv(&self) -> Option<Vec<u8>> {
        self.inner.lock().await.recv().await
    }

    pub async fn recv_string(&self) -> Option<String> {
        self.recv()
            .await
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}
