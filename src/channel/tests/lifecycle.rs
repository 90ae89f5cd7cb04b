//! Tests for closing, restarting and abandoning channels

#[cfg(test)]
mod tests {
    use crate::channel::api::{Channel, ChannelError};
    use crate::queue::api::{PriorityQueue, QueueError, QueueOptions};
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::time::{sleep, timeout};

    fn retained() -> QueueOptions {
        QueueOptions::new().retain_on_close(true)
    }

    /// The drain task releases the file shortly after the receivers see the end
    async fn reopen_when_released(file: &Path) -> PriorityQueue {
        for _ in 0..500 {
            match PriorityQueue::open_with(file, 1, retained()) {
                Ok(queue) => return queue,
                Err(_) => sleep(Duration::from_millis(10)).await,
            }
        }
        panic!("queue file {} was never released", file.display());
    }

    #[tokio::test]
    async fn test_close_is_single_shot() {
        let dir = TempDir::new().unwrap();
        let channel = Channel::open(dir.path().join("close.db")).unwrap();
        let (sender, receiver) = channel.into_direct();
        let other = sender.clone();

        sender.send_string("last").unwrap();
        sender.close().unwrap();
        assert!(other.is_closed());
        assert!(matches!(sender.close(), Err(ChannelError::Closed)));
        assert!(matches!(other.close(), Err(ChannelError::Closed)));
        assert!(matches!(
            other.send_string("too late"),
            Err(ChannelError::Closed)
        ));

        // what was sent before the close is still delivered
        assert_eq!(receiver.recv_string().await.as_deref(), Some("last"));
        assert_eq!(receiver.recv().await, None);
    }

    #[tokio::test]
    async fn test_closed_channel_deletes_its_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("scratch.db");
        let channel = Channel::open(&file).unwrap();
        let (sender, receiver) = channel.into_direct();

        sender.send_string("x").unwrap();
        sender.close().unwrap();
        assert_eq!(receiver.recv_string().await.as_deref(), Some("x"));
        assert_eq!(receiver.recv().await, None);

        // the stream ends only after the queue is closed
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn test_dropping_every_sender_ends_stream() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("dropped.db");
        let channel = Channel::open(&file).unwrap();
        let (sender, receiver) = channel.into_direct();
        let other = sender.clone();

        sender.send_string("a").unwrap();
        drop(sender);
        other.send_string("b").unwrap();
        drop(other);

        assert_eq!(receiver.recv_string().await.as_deref(), Some("a"));
        assert_eq!(receiver.recv_string().await.as_deref(), Some("b"));
        let end = timeout(Duration::from_secs(5), receiver.recv()).await;
        assert_eq!(end.ok(), Some(None), "stream should end once senders are gone");
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn test_dropping_unused_channel_releases_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("unused.db");
        drop(Channel::open(&file).unwrap());

        let removed = timeout(Duration::from_secs(5), async {
            while file.exists() {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(removed.is_ok(), "drain task should close and remove the queue file");
    }

    #[tokio::test]
    async fn test_dropping_unused_channel_keeps_retained_messages() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("kept.db");

        let queue = PriorityQueue::open_with(&file, 1, retained()).unwrap();
        queue.enqueue_string(0, "survivor").unwrap();
        queue.close().unwrap();

        drop(Channel::open_with(&file, retained()).unwrap());

        let queue = reopen_when_released(&file).await;
        assert_eq!(queue.dequeue_string().unwrap().as_deref(), Some("survivor"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_backlog_readers_do_not_block_close() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("watched.db");
        let channel = Channel::open(&file).unwrap();
        let (sender, receiver) = channel.into_direct();

        let watcher = sender.clone();
        let watching = tokio::task::spawn_blocking(move || {
            let mut polls = 0u64;
            while !watcher.is_closed() || polls < 1_000 {
                assert!(watcher.backlog() >= 0);
                polls += 1;
            }
            watcher
        });

        for i in 0..20 {
            sender.send_string(&format!("m{}", i)).unwrap();
        }
        sender.close().unwrap();
        for i in 0..20 {
            assert_eq!(receiver.recv_string().await, Some(format!("m{}", i)));
        }
        assert_eq!(receiver.recv().await, None);
        assert!(!file.exists(), "queue must be closed even while watched");

        let watcher = watching.await.unwrap();
        assert_eq!(watcher.backlog(), 0);
    }

    #[tokio::test]
    async fn test_delivers_messages_left_by_previous_run() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("restart.db");

        let queue = PriorityQueue::open_with(&file, 1, retained()).unwrap();
        queue.enqueue_string(0, "a").unwrap();
        queue.enqueue_string(0, "b").unwrap();
        queue.close().unwrap();

        let channel = Channel::open_with(&file, retained()).unwrap();
        assert_eq!(channel.backlog(), 2);
        let (sender, receiver) = channel.into_direct();
        sender.close().unwrap();

        assert_eq!(receiver.recv_string().await.as_deref(), Some("a"));
        assert_eq!(receiver.recv_string().await.as_deref(), Some("b"));
        assert_eq!(receiver.recv().await, None);

        let queue = reopen_when_released(&file).await;
        assert_eq!(queue.total_size().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dropped_receivers_put_message_back() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("abandoned.db");
        let channel = Channel::open_with(&file, retained()).unwrap();
        let (sender, receiver) = channel.into_direct();

        drop(receiver);
        sender.send_string("keep me").unwrap();

        let stopped = timeout(Duration::from_secs(5), async {
            while !sender.is_closed() {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(stopped.is_ok(), "drain task should stop without receivers");
        assert!(matches!(
            sender.send_string("after"),
            Err(ChannelError::Closed)
        ));

        let queue = reopen_when_released(&file).await;
        assert_eq!(queue.dequeue_string().unwrap().as_deref(), Some("keep me"));
    }

    #[test]
    fn test_channel_requires_runtime() {
        let dir = TempDir::new().unwrap();
        let result = Channel::open(dir.path().join("no-runtime.db"));
        assert!(matches!(result, Err(QueueError::Internal { .. })));
    }
}
