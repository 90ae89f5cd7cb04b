//! Round trips through both sending modes

#[cfg(test)]
mod tests {
    use crate::channel::api::{Channel, ChannelReceiver};
    use std::collections::HashSet;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::time::timeout;

    async fn collect(receiver: &ChannelReceiver) -> Vec<String> {
        let mut received = Vec::new();
        while let Some(text) = receiver.recv_string().await {
            received.push(text);
        }
        received
    }

    fn expected() -> Vec<String> {
        (1..=100).map(|i| i.to_string()).collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_direct_mode_echo() {
        let dir = TempDir::new().unwrap();
        let channel = Channel::open(dir.path().join("direct.db")).unwrap();
        let (sender, receiver) = channel.into_direct();

        let producer = tokio::task::spawn_blocking(move || {
            for i in 1..=100 {
                sender.send_string(&i.to_string()).unwrap();
            }
            sender.close().unwrap();
        });

        let received = timeout(Duration::from_secs(30), collect(&receiver))
            .await
            .expect("channel should close after the producer finishes");
        producer.await.unwrap();
        assert_eq!(received, expected());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_streamed_mode_echo() {
        let dir = TempDir::new().unwrap();
        let channel = Channel::open(dir.path().join("streamed.db")).unwrap();
        let (writes, receiver) = channel.into_streamed();

        let producer = tokio::spawn(async move {
            for i in 1..=100 {
                writes.send(i.to_string().into_bytes()).await.unwrap();
            }
            // dropping the last writer closes the channel
        });

        let received = timeout(Duration::from_secs(30), collect(&receiver))
            .await
            .expect("channel should close once the stream ends");
        producer.await.unwrap();
        assert_eq!(received, expected());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_each_message_reaches_one_consumer() {
        let dir = TempDir::new().unwrap();
        let channel = Channel::open(dir.path().join("fanout.db")).unwrap();
        let (sender, receiver) = channel.into_direct();

        let consumers: Vec<_> = (0..3)
            .map(|_| {
                let receiver = receiver.clone();
                tokio::spawn(async move { collect(&receiver).await })
            })
            .collect();
        drop(receiver);

        let producer = tokio::task::spawn_blocking(move || {
            for i in 0..200 {
                sender.send(format!("m{}", i)).unwrap();
            }
            sender.close().unwrap();
        });
        producer.await.unwrap();

        let mut all = Vec::new();
        for consumer in consumers {
            let got = timeout(Duration::from_secs(30), consumer)
                .await
                .expect("consumers should finish")
                .unwrap();
            all.extend(got);
        }

        let unique: HashSet<&String> = all.iter().collect();
        assert_eq!(all.len(), 200);
        assert_eq!(unique.len(), 200);
        println!("✓ 200 messages split across 3 consumers without duplicates");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_forward_from_stream() {
        let dir = TempDir::new().unwrap();
        let channel = Channel::open(dir.path().join("forward.db")).unwrap();

        let items = futures::stream::iter((1..=100).map(|i: u32| i.to_string().into_bytes()));
        let receiver = channel.forward(items);

        let received = timeout(Duration::from_secs(30), collect(&receiver))
            .await
            .unwrap();
        assert_eq!(received, expected());
    }
}
