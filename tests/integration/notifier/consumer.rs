use std::{fs, sync::Arc};
use tempfile::TempDir;
use tokio::sync::watch;

use transaction_notifier::{
	models::NotifierConfig,
	repositories::SubscriptionRepository,
	services::{
		notifier::NotifierService,
		queue::{ConsumerSummary, MemoryQueue, QueueConsumer},
	},
};

use crate::integration::mocks::MockNotificationPublisher;

async fn file_backed_repository(dir: &TempDir) -> SubscriptionRepository {
	fs::write(
		dir.path().join("wallets.json"),
		r#"[
			{"id": "alice", "coin": 1, "address": "0xa11ce", "targets": ["phone-a"]},
			{"id": "bob", "coin": 60, "address": "0xb0b", "targets": ["phone-b", "tablet-b"]}
		]"#,
	)
	.unwrap();
	SubscriptionRepository::new(Some(dir.path())).await.unwrap()
}

#[tokio::test]
async fn test_consumer_acks_every_delivery_once() {
	let dir = TempDir::new().unwrap();
	let repository = file_backed_repository(&dir).await;

	let mut publisher = MockNotificationPublisher::new();
	publisher
		.expect_publish()
		.withf(|batch| batch.len() == 1)
		.times(2)
		.returning(|_| Ok(()));

	let notifier = NotifierService::new(
		Arc::new(repository),
		Arc::new(publisher),
		&NotifierConfig::default(),
	);
	let consumer = QueueConsumer::new(Arc::new(notifier), 3);

	let (mut queue, receiver) = MemoryQueue::new();
	for body in [
		r#"[{"id": "t1", "coin": 1, "from": "0xa11ce", "to": "0xdead"}]"#,
		// Same address on another coin is not a match
		r#"[{"id": "t2", "coin": 60, "from": "0xa11ce", "to": "0xdead"}]"#,
		r#"[{"id": "t3", "coin": 60, "from": "0xdead", "to": "0xb0b"}]"#,
		"not json",
		"[]",
	] {
		queue.publish(body).unwrap();
	}
	queue.close();

	let (_shutdown_tx, shutdown_rx) = watch::channel(false);
	let summary = consumer.run(receiver.into_stream(), shutdown_rx).await;

	assert_eq!(
		summary,
		ConsumerSummary {
			processed: 5,
			acked: 5
		}
	);
	let mut acks = queue.drain_acks();
	acks.sort();
	assert_eq!(acks, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_consumer_shutdown_acks_what_it_processed() {
	let dir = TempDir::new().unwrap();
	let repository = file_backed_repository(&dir).await;

	let mut publisher = MockNotificationPublisher::new();
	publisher.expect_publish().returning(|_| Ok(()));

	let notifier = NotifierService::new(
		Arc::new(repository),
		Arc::new(publisher),
		&NotifierConfig::default(),
	);
	let consumer = QueueConsumer::new(Arc::new(notifier), 1);

	let (mut queue, receiver) = MemoryQueue::new();
	queue
		.publish(r#"[{"id": "t1", "coin": 1, "from": "0xa11ce", "to": "0xdead"}]"#)
		.unwrap();

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let run =
		tokio::spawn(async move { consumer.run(receiver.into_stream(), shutdown_rx).await });

	let first = queue.wait_for_acks(1).await;
	assert_eq!(first, vec![1]);

	shutdown_tx.send(true).unwrap();
	let summary = run.await.unwrap();

	assert_eq!(summary.processed, summary.acked);
	assert_eq!(summary.processed, 1);
}
