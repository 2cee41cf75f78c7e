use std::{
	collections::HashSet,
	sync::{Arc, Mutex},
};

use transaction_notifier::{
	models::{AddressKey, Notification, NotifierConfig, TransferDirection},
	repositories::RepositoryError,
	services::{
		notifier::{DeliveryOutcome, NotifierService, PipelineStage},
		publisher::PublishError,
	},
	utils::tests::builders::subscription::SubscriptionBuilder,
};

use crate::integration::mocks::{deliver, MockNotificationPublisher, MockSubscriptionRepository};

const TWO_TRANSFERS: &str = r#"[
	{"id": "t1", "coin": 1, "from": "A", "to": "B"},
	{"id": "t2", "coin": 1, "from": "B", "to": "C"}
]"#;

fn config(max_batch_size: usize) -> NotifierConfig {
	NotifierConfig {
		max_batch_size,
		..NotifierConfig::default()
	}
}

#[tokio::test]
async fn test_shared_address_is_looked_up_once_and_published_in_one_batch() {
	let mut repository = MockSubscriptionRepository::new();
	let expected_keys = HashSet::from([
		AddressKey::new(1, "A"),
		AddressKey::new(1, "B"),
		AddressKey::new(1, "C"),
	]);
	let subscription = SubscriptionBuilder::new().id("watch-b").address("B").build();
	repository
		.expect_resolve_subscriptions()
		.withf(move |keys| *keys == expected_keys)
		.times(1)
		.returning(move |_| Ok(vec![subscription.clone()]));

	let published: Arc<Mutex<Vec<Vec<Notification>>>> = Arc::new(Mutex::new(Vec::new()));
	let mut publisher = MockNotificationPublisher::new();
	let captured = published.clone();
	publisher
		.expect_publish()
		.times(1)
		.returning(move |batch| {
			captured.lock().unwrap().push(batch.to_vec());
			Ok(())
		});

	let notifier = NotifierService::new(Arc::new(repository), Arc::new(publisher), &config(10));
	let (report, acks) = deliver(&notifier, TWO_TRANSFERS).await;

	assert_eq!(acks, vec![1]);
	assert!(report.acked);
	assert_eq!(report.stage, PipelineStage::Acked);
	assert_eq!(
		report.outcome,
		DeliveryOutcome::Published {
			notifications: 2,
			batches: 1,
			failed_batches: 0,
		}
	);

	let published = published.lock().unwrap();
	let batch = &published[0];
	assert_eq!(batch.len(), 2);
	assert_eq!(batch[0].transaction.id, "t1");
	assert_eq!(batch[0].transaction.direction, TransferDirection::Incoming);
	assert_eq!(batch[0].transaction.counterparty.as_deref(), Some("A"));
	assert_eq!(batch[1].transaction.id, "t2");
	assert_eq!(batch[1].transaction.direction, TransferDirection::Outgoing);
	assert!(batch.iter().all(|n| n.subscription_id == "watch-b"));
}

#[tokio::test]
async fn test_empty_delivery_skips_lookup_and_is_acked() {
	let mut repository = MockSubscriptionRepository::new();
	repository.expect_resolve_subscriptions().never();
	let mut publisher = MockNotificationPublisher::new();
	publisher.expect_publish().never();

	let notifier = NotifierService::new(Arc::new(repository), Arc::new(publisher), &config(10));
	let (report, acks) = deliver(&notifier, "[]").await;

	assert_eq!(acks, vec![1]);
	assert_eq!(report.outcome, DeliveryOutcome::NoTransactions);
}

#[tokio::test]
async fn test_limit_of_one_publishes_each_notification_separately() {
	let mut repository = MockSubscriptionRepository::new();
	repository
		.expect_resolve_subscriptions()
		.times(1)
		.returning(|_| {
			Ok(vec![
				SubscriptionBuilder::new().id("a").address("A").build(),
				SubscriptionBuilder::new().id("b").address("B").build(),
			])
		});

	let mut publisher = MockNotificationPublisher::new();
	publisher
		.expect_publish()
		.withf(|batch| batch.len() == 1)
		.times(3)
		.returning(|_| Ok(()));

	let notifier = NotifierService::new(Arc::new(repository), Arc::new(publisher), &config(1));
	let (report, acks) = deliver(&notifier, TWO_TRANSFERS).await;

	assert_eq!(acks, vec![1]);
	assert_eq!(
		report.outcome,
		DeliveryOutcome::Published {
			notifications: 3,
			batches: 3,
			failed_batches: 0,
		}
	);
}

#[tokio::test]
async fn test_lookup_failure_is_acked_without_publishing() {
	let mut repository = MockSubscriptionRepository::new();
	repository
		.expect_resolve_subscriptions()
		.times(1)
		.returning(|_| Err(RepositoryError::internal_error("store unavailable", None, None)));
	let mut publisher = MockNotificationPublisher::new();
	publisher.expect_publish().never();

	let notifier = NotifierService::new(Arc::new(repository), Arc::new(publisher), &config(10));
	let (report, acks) = deliver(&notifier, TWO_TRANSFERS).await;

	assert_eq!(acks, vec![1]);
	assert_eq!(report.outcome, DeliveryOutcome::ResolveFailed);
	assert_eq!(report.stage, PipelineStage::Acked);
}

#[tokio::test]
async fn test_malformed_delivery_is_acked_without_lookup() {
	let mut repository = MockSubscriptionRepository::new();
	repository.expect_resolve_subscriptions().never();
	let mut publisher = MockNotificationPublisher::new();
	publisher.expect_publish().never();

	let notifier = NotifierService::new(Arc::new(repository), Arc::new(publisher), &config(10));
	let (report, acks) = deliver(&notifier, r#"{"not": "a list"}"#).await;

	assert_eq!(acks, vec![1]);
	assert_eq!(report.outcome, DeliveryOutcome::DecodeFailed);
}

#[tokio::test]
async fn test_unmatched_addresses_publish_nothing() {
	let mut repository = MockSubscriptionRepository::new();
	repository
		.expect_resolve_subscriptions()
		.times(1)
		.returning(|_| Ok(vec![]));
	let mut publisher = MockNotificationPublisher::new();
	publisher.expect_publish().never();

	let notifier = NotifierService::new(Arc::new(repository), Arc::new(publisher), &config(10));
	let (report, acks) = deliver(&notifier, TWO_TRANSFERS).await;

	assert_eq!(acks, vec![1]);
	assert_eq!(report.outcome, DeliveryOutcome::NoSubscribers);
}

#[tokio::test]
async fn test_failed_batch_does_not_stop_later_batches() {
	let mut repository = MockSubscriptionRepository::new();
	repository
		.expect_resolve_subscriptions()
		.returning(|_| Ok(vec![SubscriptionBuilder::new().address("B").build()]));

	let calls = Arc::new(Mutex::new(0usize));
	let counter = calls.clone();
	let mut publisher = MockNotificationPublisher::new();
	publisher.expect_publish().times(2).returning(move |_| {
		let mut calls = counter.lock().unwrap();
		*calls += 1;
		if *calls == 1 {
			Err(PublishError::notify_failed("gateway rejected batch", None, None))
		} else {
			Ok(())
		}
	});

	let notifier = NotifierService::new(Arc::new(repository), Arc::new(publisher), &config(1));
	let (report, acks) = deliver(&notifier, TWO_TRANSFERS).await;

	assert_eq!(*calls.lock().unwrap(), 2);
	assert_eq!(acks, vec![1]);
	assert_eq!(
		report.outcome,
		DeliveryOutcome::Published {
			notifications: 2,
			batches: 2,
			failed_batches: 1,
		}
	);
}
