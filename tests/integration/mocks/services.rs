//! Mock publisher and delivery helpers.

use async_trait::async_trait;
use futures::StreamExt;
use mockall::mock;

use transaction_notifier::{
	models::Notification,
	repositories::SubscriptionRepositoryTrait,
	services::{
		notifier::{DeliveryReport, NotifierService},
		publisher::{NotificationPublisher, PublishError},
		queue::MemoryQueue,
	},
};

mock! {
	/// Mock implementation of the outbound publisher.
	pub NotificationPublisher {}

	#[async_trait]
	impl NotificationPublisher for NotificationPublisher {
		async fn publish(&self, batch: &[Notification]) -> Result<(), PublishError>;
	}
}

/// Sends `body` through a fresh in-process queue and handles the single delivery.
///
/// Returns the report together with every tag the queue saw acknowledged.
pub async fn deliver<R, P>(
	notifier: &NotifierService<R, P>,
	body: &str,
) -> (DeliveryReport, Vec<u64>)
where
	R: SubscriptionRepositoryTrait + ?Sized,
	P: NotificationPublisher + ?Sized,
{
	let (mut queue, receiver) = MemoryQueue::new();
	queue.publish(body).unwrap();
	queue.close();

	let mut deliveries = Box::pin(receiver.into_stream());
	let delivery = deliveries.next().await.unwrap();
	let report = notifier.handle_delivery(delivery).await;

	(report, queue.drain_acks())
}
