//! Log publisher implementation.
//!
//! Emits every notification of a batch as an `info` event instead of sending it anywhere.

use async_trait::async_trait;

use crate::{
	models::Notification,
	services::publisher::{NotificationPublisher, PublishError},
};

/// Publisher that writes batches to the log
#[derive(Debug, Clone, Default)]
pub struct LogPublisher;

impl LogPublisher {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl NotificationPublisher for LogPublisher {
	async fn publish(&self, batch: &[Notification]) -> Result<(), PublishError> {
		for notification in batch {
			let transaction = &notification.transaction;
			tracing::info!(
				subscription_id = %notification.subscription_id,
				targets = notification.targets.len(),
				transaction_id = %transaction.id,
				coin = transaction.coin,
				address = %transaction.address,
				direction = ?transaction.direction,
				amount = transaction.amount.as_deref().unwrap_or("-"),
				"notification"
			);
		}
		Ok(())
	}
}
