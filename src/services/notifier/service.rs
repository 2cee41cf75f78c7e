//! Notifier orchestration.
//!
//! Drives one delivery through decode, address extraction, subscription lookup,
//! notification building, batching and publishing, then acknowledges it. The
//! acknowledgment means "consumed", not "notified": it is issued exactly once per
//! delivery, after the pipeline reached its outcome, whatever that outcome is.

use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use tracing::instrument;

use crate::{
	models::{Notification, NotifierConfig},
	repositories::SubscriptionRepositoryTrait,
	services::{
		decoder::decode_delivery,
		notifier::{
			batch_notifications, build_notifications, extract_address_keys, NotifierError,
			SubscriptionResolver,
		},
		publisher::{NotificationPublisher, PublishError},
		queue::Delivery,
	},
	utils::metrics::{record_ack_failure, record_batch, record_delivery, record_notifications},
};

/// Stages a delivery moves through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
	Received,
	Decoded,
	AddressesExtracted,
	Resolved,
	Built,
	Batched,
	Published,
	Acked,
}

impl fmt::Display for PipelineStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Received => "received",
			Self::Decoded => "decoded",
			Self::AddressesExtracted => "addresses_extracted",
			Self::Resolved => "resolved",
			Self::Built => "built",
			Self::Batched => "batched",
			Self::Published => "published",
			Self::Acked => "acked",
		};
		f.write_str(name)
	}
}

/// How the pipeline ended for one delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
	/// Batches were handed to the publisher; some of them may have failed
	Published {
		notifications: usize,
		batches: usize,
		failed_batches: usize,
	},
	/// The delivery carried no transactions
	NoTransactions,
	/// No subscription matched any address of the delivery
	NoSubscribers,
	/// The body could not be decoded
	DecodeFailed,
	/// The subscription lookup failed or timed out
	ResolveFailed,
}

impl DeliveryOutcome {
	/// Metric label of the outcome
	pub fn label(&self) -> &'static str {
		match self {
			Self::Published {
				failed_batches: 0, ..
			} => "published",
			Self::Published { .. } => "publish_failed",
			Self::NoTransactions => "no_transactions",
			Self::NoSubscribers => "no_subscribers",
			Self::DecodeFailed => "decode_failed",
			Self::ResolveFailed => "resolve_failed",
		}
	}
}

/// Result of running the pipeline on one body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessReport {
	/// Last stage reached
	pub stage: PipelineStage,
	pub outcome: DeliveryOutcome,
}

/// Result of handling one delivery, acknowledgment included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
	pub tag: u64,
	/// [`PipelineStage::Acked`] once acknowledged, otherwise the last stage reached
	pub stage: PipelineStage,
	pub outcome: DeliveryOutcome,
	pub acked: bool,
}

/// Runs the notification pipeline for queue deliveries
pub struct NotifierService<R: ?Sized, P: ?Sized> {
	resolver: SubscriptionResolver<R>,
	publisher: Arc<P>,
	max_batch_size: usize,
	publish_timeout: Duration,
}

impl<R, P> NotifierService<R, P>
where
	R: SubscriptionRepositoryTrait + ?Sized,
	P: NotificationPublisher + ?Sized,
{
	/// Creates a notifier from its collaborators and the pipeline settings of `config`
	pub fn new(repository: Arc<R>, publisher: Arc<P>, config: &NotifierConfig) -> Self {
		Self {
			resolver: SubscriptionResolver::new(repository, config.resolver_timeout()),
			publisher,
			max_batch_size: config.max_batch_size.max(1),
			publish_timeout: config.publish_timeout(),
		}
	}

	/// Runs every stage up to publishing for one delivery body.
	///
	/// Publish failures are contained per batch and reported in the outcome. Decode and
	/// lookup failures abort the run and are returned as errors.
	pub async fn process(&self, body: &[u8]) -> Result<ProcessReport, NotifierError> {
		let transactions = decode_delivery(body)?;
		if transactions.is_empty() {
			return Ok(ProcessReport {
				stage: PipelineStage::AddressesExtracted,
				outcome: DeliveryOutcome::NoTransactions,
			});
		}

		let keys = extract_address_keys(&transactions);
		if keys.is_empty() {
			return Ok(ProcessReport {
				stage: PipelineStage::AddressesExtracted,
				outcome: DeliveryOutcome::NoSubscribers,
			});
		}

		let subscriptions = self.resolver.resolve(&keys).await?;
		tracing::debug!(
			transactions = transactions.len(),
			addresses = keys.len(),
			subscriptions = subscriptions.len(),
			"resolved subscriptions"
		);
		if subscriptions.is_empty() {
			return Ok(ProcessReport {
				stage: PipelineStage::Resolved,
				outcome: DeliveryOutcome::NoSubscribers,
			});
		}

		let notifications = build_notifications(&subscriptions, &transactions);
		record_notifications(notifications.len());
		if notifications.is_empty() {
			return Ok(ProcessReport {
				stage: PipelineStage::Built,
				outcome: DeliveryOutcome::NoSubscribers,
			});
		}
		let notification_count = notifications.len();

		let batches = batch_notifications(notifications, self.max_batch_size);
		let batch_count = batches.len();

		let mut failed_batches = 0;
		for (index, batch) in batches.iter().enumerate() {
			match self.publish_batch(batch).await {
				Ok(()) => record_batch(true),
				Err(e) => {
					record_batch(false);
					failed_batches += 1;
					tracing::warn!(
						batch = index,
						batch_size = batch.len(),
						error = %e,
						"batch not published"
					);
				}
			}
		}

		Ok(ProcessReport {
			stage: PipelineStage::Published,
			outcome: DeliveryOutcome::Published {
				notifications: notification_count,
				batches: batch_count,
				failed_batches,
			},
		})
	}

	async fn publish_batch(&self, batch: &[Notification]) -> Result<(), PublishError> {
		match tokio::time::timeout(self.publish_timeout, self.publisher.publish(batch)).await {
			Ok(result) => result,
			Err(e) => Err(PublishError::timeout(
				"Publishing batch exceeded its deadline",
				Some(Box::new(e)),
				Some(HashMap::from([
					("batch_size".to_string(), batch.len().to_string()),
					(
						"timeout_ms".to_string(),
						self.publish_timeout.as_millis().to_string(),
					),
				])),
			)),
		}
	}

	/// Processes a delivery and acknowledges it exactly once.
	///
	/// Never fails: every error is logged, counted and reflected in the report.
	#[instrument(skip_all, fields(tag = delivery.tag()))]
	pub async fn handle_delivery<D: Delivery>(&self, delivery: D) -> DeliveryReport {
		let tag = delivery.tag();

		let (stage, outcome) = match self.process(delivery.body()).await {
			Ok(report) => (report.stage, report.outcome),
			Err(NotifierError::Decode(e)) => {
				tracing::error!(error = %e, "dropping undecodable delivery");
				(PipelineStage::Received, DeliveryOutcome::DecodeFailed)
			}
			Err(NotifierError::Resolver(e)) => {
				tracing::error!(error = %e, "abandoning delivery after failed lookup");
				(
					PipelineStage::AddressesExtracted,
					DeliveryOutcome::ResolveFailed,
				)
			}
		};
		record_delivery(outcome.label());

		let acked = match delivery.ack().await {
			Ok(()) => true,
			Err(e) => {
				record_ack_failure();
				tracing::error!(error = %e, "failed to acknowledge delivery");
				false
			}
		};

		let report = DeliveryReport {
			tag,
			stage: if acked { PipelineStage::Acked } else { stage },
			outcome,
			acked,
		};
		tracing::info!(
			stage = %report.stage,
			outcome = outcome.label(),
			"delivery handled"
		);
		report
	}
}
