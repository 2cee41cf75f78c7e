//! Queue consumer.
//!
//! Pulls deliveries from a stream and hands each to the notifier. Up to `prefetch`
//! deliveries are in flight at once; each one is processed sequentially by its own
//! pipeline run. A shutdown signal stops intake, and deliveries already in flight are
//! finished and acknowledged before [`QueueConsumer::run`] returns.

use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;

use crate::{
	repositories::SubscriptionRepositoryTrait,
	services::{
		notifier::{DeliveryReport, NotifierService},
		publisher::NotificationPublisher,
		queue::Delivery,
	},
};

/// Totals of one consumer run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerSummary {
	/// Deliveries handled
	pub processed: usize,
	/// Deliveries acknowledged
	pub acked: usize,
}

impl ConsumerSummary {
	fn record(mut self, report: &DeliveryReport) -> Self {
		self.processed += 1;
		if report.acked {
			self.acked += 1;
		}
		self
	}
}

/// Drives deliveries through a [`NotifierService`] with bounded concurrency
pub struct QueueConsumer<R: ?Sized, P: ?Sized> {
	notifier: Arc<NotifierService<R, P>>,
	prefetch: usize,
}

impl<R, P> QueueConsumer<R, P>
where
	R: SubscriptionRepositoryTrait + ?Sized,
	P: NotificationPublisher + ?Sized,
{
	pub fn new(notifier: Arc<NotifierService<R, P>>, prefetch: usize) -> Self {
		Self {
			notifier,
			prefetch: prefetch.max(1),
		}
	}

	/// Consumes `deliveries` until the stream ends or `shutdown` turns true
	pub async fn run<S, D>(
		&self,
		deliveries: S,
		mut shutdown: watch::Receiver<bool>,
	) -> ConsumerSummary
	where
		S: Stream<Item = D> + Send,
		D: Delivery,
	{
		let stop = async move {
			loop {
				let stop_requested = *shutdown.borrow_and_update();
				if stop_requested {
					break;
				}
				if shutdown.changed().await.is_err() {
					// Sender gone without a signal: keep consuming
					futures::future::pending::<()>().await;
				}
			}
			tracing::info!("Shutdown signal received, draining in-flight deliveries");
		};

		let summary = deliveries
			.take_until(stop)
			.map(|delivery| self.notifier.handle_delivery(delivery))
			.buffer_unordered(self.prefetch)
			.fold(ConsumerSummary::default(), |summary, report| async move {
				summary.record(&report)
			})
			.await;

		tracing::info!(
			processed = summary.processed,
			acked = summary.acked,
			"queue consumer stopped"
		);
		summary
	}
}
