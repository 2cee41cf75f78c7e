//! Outbound delivery of notification batches.
//!
//! The pipeline only knows the [`NotificationPublisher`] trait. Two channels are provided:
//! - [`WebhookPublisher`]: POSTs each batch as JSON to a push gateway
//! - [`LogPublisher`]: writes each batch to the log, for dry runs and local testing

use async_trait::async_trait;

mod error;
mod log;
mod webhook;

use crate::models::Notification;

pub use error::PublishError;
pub use log::LogPublisher;
pub use webhook::{NotificationEnvelope, WebhookConfig, WebhookPublisher};

/// Hands one batch of notifications to an outbound channel
///
/// Every batch is independent: a failure of one call says nothing about the next.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
	async fn publish(&self, batch: &[Notification]) -> Result<(), PublishError>;
}
