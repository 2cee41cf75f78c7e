//! Queue transport seam.
//!
//! The broker itself is external. The pipeline only relies on [`Delivery`]: an opaque body
//! plus an acknowledgment handle that is consumed when used, so a delivery cannot be
//! acknowledged twice.
//!
//! - [`MemoryQueue`]: in-process queue used by the binary's replay mode and by tests
//! - [`QueueConsumer`]: drives deliveries through the notifier with bounded concurrency

use async_trait::async_trait;

mod consumer;
mod error;
mod memory;

pub use consumer::{ConsumerSummary, QueueConsumer};
pub use error::QueueError;
pub use memory::{MemoryDelivery, MemoryQueue, MemoryReceiver};

/// One message received from the queue
#[async_trait]
pub trait Delivery: Send + Sync + Sized + 'static {
	/// Raw message body
	fn body(&self) -> &[u8];

	/// Broker-assigned delivery tag, used for logging
	fn tag(&self) -> u64;

	/// Acknowledges the message, consuming the delivery
	async fn ack(self) -> Result<(), QueueError>;
}
