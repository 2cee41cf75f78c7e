//! In-process queue.
//!
//! Messages are handed out in publish order with increasing tags starting at 1.
//! Acknowledged tags are reported back to the [`MemoryQueue`].

use async_trait::async_trait;
use futures::{stream, Stream};
use std::{
	collections::HashMap,
	sync::atomic::{AtomicU64, Ordering},
};
use tokio::sync::mpsc;

use crate::services::queue::{Delivery, QueueError};

/// A message received from a [`MemoryQueue`]
#[derive(Debug)]
pub struct MemoryDelivery {
	tag: u64,
	body: Vec<u8>,
	acks: mpsc::UnboundedSender<u64>,
}

#[async_trait]
impl Delivery for MemoryDelivery {
	fn body(&self) -> &[u8] {
		&self.body
	}

	fn tag(&self) -> u64 {
		self.tag
	}

	async fn ack(self) -> Result<(), QueueError> {
		self.acks.send(self.tag).map_err(|e| {
			QueueError::ack_error(
				"Queue dropped before acknowledgment",
				Some(Box::new(e)),
				Some(HashMap::from([("tag".to_string(), self.tag.to_string())])),
			)
		})
	}
}

/// Producer side of the in-process queue
#[derive(Debug)]
pub struct MemoryQueue {
	deliveries: Option<mpsc::UnboundedSender<MemoryDelivery>>,
	ack_sender: mpsc::UnboundedSender<u64>,
	acks: mpsc::UnboundedReceiver<u64>,
	next_tag: AtomicU64,
}

/// Consumer side of the in-process queue
#[derive(Debug)]
pub struct MemoryReceiver {
	deliveries: mpsc::UnboundedReceiver<MemoryDelivery>,
}

impl MemoryQueue {
	pub fn new() -> (Self, MemoryReceiver) {
		let (delivery_tx, delivery_rx) = mpsc::unbounded_channel();
		let (ack_tx, ack_rx) = mpsc::unbounded_channel();

		(
			Self {
				deliveries: Some(delivery_tx),
				ack_sender: ack_tx,
				acks: ack_rx,
				next_tag: AtomicU64::new(1),
			},
			MemoryReceiver {
				deliveries: delivery_rx,
			},
		)
	}

	/// Enqueues a message and returns its tag
	pub fn publish(&self, body: impl Into<Vec<u8>>) -> Result<u64, QueueError> {
		let sender = self
			.deliveries
			.as_ref()
			.ok_or_else(|| QueueError::closed("Queue is closed", None, None))?;

		let tag = self.next_tag.fetch_add(1, Ordering::Relaxed);
		sender
			.send(MemoryDelivery {
				tag,
				body: body.into(),
				acks: self.ack_sender.clone(),
			})
			.map_err(|e| {
				QueueError::closed(
					"Receiver dropped",
					Some(Box::new(e)),
					Some(HashMap::from([("tag".to_string(), tag.to_string())])),
				)
			})?;

		Ok(tag)
	}

	/// Stops accepting messages; the receiver's stream ends once drained
	pub fn close(&mut self) {
		self.deliveries = None;
	}

	/// Tags acknowledged so far and not yet returned
	pub fn drain_acks(&mut self) -> Vec<u64> {
		let mut tags = Vec::new();
		while let Ok(tag) = self.acks.try_recv() {
			tags.push(tag);
		}
		tags
	}

	/// Waits for the next acknowledged tag
	pub async fn next_ack(&mut self) -> Option<u64> {
		self.acks.recv().await
	}

	/// Waits until `count` acknowledgments arrive
	pub async fn wait_for_acks(&mut self, count: usize) -> Vec<u64> {
		let mut tags = Vec::with_capacity(count);
		while tags.len() < count {
			match self.next_ack().await {
				Some(tag) => tags.push(tag),
				None => break,
			}
		}
		tags
	}
}

impl MemoryReceiver {
	/// Turns the receiver into a stream of deliveries
	pub fn into_stream(self) -> impl Stream<Item = MemoryDelivery> + Send {
		stream::unfold(self.deliveries, |mut deliveries| async move {
			deliveries.recv().await.map(|delivery| (delivery, deliveries))
		})
	}
}
