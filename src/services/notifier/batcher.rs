//! Batching of notifications under a size limit.

use crate::models::{Notification, NotificationBatch};

/// Splits `notifications` into contiguous batches of at most `max_batch_size`, in order.
///
/// Only the last batch may be shorter than the limit. An empty input yields no batches.
/// A limit of zero is treated as one.
pub fn batch_notifications(
	notifications: Vec<Notification>,
	max_batch_size: usize,
) -> Vec<NotificationBatch> {
	let max_batch_size = max_batch_size.max(1);
	let mut batches = Vec::with_capacity(notifications.len().div_ceil(max_batch_size));
	let mut notifications = notifications.into_iter().peekable();

	while notifications.peek().is_some() {
		batches.push(notifications.by_ref().take(max_batch_size).collect());
	}

	batches
}
