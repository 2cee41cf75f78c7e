//! Queue error types.

use crate::utils::logging::error::{BoxedSource, ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// Errors raised by the queue transport
#[derive(ThisError, Debug)]
pub enum QueueError {
	/// The acknowledgment could not be delivered to the broker
	#[error("Ack error: {0}")]
	AckError(Box<ErrorContext>),

	/// The queue is closed and accepts no more messages
	#[error("Queue closed: {0}")]
	Closed(Box<ErrorContext>),
}

impl QueueError {
	pub fn ack_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::AckError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn closed(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Closed(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}
}

impl TraceableError for QueueError {
	fn trace_id(&self) -> String {
		match self {
			Self::AckError(ctx) | Self::Closed(ctx) => ctx.trace_id.clone(),
		}
	}
}
