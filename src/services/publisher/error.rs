//! Publisher error types and handling.
//!
//! A publish failure is scoped to one batch: it is logged and counted, and never affects
//! sibling batches or the acknowledgment of the delivery.

use crate::utils::logging::error::{BoxedSource, ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// Represents errors that can occur while publishing a batch
#[derive(ThisError, Debug)]
pub enum PublishError {
	/// The outbound channel could not be reached
	#[error("Network error: {0}")]
	NetworkError(Box<ErrorContext>),

	/// The publisher is misconfigured (bad secret, unusable header)
	#[error("Config error: {0}")]
	ConfigError(Box<ErrorContext>),

	/// The batch could not be serialized or signed
	#[error("Internal error: {0}")]
	InternalError(Box<ErrorContext>),

	/// The outbound channel rejected the batch
	#[error("Publish failed: {0}")]
	NotifyFailed(Box<ErrorContext>),

	/// The publish call did not finish before its deadline
	#[error("Publish timed out: {0}")]
	Timeout(Box<ErrorContext>),
}

impl PublishError {
	pub fn network_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NetworkError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn config_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConfigError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn internal_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InternalError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn notify_failed(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NotifyFailed(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn timeout(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Timeout(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}
}

impl TraceableError for PublishError {
	fn trace_id(&self) -> String {
		match self {
			Self::NetworkError(ctx)
			| Self::ConfigError(ctx)
			| Self::InternalError(ctx)
			| Self::NotifyFailed(ctx)
			| Self::Timeout(ctx) => ctx.trace_id.clone(),
		}
	}
}
