//! Delivery decoding error types.

use crate::utils::logging::error::{BoxedSource, ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// Errors raised while turning a delivery body into transactions
///
/// A delivery that fails to decode is reported and acknowledged; redelivering it cannot
/// change the outcome.
#[derive(ThisError, Debug)]
pub enum DecodeError {
	/// The body is not a JSON array of transactions, or a required field is missing
	#[error("Parse error: {0}")]
	ParseError(Box<ErrorContext>),

	/// The body parsed but carries values the pipeline cannot use
	#[error("Validation error: {0}")]
	ValidationError(Box<ErrorContext>),
}

impl DecodeError {
	pub fn parse_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ParseError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn validation_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ValidationError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}
}

impl TraceableError for DecodeError {
	fn trace_id(&self) -> String {
		match self {
			Self::ParseError(ctx) | Self::ValidationError(ctx) => ctx.trace_id.clone(),
		}
	}
}
