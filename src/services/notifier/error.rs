//! Notifier error types.
//!
//! Every error here is contained to the delivery that caused it: it is logged, counted
//! and followed by the acknowledgment of that delivery.

use crate::{
	services::decoder::DecodeError,
	utils::logging::error::{BoxedSource, ErrorContext, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// Errors raised while looking up subscriptions
#[derive(ThisError, Debug)]
pub enum ResolverError {
	/// The subscription store failed
	#[error("Store error: {0}")]
	StoreError(Box<ErrorContext>),

	/// The store did not answer before the deadline
	#[error("Resolver timeout: {0}")]
	Timeout(Box<ErrorContext>),
}

impl ResolverError {
	pub fn store_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::StoreError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn timeout(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Timeout(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}
}

impl TraceableError for ResolverError {
	fn trace_id(&self) -> String {
		match self {
			Self::StoreError(ctx) | Self::Timeout(ctx) => ctx.trace_id.clone(),
		}
	}
}

/// Errors that abort the pipeline for one delivery
#[derive(ThisError, Debug)]
pub enum NotifierError {
	#[error(transparent)]
	Decode(#[from] DecodeError),

	#[error(transparent)]
	Resolver(#[from] ResolverError),
}

impl TraceableError for NotifierError {
	fn trace_id(&self) -> String {
		match self {
			Self::Decode(e) => e.trace_id(),
			Self::Resolver(e) => e.trace_id(),
		}
	}
}
