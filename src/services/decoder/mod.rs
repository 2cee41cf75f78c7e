//! Delivery decoding.
//!
//! A delivery body is a JSON array of transactions. Unknown fields are ignored so that
//! producers can add data without breaking the notifier; a missing required field fails
//! the whole delivery.

mod error;

pub use error::DecodeError;

use std::collections::HashMap;

use crate::models::Transaction;

fn body_metadata(body: &[u8]) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"body_bytes".to_string(),
		body.len().to_string(),
	)]))
}

/// Decodes a raw delivery body into transactions, preserving their order
///
/// # Errors
/// * [`DecodeError::ParseError`] if the body is not a JSON array of transactions
/// * [`DecodeError::ValidationError`] if a transaction has an empty id
pub fn decode_delivery(body: &[u8]) -> Result<Vec<Transaction>, DecodeError> {
	let transactions: Vec<Transaction> = serde_json::from_slice(body).map_err(|e| {
		DecodeError::parse_error(
			format!("Failed to decode delivery body: {}", e),
			Some(Box::new(e)),
			body_metadata(body),
		)
	})?;

	if let Some(position) = transactions.iter().position(|tx| tx.id.trim().is_empty()) {
		return Err(DecodeError::validation_error(
			"Transaction id cannot be empty",
			None,
			Some(HashMap::from([(
				"position".to_string(),
				position.to_string(),
			)])),
		));
	}

	Ok(transactions)
}
