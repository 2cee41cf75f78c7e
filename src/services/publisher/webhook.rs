//! Webhook publisher implementation.
//!
//! Sends each batch to a push gateway as `{"notifications": [...]}`. When a secret is
//! configured the exact request body is signed with HMAC-SHA256 over
//! `body + timestamp` and the result is sent in the `X-Signature` and `X-Timestamp`
//! headers.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use sha2::Sha256;
use std::{collections::HashMap, sync::Arc};

use crate::{
	models::{Notification, PublisherConfig},
	services::publisher::{NotificationPublisher, PublishError},
};

/// HMAC SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

/// Request body sent to the push gateway
#[derive(Debug, Serialize)]
pub struct NotificationEnvelope<'a> {
	pub notifications: &'a [Notification],
}

/// Represents a webhook configuration
#[derive(Debug, Clone)]
pub struct WebhookConfig {
	pub url: String,
	pub secret: Option<String>,
	pub headers: Option<HashMap<String, String>>,
}

/// Publishes notification batches to a webhook
#[derive(Debug)]
pub struct WebhookPublisher {
	/// Push gateway URL
	pub url: String,
	/// Shared HTTP client with retry middleware
	pub client: Arc<ClientWithMiddleware>,
	/// Signing key, if requests are signed
	pub secret: Option<String>,
	/// Content type plus any configured custom headers
	pub headers: HeaderMap,
}

impl WebhookPublisher {
	/// Creates a new webhook publisher
	///
	/// # Arguments
	/// * `config` - Webhook configuration
	/// * `http_client` - HTTP client with middleware for retries
	///
	/// # Returns
	/// * `Result<Self, PublishError>` - Publisher instance, or a config error if a custom
	///   header cannot be sent
	pub fn new(
		config: WebhookConfig,
		http_client: Arc<ClientWithMiddleware>,
	) -> Result<Self, PublishError> {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

		for (key, value) in config.headers.unwrap_or_default() {
			let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
				PublishError::config_error(
					format!("Invalid header name: {}", key),
					Some(Box::new(e)),
					None,
				)
			})?;
			let header_value = HeaderValue::from_str(&value).map_err(|e| {
				PublishError::config_error(
					format!("Invalid header value for {}", key),
					Some(Box::new(e)),
					None,
				)
			})?;
			headers.insert(header_name, header_value);
		}

		Ok(Self {
			url: config.url,
			client: http_client,
			secret: config.secret,
			headers,
		})
	}

	/// Creates a webhook publisher from the publisher section of the notifier config
	pub fn from_config(
		config: &PublisherConfig,
		http_client: Arc<ClientWithMiddleware>,
	) -> Result<Self, PublishError> {
		match config {
			PublisherConfig::Webhook {
				url,
				secret,
				headers,
				..
			} => Self::new(
				WebhookConfig {
					url: url.clone(),
					secret: secret.clone(),
					headers: headers.clone(),
				},
				http_client,
			),
			other => Err(PublishError::config_error(
				format!("Invalid webhook configuration: {:?}", other),
				None,
				None,
			)),
		}
	}

	/// Signs `payload + timestamp` with `secret`
	///
	/// # Returns
	/// * `(signature, timestamp)` with the signature hex-encoded and the timestamp in
	///   milliseconds since the epoch
	pub fn sign_payload(
		&self,
		secret: &str,
		payload: &str,
	) -> Result<(String, String), PublishError> {
		// `new_from_slice` accepts empty keys
		if secret.is_empty() {
			return Err(PublishError::config_error(
				"Invalid secret: cannot be empty.",
				None,
				None,
			));
		}

		let timestamp = Utc::now().timestamp_millis();

		let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| {
			PublishError::config_error(format!("Invalid secret: {}", e), None, None)
		})?;
		mac.update(format!("{}{}", payload, timestamp).as_bytes());

		let signature = hex::encode(mac.finalize().into_bytes());

		Ok((signature, timestamp.to_string()))
	}

	fn signature_headers(&self, body: &str) -> Result<HeaderMap, PublishError> {
		let mut headers = self.headers.clone();

		if let Some(secret) = &self.secret {
			let (signature, timestamp) = self.sign_payload(secret, body)?;

			headers.insert(
				HeaderName::from_static("x-signature"),
				HeaderValue::from_str(&signature).map_err(|e| {
					PublishError::internal_error(
						"Invalid signature value",
						Some(Box::new(e)),
						None,
					)
				})?,
			);
			headers.insert(
				HeaderName::from_static("x-timestamp"),
				HeaderValue::from_str(&timestamp).map_err(|e| {
					PublishError::internal_error(
						"Invalid timestamp value",
						Some(Box::new(e)),
						None,
					)
				})?,
			);
		}

		Ok(headers)
	}
}

#[async_trait]
impl NotificationPublisher for WebhookPublisher {
	async fn publish(&self, batch: &[Notification]) -> Result<(), PublishError> {
		let body = serde_json::to_string(&NotificationEnvelope {
			notifications: batch,
		})
		.map_err(|e| {
			PublishError::internal_error(
				format!("Failed to serialize batch: {}", e),
				Some(Box::new(e)),
				None,
			)
		})?;

		let headers = self.signature_headers(&body)?;

		let response = self
			.client
			.post(self.url.as_str())
			.headers(headers)
			.body(body)
			.send()
			.await
			.map_err(|e| {
				PublishError::network_error(
					format!("Failed to send webhook request: {}", e),
					Some(Box::new(e)),
					None,
				)
			})?;

		let status = response.status();
		if !status.is_success() {
			return Err(PublishError::notify_failed(
				format!("Webhook request failed with status: {}", status),
				None,
				Some(HashMap::from([
					("status".to_string(), status.as_u16().to_string()),
					("batch_size".to_string(), batch.len().to_string()),
				])),
			));
		}

		tracing::debug!(batch_size = batch.len(), "published batch to webhook");
		Ok(())
	}
}
