//! Notifier configuration loading and validation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{
	collections::HashMap,
	path::{Path, PathBuf},
	time::Duration,
};

use crate::{
	models::config::{error::ConfigError, ConfigLoader},
	utils::{
		RetryConfig, DEFAULT_MAX_BATCH_SIZE, DEFAULT_PREFETCH_COUNT, DEFAULT_PUBLISH_TIMEOUT_MS,
		DEFAULT_RESOLVER_TIMEOUT_MS, DEFAULT_SUBSCRIPTIONS_PATH,
	},
};

fn default_max_batch_size() -> usize {
	DEFAULT_MAX_BATCH_SIZE
}

fn default_prefetch_count() -> usize {
	DEFAULT_PREFETCH_COUNT
}

fn default_resolver_timeout_ms() -> u64 {
	DEFAULT_RESOLVER_TIMEOUT_MS
}

fn default_publish_timeout_ms() -> u64 {
	DEFAULT_PUBLISH_TIMEOUT_MS
}

fn default_subscriptions_path() -> PathBuf {
	PathBuf::from(DEFAULT_SUBSCRIPTIONS_PATH)
}

/// Outbound channel the notification batches are handed to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PublisherConfig {
	/// POST each batch as JSON to a push gateway
	Webhook {
		url: String,
		/// HMAC-SHA256 key used to sign the payload
		#[serde(default)]
		secret: Option<String>,
		#[serde(default)]
		headers: Option<HashMap<String, String>>,
		#[serde(default)]
		retry_policy: RetryConfig,
	},
	/// Emit each batch as a structured log event
	#[default]
	Log,
}

/// Settings consumed by the notification pipeline and its queue consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifierConfig {
	/// Upper bound on notifications per published batch
	#[serde(default = "default_max_batch_size")]
	pub max_batch_size: usize,

	/// Deliveries processed concurrently
	#[serde(default = "default_prefetch_count")]
	pub prefetch_count: usize,

	/// Deadline for one subscription lookup
	#[serde(default = "default_resolver_timeout_ms")]
	pub resolver_timeout_ms: u64,

	/// Deadline for publishing one batch
	#[serde(default = "default_publish_timeout_ms")]
	pub publish_timeout_ms: u64,

	/// Directory of subscription files
	#[serde(default = "default_subscriptions_path")]
	pub subscriptions_path: PathBuf,

	#[serde(default)]
	pub publisher: PublisherConfig,
}

impl Default for NotifierConfig {
	fn default() -> Self {
		Self {
			max_batch_size: default_max_batch_size(),
			prefetch_count: default_prefetch_count(),
			resolver_timeout_ms: default_resolver_timeout_ms(),
			publish_timeout_ms: default_publish_timeout_ms(),
			subscriptions_path: default_subscriptions_path(),
			publisher: PublisherConfig::default(),
		}
	}
}

impl NotifierConfig {
	pub fn resolver_timeout(&self) -> Duration {
		Duration::from_millis(self.resolver_timeout_ms)
	}

	pub fn publish_timeout(&self) -> Duration {
		Duration::from_millis(self.publish_timeout_ms)
	}
}

fn path_metadata(path: &Path) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.display().to_string(),
	)]))
}

fn field_metadata(field: &str) -> Option<HashMap<String, String>> {
	Some(HashMap::from([("field".to_string(), field.to_string())]))
}

#[async_trait]
impl ConfigLoader for NotifierConfig {
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::file_error(
				format!("failed to read notifier config file: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		let config: NotifierConfig = serde_json::from_str(&contents).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse notifier config: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		config.validate()?;
		Ok(config)
	}

	/// Ensures that:
	/// - batches, concurrency and deadlines are non-zero
	/// - a webhook publisher has a parseable http(s) URL and, if set, a non-empty secret
	fn validate(&self) -> Result<(), ConfigError> {
		if self.max_batch_size == 0 {
			return Err(ConfigError::validation_error(
				"max_batch_size must be at least 1",
				None,
				field_metadata("max_batch_size"),
			));
		}

		if self.prefetch_count == 0 {
			return Err(ConfigError::validation_error(
				"prefetch_count must be at least 1",
				None,
				field_metadata("prefetch_count"),
			));
		}

		if self.resolver_timeout_ms == 0 || self.publish_timeout_ms == 0 {
			return Err(ConfigError::validation_error(
				"timeouts must be greater than zero",
				None,
				None,
			));
		}

		if let PublisherConfig::Webhook { url, secret, .. } = &self.publisher {
			let parsed = url::Url::parse(url).map_err(|e| {
				ConfigError::validation_error(
					format!("invalid webhook url: {}", e),
					Some(Box::new(e)),
					field_metadata("publisher.url"),
				)
			})?;
			if !matches!(parsed.scheme(), "http" | "https") {
				return Err(ConfigError::validation_error(
					"webhook url must use http or https",
					None,
					field_metadata("publisher.url"),
				));
			}
			if secret.as_deref().is_some_and(str::is_empty) {
				return Err(ConfigError::validation_error(
					"webhook secret cannot be empty",
					None,
					field_metadata("publisher.secret"),
				));
			}
		}

		Ok(())
	}
}
