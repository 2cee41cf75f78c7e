//! Configuration loading and validation.
//!
//! Two kinds of files are read from disk: the notifier configuration itself and the
//! subscription files served by the file-backed subscription repository.

#![allow(clippy::result_large_err)]

use async_trait::async_trait;
use std::path::Path;

mod error;
mod notifier_config;
mod subscription_config;

pub use error::ConfigError;
pub use notifier_config::{NotifierConfig, PublisherConfig};
pub use subscription_config::SubscriptionFile;

/// Common interface for configuration files
#[async_trait]
pub trait ConfigLoader: Sized {
	/// Reads, parses and validates a single file
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	/// Returns Ok(()) if the loaded values are usable
	fn validate(&self) -> Result<(), ConfigError>;

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
