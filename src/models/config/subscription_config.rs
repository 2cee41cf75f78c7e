//! Subscription file loading and validation.
//!
//! A subscription file is a JSON array of [`Subscription`] records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{
	collections::{HashMap, HashSet},
	path::Path,
};

use crate::models::{
	config::{error::ConfigError, ConfigLoader},
	Subscription,
};

/// Contents of one subscription file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionFile {
	pub subscriptions: Vec<Subscription>,
}

fn subscription_metadata(subscription: &Subscription) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"subscription".to_string(),
		subscription.id.clone(),
	)]))
}

#[async_trait]
impl ConfigLoader for SubscriptionFile {
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let metadata = Some(HashMap::from([(
			"path".to_string(),
			path.display().to_string(),
		)]));

		let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::file_error(
				format!("failed to read subscription file: {}", e),
				Some(Box::new(e)),
				metadata.clone(),
			)
		})?;

		let file: SubscriptionFile = serde_json::from_str(&contents).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse subscription file: {}", e),
				Some(Box::new(e)),
				metadata,
			)
		})?;

		file.validate()?;
		Ok(file)
	}

	/// Every subscription needs an id, an address and at least one non-empty target.
	/// Ids must be unique within the file.
	fn validate(&self) -> Result<(), ConfigError> {
		let mut seen = HashSet::new();

		for subscription in &self.subscriptions {
			if subscription.id.trim().is_empty() {
				return Err(ConfigError::validation_error(
					"subscription id is required",
					None,
					None,
				));
			}
			if subscription.address.trim().is_empty() {
				return Err(ConfigError::validation_error(
					"subscription address is required",
					None,
					subscription_metadata(subscription),
				));
			}
			if subscription.targets.is_empty()
				|| subscription.targets.iter().any(|t| t.trim().is_empty())
			{
				return Err(ConfigError::validation_error(
					"subscription needs at least one non-empty target",
					None,
					subscription_metadata(subscription),
				));
			}
			if !seen.insert(subscription.id.as_str()) {
				return Err(ConfigError::validation_error(
					"duplicate subscription id",
					None,
					subscription_metadata(subscription),
				));
			}
		}

		Ok(())
	}
}
