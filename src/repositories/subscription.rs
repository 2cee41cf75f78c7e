//! Subscription repository implementation.
//!
//! Subscriptions are owned by the subscription-management API; the notifier only reads
//! them. The file-backed repository loads every `*.json` file of a directory once at
//! startup and indexes the records by their coin-qualified address key so that a
//! lookup is a set of hash map hits.

#![allow(clippy::result_large_err)]

use std::{
	collections::{HashMap, HashSet},
	path::{Path, PathBuf},
};

use async_trait::async_trait;
use glob::glob;

use crate::{
	models::{AddressKey, ConfigLoader, Subscription, SubscriptionFile},
	repositories::error::RepositoryError,
	utils::DEFAULT_SUBSCRIPTIONS_PATH,
};

/// Read-only lookup of subscriptions by address key
///
/// Implementations must be safe for concurrent reads; the notifier shares one instance
/// across every in-flight delivery.
#[async_trait]
pub trait SubscriptionRepositoryTrait: Send + Sync {
	/// Returns every subscription whose address key is in `keys`.
	///
	/// An empty result is not an error.
	async fn resolve_subscriptions(
		&self,
		keys: &HashSet<AddressKey>,
	) -> Result<Vec<Subscription>, RepositoryError>;
}

/// File-backed subscription store
#[derive(Debug, Clone, Default)]
pub struct SubscriptionRepository {
	/// Subscriptions grouped by address key
	pub subscriptions: HashMap<AddressKey, Vec<Subscription>>,
}

fn path_metadata(path: &Path) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.display().to_string(),
	)]))
}

impl SubscriptionRepository {
	/// Loads all subscription files from `path`, or the default subscriptions directory
	pub async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		let subscriptions = Self::load_all(path).await?;
		Ok(Self { subscriptions })
	}

	/// Builds a repository from records already in memory
	pub fn from_subscriptions(
		subscriptions: impl IntoIterator<Item = Subscription>,
	) -> Result<Self, RepositoryError> {
		let mut index: HashMap<AddressKey, Vec<Subscription>> = HashMap::new();
		let mut ids = HashSet::new();

		for subscription in subscriptions {
			if !ids.insert(subscription.id.clone()) {
				return Err(RepositoryError::validation_error(
					format!("duplicate subscription id '{}'", subscription.id),
					None,
					Some(HashMap::from([(
						"subscription".to_string(),
						subscription.id.clone(),
					)])),
				));
			}
			index
				.entry(subscription.address_key())
				.or_default()
				.push(subscription);
		}

		Ok(Self {
			subscriptions: index,
		})
	}

	/// Reads and validates every JSON file directly under the directory
	pub async fn load_all(
		path: Option<&Path>,
	) -> Result<HashMap<AddressKey, Vec<Subscription>>, RepositoryError> {
		let dir = path
			.map(Path::to_path_buf)
			.unwrap_or_else(|| PathBuf::from(DEFAULT_SUBSCRIPTIONS_PATH));

		if !dir.is_dir() {
			return Err(RepositoryError::load_error(
				"Failed to load subscriptions: directory not found",
				None,
				path_metadata(&dir),
			));
		}

		let pattern = dir.join("*").to_string_lossy().to_string();
		let entries = glob(&pattern).map_err(|e| {
			RepositoryError::load_error(
				"Failed to load subscriptions: invalid directory pattern",
				Some(Box::new(e)),
				path_metadata(&dir),
			)
		})?;

		let mut files: Vec<PathBuf> = entries
			.flatten()
			.filter(|path| path.is_file() && SubscriptionFile::is_json_file(path))
			.collect();
		files.sort();

		let mut records = Vec::new();
		for file in files {
			let loaded = SubscriptionFile::load_from_path(&file).await.map_err(|e| {
				RepositoryError::load_error(
					"Failed to load subscriptions",
					Some(Box::new(e)),
					path_metadata(&file),
				)
			})?;
			tracing::debug!(
				path = %file.display(),
				count = loaded.subscriptions.len(),
				"loaded subscription file"
			);
			records.extend(loaded.subscriptions);
		}

		Ok(Self::from_subscriptions(records)?.subscriptions)
	}

	/// Total number of subscriptions
	pub fn len(&self) -> usize {
		self.subscriptions.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.subscriptions.is_empty()
	}

	/// Number of distinct subscribed address keys
	pub fn address_count(&self) -> usize {
		self.subscriptions.len()
	}

	/// Subscriptions registered for one address key
	pub fn get(&self, key: &AddressKey) -> Option<&[Subscription]> {
		self.subscriptions.get(key).map(Vec::as_slice)
	}
}

#[async_trait]
impl SubscriptionRepositoryTrait for SubscriptionRepository {
	async fn resolve_subscriptions(
		&self,
		keys: &HashSet<AddressKey>,
	) -> Result<Vec<Subscription>, RepositoryError> {
		let mut keys: Vec<&AddressKey> = keys.iter().collect();
		keys.sort();

		Ok(keys
			.into_iter()
			.filter_map(|key| self.subscriptions.get(key))
			.flatten()
			.cloned()
			.collect())
	}
}
