//! Bootstrap module for initializing services.
//!
//! Loads the notifier configuration, builds the subscription repository and the
//! configured publisher, and wires them into a [`NotifierService`].
//!
//! # Services
//! - `SubscriptionRepository`: Serves subscriptions loaded from disk
//! - `NotificationPublisher`: Webhook or log delivery of notification batches
//! - `NotifierService`: Runs the pipeline for each queue delivery

use std::{error::Error, path::Path, sync::Arc};
use tracing::info;

use crate::{
	models::{ConfigLoader, NotifierConfig, PublisherConfig},
	repositories::SubscriptionRepository,
	services::{
		notifier::NotifierService,
		publisher::{LogPublisher, NotificationPublisher, WebhookPublisher},
	},
	utils::{build_notification_http_client, DEFAULT_CONFIG_PATH},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Notifier over the file-backed repository and whichever publisher is configured
pub type Notifier = NotifierService<SubscriptionRepository, dyn NotificationPublisher>;

/// Everything the binary needs to start consuming
pub struct NotifierComponents {
	pub config: NotifierConfig,
	pub repository: Arc<SubscriptionRepository>,
	pub notifier: Arc<Notifier>,
}

/// Loads the notifier configuration.
///
/// An explicit `path` must exist. Without one, the default location is tried and
/// built-in defaults are used when no file is there.
pub async fn load_config(path: Option<&Path>) -> Result<NotifierConfig> {
	match path {
		Some(path) => Ok(NotifierConfig::load_from_path(path).await?),
		None => {
			let default_path = Path::new(DEFAULT_CONFIG_PATH);
			if default_path.is_file() {
				Ok(NotifierConfig::load_from_path(default_path).await?)
			} else {
				info!(
					path = DEFAULT_CONFIG_PATH,
					"No notifier config file found, using defaults"
				);
				Ok(NotifierConfig::default())
			}
		}
	}
}

/// Creates the publisher selected by the `publisher` section of the config
pub fn create_publisher(config: &PublisherConfig) -> Result<Arc<dyn NotificationPublisher>> {
	match config {
		PublisherConfig::Webhook { retry_policy, .. } => {
			let client = Arc::new(build_notification_http_client(retry_policy)?);
			Ok(Arc::new(WebhookPublisher::from_config(config, client)?))
		}
		PublisherConfig::Log => Ok(Arc::new(LogPublisher::new())),
	}
}

/// Initializes all required services for the notifier.
///
/// # Errors
/// Returns an error if the subscriptions cannot be loaded or the publisher cannot be
/// built from its configuration
pub async fn initialize_services(config: NotifierConfig) -> Result<NotifierComponents> {
	let repository =
		Arc::new(SubscriptionRepository::new(Some(config.subscriptions_path.as_path())).await?);
	info!(
		subscriptions = repository.len(),
		addresses = repository.address_count(),
		"Loaded subscriptions"
	);

	let publisher = create_publisher(&config.publisher)?;
	let notifier = Arc::new(NotifierService::new(
		repository.clone(),
		publisher,
		&config,
	));

	Ok(NotifierComponents {
		config,
		repository,
		notifier,
	})
}
