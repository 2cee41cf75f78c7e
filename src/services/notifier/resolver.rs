//! Subscription resolution.
//!
//! Wraps a subscription repository with the lookup deadline. A store failure and a
//! missed deadline are both reported as [`ResolverError`] and abort the delivery's
//! notification attempt; nothing is retried here.

use std::{
	collections::{HashMap, HashSet},
	sync::Arc,
	time::Duration,
};

use crate::{
	models::{AddressKey, Subscription},
	repositories::SubscriptionRepositoryTrait,
	services::notifier::ResolverError,
};

/// Looks up the subscriptions of an address set within a deadline
pub struct SubscriptionResolver<R: ?Sized> {
	repository: Arc<R>,
	timeout: Duration,
}

impl<R: SubscriptionRepositoryTrait + ?Sized> SubscriptionResolver<R> {
	pub fn new(repository: Arc<R>, timeout: Duration) -> Self {
		Self {
			repository,
			timeout,
		}
	}

	/// Returns the subscriptions whose address key is in `keys`.
	///
	/// Records the store returns for keys outside the set are dropped.
	pub async fn resolve(
		&self,
		keys: &HashSet<AddressKey>,
	) -> Result<Vec<Subscription>, ResolverError> {
		let metadata = || {
			Some(HashMap::from([
				("keys".to_string(), keys.len().to_string()),
				(
					"timeout_ms".to_string(),
					self.timeout.as_millis().to_string(),
				),
			]))
		};

		let subscriptions =
			match tokio::time::timeout(self.timeout, self.repository.resolve_subscriptions(keys))
				.await
			{
				Ok(Ok(subscriptions)) => subscriptions,
				Ok(Err(e)) => {
					return Err(ResolverError::store_error(
						"Failed to resolve subscriptions",
						Some(Box::new(e)),
						metadata(),
					))
				}
				Err(e) => {
					return Err(ResolverError::timeout(
						"Subscription lookup exceeded its deadline",
						Some(Box::new(e)),
						metadata(),
					))
				}
			};

		Ok(subscriptions
			.into_iter()
			.filter(|subscription| keys.contains(&subscription.address_key()))
			.collect())
	}
}
