//! Mock implementation of the subscription repository trait.

use async_trait::async_trait;
use mockall::mock;
use std::collections::HashSet;

use transaction_notifier::{
	models::{AddressKey, Subscription},
	repositories::{RepositoryError, SubscriptionRepositoryTrait},
};

mock! {
	/// Mock implementation of the subscription store.
	pub SubscriptionRepository {}

	#[async_trait]
	impl SubscriptionRepositoryTrait for SubscriptionRepository {
		async fn resolve_subscriptions(
			&self,
			keys: &HashSet<AddressKey>,
		) -> Result<Vec<Subscription>, RepositoryError>;
	}
}
