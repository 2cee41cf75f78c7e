use crate::properties::strategies::{address_strategy, coin_strategy, subscriptions_strategy};

use proptest::{prelude::*, test_runner::Config};
use std::collections::HashSet;
use transaction_notifier::{
	models::AddressKey,
	repositories::{SubscriptionRepository, SubscriptionRepositoryTrait},
};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	// Lookup returns exactly the subscriptions whose key was asked for
	#[test]
	fn test_resolve_matches_requested_keys(
		subscriptions in subscriptions_strategy(),
		requested in prop::collection::hash_set((coin_strategy(), address_strategy()), 0..8),
	) {
		let keys: HashSet<AddressKey> = requested
			.iter()
			.map(|(coin, address)| AddressKey::new(*coin, address))
			.collect();
		let repository = SubscriptionRepository::from_subscriptions(subscriptions.clone()).unwrap();

		let resolved = futures::executor::block_on(repository.resolve_subscriptions(&keys)).unwrap();

		let mut resolved_ids: Vec<String> = resolved.into_iter().map(|s| s.id).collect();
		resolved_ids.sort();
		let mut expected_ids: Vec<String> = subscriptions
			.iter()
			.filter(|s| keys.contains(&s.address_key()))
			.map(|s| s.id.clone())
			.collect();
		expected_ids.sort();

		prop_assert_eq!(resolved_ids, expected_ids);
	}

	// Counts reflect the loaded records
	#[test]
	fn test_counts(subscriptions in subscriptions_strategy()) {
		let distinct: HashSet<AddressKey> =
			subscriptions.iter().map(|s| s.address_key()).collect();
		let repository = SubscriptionRepository::from_subscriptions(subscriptions.clone()).unwrap();

		prop_assert_eq!(repository.len(), subscriptions.len());
		prop_assert_eq!(repository.address_count(), distinct.len());
		prop_assert_eq!(repository.is_empty(), subscriptions.is_empty());
	}
}
