use crate::properties::strategies::{index_of, subscriptions_strategy, transactions_strategy};

use proptest::{prelude::*, test_runner::Config};
use transaction_notifier::services::notifier::build_notifications;

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	// Exactly one notification per (subscription, transaction) pair that shares an address key
	#[test]
	fn test_one_notification_per_matching_pair(
		subscriptions in subscriptions_strategy(),
		transactions in transactions_strategy(),
	) {
		let notifications = build_notifications(&subscriptions, &transactions);

		let expected: Vec<(usize, usize)> = subscriptions
			.iter()
			.enumerate()
			.flat_map(|(s, subscription)| {
				let key = subscription.address_key();
				transactions
					.iter()
					.enumerate()
					.filter(move |(_, transaction)| transaction.involves(&key))
					.map(move |(t, _)| (s, t))
			})
			.collect();
		let actual: Vec<(usize, usize)> = notifications
			.iter()
			.map(|n| (index_of(&n.subscription_id), index_of(&n.transaction.id)))
			.collect();

		prop_assert_eq!(actual, expected);
	}

	// Each notification is about its subscription's address on its transaction's coin
	#[test]
	fn test_notifications_are_sound(
		subscriptions in subscriptions_strategy(),
		transactions in transactions_strategy(),
	) {
		for notification in build_notifications(&subscriptions, &transactions) {
			let subscription = &subscriptions[index_of(&notification.subscription_id)];
			let transaction = &transactions[index_of(&notification.transaction.id)];

			prop_assert_eq!(notification.transaction.coin, transaction.coin);
			prop_assert_eq!(subscription.coin, transaction.coin);
			prop_assert_eq!(&notification.transaction.address, &subscription.address);
			prop_assert_eq!(&notification.targets, &subscription.targets);
			prop_assert!(transaction.involves(&subscription.address_key()));
		}
	}
}
