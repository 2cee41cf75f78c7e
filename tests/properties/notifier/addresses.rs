use crate::properties::strategies::transactions_strategy;

use proptest::{prelude::*, test_runner::Config};
use transaction_notifier::{models::AddressKey, services::notifier::extract_address_keys};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	// Every address of every transaction appears, qualified by that transaction's coin
	#[test]
	fn test_all_roles_are_extracted(transactions in transactions_strategy()) {
		let keys = extract_address_keys(&transactions);

		for transaction in &transactions {
			for address in transaction.addresses() {
				prop_assert!(keys.contains(&AddressKey::new(transaction.coin, address)));
			}
		}
	}

	// Nothing is extracted that no transaction mentions
	#[test]
	fn test_no_foreign_keys(transactions in transactions_strategy()) {
		let keys = extract_address_keys(&transactions);

		for key in &keys {
			prop_assert!(transactions.iter().any(|transaction| transaction.involves(key)));
		}
	}

	// Repeating or reordering the input does not change the result
	#[test]
	fn test_duplicates_and_order_do_not_matter(transactions in transactions_strategy()) {
		let keys = extract_address_keys(&transactions);

		let mut doubled = transactions.clone();
		doubled.extend(transactions.iter().cloned());
		prop_assert_eq!(&extract_address_keys(&doubled), &keys);

		let mut reversed = transactions.clone();
		reversed.reverse();
		prop_assert_eq!(&extract_address_keys(&reversed), &keys);
	}
}
