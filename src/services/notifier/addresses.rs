//! Address extraction.

use std::collections::HashSet;

use crate::models::{AddressKey, Transaction};

/// Collects the coin-qualified key of every address role of every transaction.
///
/// Each key appears once no matter how many transactions share it. Every transaction is
/// keyed by its own coin.
pub fn extract_address_keys(transactions: &[Transaction]) -> HashSet<AddressKey> {
	transactions
		.iter()
		.flat_map(Transaction::address_keys)
		.collect()
}
