use serde::{Deserialize, Serialize};

use crate::models::{AddressKey, CoinId};

/// An address subscription owned by the subscription-management API.
///
/// The notifier only reads these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Subscription {
	/// Unique identifier of the subscription
	pub id: String,

	/// Coin the address belongs to
	pub coin: CoinId,

	/// Subscribed address
	pub address: String,

	/// Device or push-token identifiers to deliver to
	pub targets: Vec<String>,
}

impl Subscription {
	pub fn address_key(&self) -> AddressKey {
		AddressKey::new(self.coin, &self.address)
	}
}
