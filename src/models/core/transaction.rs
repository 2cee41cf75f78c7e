use serde::{Deserialize, Serialize};
use std::fmt;

/// Coin identifier (SLIP-44 style integer)
pub type CoinId = u32;

/// Coin-qualified address used as the join key between transactions and subscriptions.
///
/// Rendered as `"<coin>_<address>"`. The same literal address may exist on several coins, so
/// an address is never looked up without its coin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressKey(String);

impl AddressKey {
	pub fn new(coin: CoinId, address: &str) -> Self {
		Self(format!("{}_{}", coin, address))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for AddressKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Confirmation status of a transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
	#[default]
	Completed,
	Pending,
	Error,
}

/// Type-specific payload carried with a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionMetadata {
	/// Native coin transfer
	Transfer {
		value: String,
		#[serde(default)]
		symbol: Option<String>,
		#[serde(default)]
		decimals: Option<u32>,
	},
	/// Token transfer. The token sender and receiver may differ from the outer
	/// transaction's `from`/`to` (the outer pair is usually the signer and the contract).
	TokenTransfer {
		token_id: String,
		value: String,
		from: String,
		to: String,
		#[serde(default)]
		symbol: Option<String>,
		#[serde(default)]
		decimals: Option<u32>,
	},
	/// Arbitrary contract invocation
	ContractCall {
		#[serde(default)]
		input: Option<String>,
		#[serde(default)]
		value: Option<String>,
	},
}

/// A decoded blockchain transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	pub id: String,
	pub coin: CoinId,
	pub from: String,
	pub to: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub block: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date: Option<i64>,
	#[serde(default)]
	pub status: TransactionStatus,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub memo: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<TransactionMetadata>,
}

impl Transaction {
	/// Every address the transaction touches, in role order (sender, receiver, then
	/// token sender and receiver), without duplicates or empty strings.
	pub fn addresses(&self) -> Vec<&str> {
		let mut roles = vec![self.from.as_str(), self.to.as_str()];
		if let Some(TransactionMetadata::TokenTransfer { from, to, .. }) = &self.metadata {
			roles.push(from.as_str());
			roles.push(to.as_str());
		}

		let mut addresses: Vec<&str> = Vec::with_capacity(roles.len());
		for address in roles {
			if !address.is_empty() && !addresses.contains(&address) {
				addresses.push(address);
			}
		}
		addresses
	}

	/// Coin-qualified keys for [`Transaction::addresses`]
	pub fn address_keys(&self) -> Vec<AddressKey> {
		self.addresses()
			.into_iter()
			.map(|address| AddressKey::new(self.coin, address))
			.collect()
	}

	/// Whether `key` is one of this transaction's address keys
	pub fn involves(&self, key: &AddressKey) -> bool {
		self.addresses()
			.into_iter()
			.any(|address| AddressKey::new(self.coin, address) == *key)
	}
}
