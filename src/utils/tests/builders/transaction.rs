//! Test helper utilities for transactions
//!
//! - `TransactionBuilder`: Builder for creating test Transaction instances

use crate::models::{CoinId, Transaction, TransactionMetadata, TransactionStatus};

/// Builder for creating test Transaction instances
pub struct TransactionBuilder {
	id: String,
	coin: CoinId,
	from: String,
	to: String,
	fee: Option<String>,
	block: Option<u64>,
	date: Option<i64>,
	status: TransactionStatus,
	memo: Option<String>,
	metadata: Option<TransactionMetadata>,
}

impl Default for TransactionBuilder {
	fn default() -> Self {
		Self {
			id: "0xtx".to_string(),
			coin: 1,
			from: "sender".to_string(),
			to: "receiver".to_string(),
			fee: None,
			block: None,
			date: None,
			status: TransactionStatus::Completed,
			memo: None,
			metadata: None,
		}
	}
}

impl TransactionBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn id(mut self, id: &str) -> Self {
		self.id = id.to_string();
		self
	}

	pub fn coin(mut self, coin: CoinId) -> Self {
		self.coin = coin;
		self
	}

	pub fn from(mut self, from: &str) -> Self {
		self.from = from.to_string();
		self
	}

	pub fn to(mut self, to: &str) -> Self {
		self.to = to.to_string();
		self
	}

	pub fn fee(mut self, fee: &str) -> Self {
		self.fee = Some(fee.to_string());
		self
	}

	pub fn block(mut self, block: u64) -> Self {
		self.block = Some(block);
		self
	}

	pub fn date(mut self, date: i64) -> Self {
		self.date = Some(date);
		self
	}

	pub fn status(mut self, status: TransactionStatus) -> Self {
		self.status = status;
		self
	}

	pub fn memo(mut self, memo: &str) -> Self {
		self.memo = Some(memo.to_string());
		self
	}

	pub fn metadata(mut self, metadata: TransactionMetadata) -> Self {
		self.metadata = Some(metadata);
		self
	}

	/// Native transfer of `value` with an optional symbol
	pub fn transfer(self, value: &str, symbol: Option<&str>) -> Self {
		self.metadata(TransactionMetadata::Transfer {
			value: value.to_string(),
			symbol: symbol.map(str::to_string),
			decimals: None,
		})
	}

	/// Token transfer between `from` and `to`
	pub fn token_transfer(self, token_id: &str, value: &str, from: &str, to: &str) -> Self {
		self.metadata(TransactionMetadata::TokenTransfer {
			token_id: token_id.to_string(),
			value: value.to_string(),
			from: from.to_string(),
			to: to.to_string(),
			symbol: None,
			decimals: None,
		})
	}

	pub fn build(self) -> Transaction {
		Transaction {
			id: self.id,
			coin: self.coin,
			from: self.from,
			to: self.to,
			fee: self.fee,
			block: self.block,
			date: self.date,
			status: self.status,
			memo: self.memo,
			metadata: self.metadata,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_transaction() {
		let tx = TransactionBuilder::new().build();
		assert_eq!(tx.id, "0xtx");
		assert_eq!(tx.coin, 1);
		assert_eq!(tx.status, TransactionStatus::Completed);
		assert!(tx.metadata.is_none());
	}

	#[test]
	fn test_token_transfer_metadata() {
		let tx = TransactionBuilder::new()
			.token_transfer("usdt", "5", "a", "b")
			.build();
		assert!(matches!(
			tx.metadata,
			Some(TransactionMetadata::TokenTransfer { ref token_id, .. }) if token_id == "usdt"
		));
	}
}
