use serde::{Deserialize, Serialize};

use crate::models::{CoinId, TransactionStatus};

/// Direction of value relative to the subscribed address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
	Incoming,
	Outgoing,
	#[serde(rename = "self")]
	SelfTransfer,
}

/// Transaction fields a push provider needs to render a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
	pub id: String,
	pub coin: CoinId,
	/// The subscribed address this notification is about
	pub address: String,
	pub counterparty: Option<String>,
	pub direction: TransferDirection,
	pub amount: Option<String>,
	pub symbol: Option<String>,
	pub decimals: Option<u32>,
	pub token_id: Option<String>,
	pub fee: Option<String>,
	pub status: TransactionStatus,
	pub block: Option<u64>,
	pub date: Option<i64>,
	pub memo: Option<String>,
}

/// One push notification for one (subscription, transaction) pair. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
	pub subscription_id: String,
	pub targets: Vec<String>,
	pub transaction: TransactionSummary,
}

/// Unit of publish: at most `max_batch_size` notifications in delivery order
pub type NotificationBatch = Vec<Notification>;
