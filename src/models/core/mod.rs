//! Core domain models of the notification pipeline.
//!
//! - Transactions: decoded queue payloads and their coin-qualified address keys
//! - Subscriptions: address subscriptions read from the store
//! - Notifications: per-pair push records and the batches they are published in

mod notification;
mod subscription;
mod transaction;

pub use notification::{Notification, NotificationBatch, TransactionSummary, TransferDirection};
pub use subscription::Subscription;
pub use transaction::{AddressKey, CoinId, Transaction, TransactionMetadata, TransactionStatus};
