//! Domain models and configuration.
//!
//! - `core`: transactions, address keys, subscriptions and notifications
//! - `config`: notifier configuration and subscription files

mod config;
mod core;

pub use core::{
	AddressKey, CoinId, Notification, NotificationBatch, Subscription, Transaction,
	TransactionMetadata, TransactionStatus, TransactionSummary, TransferDirection,
};

pub use config::{ConfigError, ConfigLoader, NotifierConfig, PublisherConfig, SubscriptionFile};
