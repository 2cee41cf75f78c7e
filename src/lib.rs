//! Transaction notification service.
//!
//! Consumes batches of decoded blockchain transactions from a queue, works out which
//! subscribed addresses each batch touches, and publishes one notification per
//! (subscription, transaction) pair in size-bounded batches. Every delivery is
//! acknowledged exactly once, after its terminal outcome.
//!
//! # Module Structure
//!
//! - `bootstrap`: Wires configuration, repository, publisher and notifier together
//! - `models`: Transactions, subscriptions, notifications and configuration
//! - `repositories`: Subscription storage and lookup
//! - `services`: Decoding, the notification pipeline, publishing and the queue consumer
//! - `utils`: Common utilities and helper functions

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
