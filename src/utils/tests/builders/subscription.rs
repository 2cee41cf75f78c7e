//! Test helper utilities for subscriptions
//!
//! - `SubscriptionBuilder`: Builder for creating test Subscription instances

use crate::models::{CoinId, Subscription};

/// Builder for creating test Subscription instances
pub struct SubscriptionBuilder {
	id: String,
	coin: CoinId,
	address: String,
	targets: Vec<String>,
}

impl Default for SubscriptionBuilder {
	fn default() -> Self {
		Self {
			id: "subscription-1".to_string(),
			coin: 1,
			address: "receiver".to_string(),
			targets: vec!["device-token".to_string()],
		}
	}
}

impl SubscriptionBuilder {
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

	pub fn address(mut self, address: &str) -> Self {
		self.address = address.to_string();
		self
	}

	pub fn targets(mut self, targets: Vec<String>) -> Self {
		self.targets = targets;
		self
	}

	pub fn target(mut self, target: &str) -> Self {
		self.targets.push(target.to_string());
		self
	}

	pub fn build(self) -> Subscription {
		Subscription {
			id: self.id,
			coin: self.coin,
			address: self.address,
			targets: self.targets,
		}
	}
}
