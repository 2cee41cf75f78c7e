//! Notification building.
//!
//! Pairs every matched subscription with every transaction that touches its address on
//! its coin. Pairs are emitted subscription by subscription, each in transaction order.

use crate::models::{
	Notification, Subscription, Transaction, TransactionMetadata, TransactionSummary,
	TransferDirection,
};

/// Builds one notification per (subscription, transaction) pair.
///
/// A subscription that matches no transaction produces nothing. Several transactions
/// touching the same subscription each produce their own notification.
pub fn build_notifications(
	subscriptions: &[Subscription],
	transactions: &[Transaction],
) -> Vec<Notification> {
	subscriptions
		.iter()
		.flat_map(move |subscription| {
			let key = subscription.address_key();
			transactions
				.iter()
				.filter(move |tx| tx.involves(&key))
				.map(move |tx| Notification {
					subscription_id: subscription.id.clone(),
					targets: subscription.targets.clone(),
					transaction: summarize(tx, &subscription.address),
				})
		})
		.collect()
}

/// Sender and receiver of the value moved, which for token transfers differ from the
/// outer transaction's parties.
fn value_parties(tx: &Transaction) -> (&str, &str) {
	match &tx.metadata {
		Some(TransactionMetadata::TokenTransfer { from, to, .. }) => (from.as_str(), to.as_str()),
		_ => (tx.from.as_str(), tx.to.as_str()),
	}
}

fn direction_and_counterparty<'a>(
	tx: &'a Transaction,
	address: &str,
) -> (TransferDirection, Option<&'a str>) {
	let (from, to) = value_parties(tx);

	let (direction, counterparty) = if address == from && address == to {
		(TransferDirection::SelfTransfer, None)
	} else if address == from {
		(TransferDirection::Outgoing, Some(to))
	} else if address == to {
		(TransferDirection::Incoming, Some(from))
	} else if address == tx.from {
		// Signer of a token transfer it is not a party to
		(TransferDirection::Outgoing, Some(tx.to.as_str()))
	} else {
		(TransferDirection::Incoming, Some(tx.from.as_str()))
	};

	(direction, counterparty.filter(|c| !c.is_empty()))
}

fn summarize(tx: &Transaction, address: &str) -> TransactionSummary {
	let (direction, counterparty) = direction_and_counterparty(tx, address);

	let (amount, symbol, decimals, token_id) = match &tx.metadata {
		Some(TransactionMetadata::Transfer {
			value,
			symbol,
			decimals,
		}) => (Some(value.clone()), symbol.clone(), *decimals, None),
		Some(TransactionMetadata::TokenTransfer {
			token_id,
			value,
			symbol,
			decimals,
			..
		}) => (
			Some(value.clone()),
			symbol.clone(),
			*decimals,
			Some(token_id.clone()),
		),
		Some(TransactionMetadata::ContractCall { value, .. }) => (value.clone(), None, None, None),
		None => (None, None, None, None),
	};

	TransactionSummary {
		id: tx.id.clone(),
		coin: tx.coin,
		address: address.to_string(),
		counterparty: counterparty.map(str::to_string),
		direction,
		amount,
		symbol,
		decimals,
		token_id,
		fee: tx.fee.clone(),
		status: tx.status,
		block: tx.block,
		date: tx.date,
		memo: tx.memo.clone(),
	}
}
