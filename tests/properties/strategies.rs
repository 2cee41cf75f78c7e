use proptest::{option, prelude::*};
use transaction_notifier::{
	models::{
		CoinId, Notification, Subscription, Transaction, TransactionStatus, TransactionSummary,
		TransferDirection,
	},
	utils::tests::builders::{subscription::SubscriptionBuilder, transaction::TransactionBuilder},
};

const MAX_COINS: CoinId = 4;
const ADDRESS_POOL: [&str; 6] = ["0xa", "0xb", "0xc", "0xd", "0xe", "0xf"];

pub const MAX_COLLECTION_SIZE: usize = 12;

pub fn coin_strategy() -> impl Strategy<Value = CoinId> {
	1..MAX_COINS
}

/// Addresses come from a small pool so that overlaps across transactions are common
pub fn address_strategy() -> impl Strategy<Value = String> {
	prop::sample::select(ADDRESS_POOL.to_vec()).prop_map(str::to_string)
}

pub fn transaction_strategy() -> impl Strategy<Value = Transaction> {
	(
		coin_strategy(),
		address_strategy(),
		address_strategy(),
		option::of((address_strategy(), address_strategy())),
	)
		.prop_map(|(coin, from, to, token_parties)| {
			let builder = TransactionBuilder::new().coin(coin).from(&from).to(&to);
			match token_parties {
				Some((token_from, token_to)) => builder
					.token_transfer("0xtoken", "100", &token_from, &token_to)
					.build(),
				None => builder.transfer("1", None).build(),
			}
		})
}

/// Transactions with ids `t0`, `t1`, ... in list order
pub fn transactions_strategy() -> impl Strategy<Value = Vec<Transaction>> {
	prop::collection::vec(transaction_strategy(), 0..MAX_COLLECTION_SIZE).prop_map(
		|transactions| {
			transactions
				.into_iter()
				.enumerate()
				.map(|(index, mut transaction)| {
					transaction.id = format!("t{}", index);
					transaction
				})
				.collect()
		},
	)
}

/// Subscriptions with unique ids `s0`, `s1`, ... in list order
pub fn subscriptions_strategy() -> impl Strategy<Value = Vec<Subscription>> {
	prop::collection::vec((coin_strategy(), address_strategy()), 0..MAX_COLLECTION_SIZE).prop_map(
		|pairs| {
			pairs
				.into_iter()
				.enumerate()
				.map(|(index, (coin, address))| {
					SubscriptionBuilder::new()
						.id(&format!("s{}", index))
						.coin(coin)
						.address(&address)
						.build()
				})
				.collect()
		},
	)
}

/// A notification whose subscription id records its position in the input
pub fn indexed_notification(index: usize) -> Notification {
	Notification {
		subscription_id: index.to_string(),
		targets: vec!["device".to_string()],
		transaction: TransactionSummary {
			id: format!("t{}", index),
			coin: 1,
			address: "0xa".to_string(),
			counterparty: None,
			direction: TransferDirection::Incoming,
			amount: None,
			symbol: None,
			decimals: None,
			token_id: None,
			fee: None,
			status: TransactionStatus::Completed,
			block: None,
			date: None,
			memo: None,
		},
	}
}

/// Parses the numeric suffix of ids such as `t3` or `s12`
pub fn index_of(id: &str) -> usize {
	id[1..].parse().unwrap()
}
