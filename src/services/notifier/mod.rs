//! Transaction notification pipeline.
//!
//! Leaf stages are plain functions; [`NotifierService`] sequences them per delivery:
//! - `addresses`: coin-qualified address keys of a transaction list
//! - `resolver`: subscription lookup under a deadline
//! - `builder`: one notification per (subscription, transaction) pair
//! - `batcher`: size-bounded, order-preserving batches
//! - `service`: orchestration and acknowledgment

mod addresses;
mod batcher;
mod builder;
mod error;
mod resolver;
mod service;

pub use addresses::extract_address_keys;
pub use batcher::batch_notifications;
pub use builder::build_notifications;
pub use error::{NotifierError, ResolverError};
pub use resolver::SubscriptionResolver;
pub use service::{
	DeliveryOutcome, DeliveryReport, NotifierService, PipelineStage, ProcessReport,
};
