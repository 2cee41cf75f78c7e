//! Core services implementing the notification pipeline.
//!
//! - `decoder`: delivery bodies to transactions
//! - `notifier`: address extraction, subscription lookup, building, batching and orchestration
//! - `publisher`: outbound delivery of notification batches
//! - `queue`: delivery abstraction, in-process queue and the consumer loop

pub mod decoder;
pub mod notifier;
pub mod publisher;
pub mod queue;
