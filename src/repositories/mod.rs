//! Repository implementations for subscription data.
//!
//! The notifier treats the subscription store as an external, read-only collaborator.
//! [`SubscriptionRepositoryTrait`] is the seam the pipeline depends on;
//! [`SubscriptionRepository`] is the file-backed implementation used by the binary.

mod error;
mod subscription;

pub use error::RepositoryError;
pub use subscription::{SubscriptionRepository, SubscriptionRepositoryTrait};
