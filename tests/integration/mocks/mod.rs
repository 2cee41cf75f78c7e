//! Mock implementations for testing purposes.
//!
//! Mocks of the subscription store and the publisher, implemented with `mockall`, plus
//! helpers to push a single delivery through the in-process queue.

mod repositories;
mod services;
#[allow(unused_imports)]
pub use repositories::*;
#[allow(unused_imports)]
pub use services::*;
