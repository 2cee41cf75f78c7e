//! Utility modules for common functionality.
//!
//! - constants: Defaults for the notifier configuration
//! - http: Retryable HTTP client construction
//! - logging: Logging setup and the shared error context
//! - metrics: Prometheus metrics and the metrics server
//! - parsing: Parsing helpers for CLI and configuration values
//! - tests: Test builders and helpers

pub mod constants;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod parsing;

pub use constants::*;
pub use http::*;
pub use parsing::*;
