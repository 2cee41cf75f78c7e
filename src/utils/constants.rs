//! Constants shared across the notifier.

/// Default upper bound on notifications per published batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 50;

/// Default number of deliveries processed concurrently by the consumer.
pub const DEFAULT_PREFETCH_COUNT: usize = 10;

/// Default deadline for a subscription lookup, in milliseconds.
pub const DEFAULT_RESOLVER_TIMEOUT_MS: u64 = 5_000;

/// Default deadline for publishing one batch, in milliseconds.
pub const DEFAULT_PUBLISH_TIMEOUT_MS: u64 = 10_000;

/// Default location of the notifier configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/notifier.json";

/// Default directory holding subscription files.
pub const DEFAULT_SUBSCRIPTIONS_PATH: &str = "config/subscriptions";

/// Default bind address of the metrics server.
pub const DEFAULT_METRICS_ADDRESS: &str = "127.0.0.1:8081";
