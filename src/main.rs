//! Transaction notification service entry point.
//!
//! Loads the notifier configuration and subscriptions, then replays newline-delimited
//! delivery bodies from a file or stdin through the in-process queue. Each delivery is
//! run through the notification pipeline and acknowledged once.
//!
//! # Flow
//! 1. Applies CLI options to the environment and sets up logging
//! 2. Loads configuration, subscriptions and the configured publisher
//! 3. Optionally starts the metrics server
//! 4. Feeds deliveries to the queue consumer until the input ends
//! 5. Handles graceful shutdown on Ctrl+C, finishing in-flight deliveries first

use clap::Parser;
use dotenvy::dotenv_override;
use std::{
	env::{set_var, var},
	path::{Path, PathBuf},
};
use tokio::{
	fs::File,
	io::{AsyncBufRead, AsyncBufReadExt, BufReader},
	sync::watch,
};
use tracing::{error, info, warn};

use transaction_notifier::{
	bootstrap::{initialize_services, load_config, Result},
	services::queue::{MemoryQueue, QueueConsumer},
	utils::{
		logging::setup_logging, metrics::server::create_metrics_server,
		parse_string_to_bytes_size, DEFAULT_METRICS_ADDRESS,
	},
};

#[derive(Parser)]
#[command(
	name = "transaction-notifier",
	about = "Matches queued blockchain transactions against address subscriptions and publishes batched notifications.",
	version
)]
struct Cli {
	/// Path to the notifier configuration file (default: config/notifier.json)
	#[arg(long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// File of newline-delimited delivery bodies; reads stdin when omitted or "-"
	#[arg(long, value_name = "PATH")]
	deliveries: Option<PathBuf>,

	/// Write logs to file instead of stdout
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Maximum log file size before rolling (e.g., "1GB", "500MB", "1024KB")
	#[arg(long, value_name = "SIZE", value_parser = parse_string_to_bytes_size)]
	log_max_size: Option<u64>,

	/// Address to start the metrics server on (default: 127.0.0.1:8081)
	#[arg(long, value_name = "HOST:PORT")]
	metrics_address: Option<String>,

	/// Enable metrics server
	#[arg(long)]
	metrics: bool,

	/// Validate configuration and subscriptions without starting the service
	#[arg(long)]
	check: bool,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		// Values from .env take precedence over the inherited environment
		dotenv_override().ok();

		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}

		if let Some(max_size) = &self.log_max_size {
			set_var("LOG_MAX_SIZE", max_size.to_string());
		}

		if self.metrics {
			set_var("METRICS_ENABLED", "true");
		}

		if let Some(address) = &self.metrics_address {
			set_var("METRICS_ADDRESS", address);
		}
	}
}

/// Main entry point for the transaction notification service.
///
/// # Errors
/// Returns an error if configuration, subscriptions or the publisher cannot be set up.
#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	cli.apply_to_env();

	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	if cli.check {
		validate_configuration(cli.config.as_deref()).await;
		return Ok(());
	}

	let config = load_config(cli.config.as_deref())
		.await
		.map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
	let components = initialize_services(config)
		.await
		.map_err(|e| anyhow::anyhow!("Failed to initialize services: {}", e))?;

	let metrics_enabled =
		cli.metrics || var("METRICS_ENABLED").map(|v| v == "true").unwrap_or(false);
	let metrics_address =
		var("METRICS_ADDRESS").unwrap_or_else(|_| DEFAULT_METRICS_ADDRESS.to_string());

	let metrics_server = if metrics_enabled {
		info!("Metrics server enabled, starting on {}", metrics_address);
		match create_metrics_server(metrics_address, components.repository.clone()) {
			Ok(server) => Some(server),
			Err(e) => {
				error!("Failed to create metrics server: {}", e);
				None
			}
		}
	} else {
		info!("Metrics server disabled. Use --metrics flag or METRICS_ENABLED=true to enable");
		None
	};
	let metrics_future = async move {
		match metrics_server {
			Some(server) => server.await,
			None => futures::future::pending().await,
		}
	};

	let input = open_deliveries(cli.deliveries.as_deref())
		.await
		.map_err(|e| anyhow::anyhow!("Failed to open delivery input: {}", e))?;

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let (queue, receiver) = MemoryQueue::new();
	let feeder = tokio::spawn(replay_deliveries(input, queue));

	let consumer = QueueConsumer::new(
		components.notifier.clone(),
		components.config.prefetch_count,
	);
	let consume = consumer.run(receiver.into_stream(), shutdown_rx);
	tokio::pin!(consume);

	info!("Service started. Press Ctrl+C to shutdown");

	let finished = tokio::select! {
		summary = &mut consume => {
			info!("Delivery input exhausted, stopping services...");
			Some(summary)
		}
		result = tokio::signal::ctrl_c() => {
			if let Err(e) = result {
				error!("Error waiting for Ctrl+C: {}", e);
			}
			info!("Shutdown signal received, stopping services...");
			None
		}
		result = metrics_future => {
			if let Err(e) = result {
				error!("Metrics server error: {}", e);
			}
			info!("Metrics server stopped, shutting down services...");
			None
		}
	};

	// Every delivery was acknowledged once the input drained, so the feeder is done too
	let drained = finished.is_some();
	let summary = match finished {
		Some(summary) => summary,
		None => {
			let _ = shutdown_tx.send(true);
			consume.await
		}
	};

	if drained {
		match feeder.await {
			Ok(replay) => info!(
				published = replay.published,
				acked = replay.acked,
				"Delivery feeder finished"
			),
			Err(e) => error!("Delivery feeder failed: {}", e),
		}
	} else {
		feeder.abort();
	}

	info!(
		processed = summary.processed,
		acked = summary.acked,
		"Shutdown complete"
	);
	Ok(())
}

/// Counts kept by the delivery feeder
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ReplaySummary {
	published: usize,
	acked: usize,
}

/// Opens the delivery input: the file at `source`, or stdin when absent or "-"
async fn open_deliveries(
	source: Option<&Path>,
) -> std::io::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
	match source {
		Some(path) if path != Path::new("-") => {
			let file = File::open(path).await?;
			Ok(Box::new(BufReader::new(file)))
		}
		_ => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
	}
}

/// Publishes every non-empty line of `input` to `queue`, then closes it.
///
/// Acknowledgments are consumed while replaying. The feeder returns once the input is
/// exhausted and every published delivery has been acknowledged.
async fn replay_deliveries<R>(input: R, mut queue: MemoryQueue) -> ReplaySummary
where
	R: AsyncBufRead + Unpin + Send,
{
	let mut lines = input.lines();
	let mut reading = true;
	let mut summary = ReplaySummary::default();

	while reading || summary.acked < summary.published {
		tokio::select! {
			line = lines.next_line(), if reading => match line {
				Ok(Some(line)) => {
					let body = line.trim();
					if !body.is_empty() {
						match queue.publish(body) {
							Ok(_) => summary.published += 1,
							Err(e) => {
								warn!(error = %e, "Stopping replay, queue is closed");
								reading = false;
							}
						}
					}
				}
				Ok(None) => {
					info!(published = summary.published, "Finished replaying deliveries");
					reading = false;
				}
				Err(e) => {
					error!(error = %e, "Failed to read delivery input");
					reading = false;
				}
			},
			tag = queue.next_ack() => match tag {
				Some(_) => summary.acked += 1,
				None => break,
			},
		}

		if !reading {
			queue.close();
		}
	}

	summary
}

/// Validates configuration files and their structure
async fn validate_configuration(path: Option<&Path>) {
	info!("Validating configuration files...");

	let config = match load_config(path).await {
		Ok(config) => config,
		Err(e) => {
			error!("Invalid notifier configuration: {}", e);
			return;
		}
	};
	info!("✓ Notifier configuration is valid");

	match initialize_services(config).await {
		Ok(components) => {
			info!(
				"✓ Loaded {} subscription(s) for {} address(es)",
				components.repository.len(),
				components.repository.address_count()
			);
			if components.repository.is_empty() {
				warn!("No subscriptions found, every delivery will be acknowledged without notifications");
			}
			info!("Configuration validation completed successfully!");
		}
		Err(e) => {
			error!("{}", e);
		}
	}
}
