//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines pipeline, subscription and system metrics.

pub mod server;
use lazy_static::lazy_static;
use prometheus::{Encoder, Gauge, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use sysinfo::{Disks, System};

use crate::repositories::SubscriptionRepository;

lazy_static! {
	/// Global Prometheus registry.
	///
	/// This registry holds all metrics defined in this module and is used
	/// to gather metrics for exposure via the metrics endpoint.
	pub static ref REGISTRY: Registry = Registry::new();

	/// Deliveries that reached a terminal outcome, labelled by outcome.
	pub static ref DELIVERIES_PROCESSED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("deliveries_processed_total", "Deliveries processed by outcome"),
			&["outcome"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Notifications built across all deliveries.
	pub static ref NOTIFICATIONS_BUILT: IntCounter = {
		let counter = IntCounter::new("notifications_built_total", "Notifications built").unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Published batches, labelled `success` or `failure`.
	pub static ref BATCHES_PUBLISHED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("batches_published_total", "Notification batches handed to the publisher"),
			&["status"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Acknowledgments the queue refused.
	pub static ref ACK_FAILURES: IntCounter = {
		let counter = IntCounter::new("ack_failures_total", "Failed delivery acknowledgments").unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Loaded subscriptions.
	pub static ref SUBSCRIPTIONS_TOTAL: Gauge = {
		let gauge = Gauge::new("subscriptions_total", "Number of loaded subscriptions").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Distinct coin-qualified addresses with at least one subscription.
	pub static ref SUBSCRIBED_ADDRESSES: Gauge = {
		let gauge = Gauge::new("subscribed_addresses", "Number of distinct subscribed addresses").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for CPU usage percentage.
	pub static ref CPU_USAGE: Gauge = {
		let gauge = Gauge::new("cpu_usage_percentage", "Current CPU usage percentage").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for memory usage percentage.
	pub static ref MEMORY_USAGE_PERCENT: Gauge = {
		let gauge = Gauge::new("memory_usage_percentage", "Memory usage percentage").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for memory usage in bytes.
	pub static ref MEMORY_USAGE: Gauge = {
		let gauge = Gauge::new("memory_usage_bytes", "Memory usage in bytes").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for total memory in bytes.
	pub static ref TOTAL_MEMORY: Gauge = {
		let gauge = Gauge::new("total_memory_bytes", "Total memory in bytes").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for available memory in bytes.
	pub static ref AVAILABLE_MEMORY: Gauge = {
		let gauge = Gauge::new("available_memory_bytes", "Available memory in bytes").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for used disk space in bytes.
	pub static ref DISK_USAGE: Gauge = {
		let gauge = Gauge::new("disk_usage_bytes", "Used disk space in bytes").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for disk usage percentage.
	pub static ref DISK_USAGE_PERCENT: Gauge = {
		let gauge = Gauge::new("disk_usage_percentage", "Disk usage percentage").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};
}

/// Gather all metrics and encode into the provided format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}

/// Counts one delivery under its outcome label.
pub fn record_delivery(outcome: &str) {
	DELIVERIES_PROCESSED.with_label_values(&[outcome]).inc();
}

pub fn record_notifications(count: usize) {
	NOTIFICATIONS_BUILT.inc_by(count as u64);
}

pub fn record_batch(success: bool) {
	let status = if success { "success" } else { "failure" };
	BATCHES_PUBLISHED.with_label_values(&[status]).inc();
}

pub fn record_ack_failure() {
	ACK_FAILURES.inc();
}

/// Updates the subscription gauges from the loaded repository.
pub fn update_subscription_metrics(repository: &SubscriptionRepository) {
	SUBSCRIPTIONS_TOTAL.set(repository.len() as f64);
	SUBSCRIBED_ADDRESSES.set(repository.address_count() as f64);
}

/// Updates the system metrics for CPU and memory usage.
pub fn update_system_metrics() {
	let mut sys = System::new_all();
	sys.refresh_all();

	CPU_USAGE.set(sys.global_cpu_usage() as f64);

	let total_memory = sys.total_memory();
	TOTAL_MEMORY.set(total_memory as f64);
	AVAILABLE_MEMORY.set(sys.available_memory() as f64);

	let memory_usage = sys.used_memory();
	MEMORY_USAGE.set(memory_usage as f64);

	let memory_percentage = if total_memory > 0 {
		(memory_usage as f64 / total_memory as f64) * 100.0
	} else {
		0.0
	};
	MEMORY_USAGE_PERCENT.set(memory_percentage);

	// Summed over every mounted disk
	let disks = Disks::new_with_refreshed_list();
	let mut total_disk_space: u64 = 0;
	let mut total_disk_available: u64 = 0;
	for disk in disks.list() {
		total_disk_space += disk.total_space();
		total_disk_available += disk.available_space();
	}
	let used_disk_space = total_disk_space.saturating_sub(total_disk_available);
	DISK_USAGE.set(used_disk_space as f64);

	let disk_percentage = if total_disk_space > 0 {
		(used_disk_space as f64 / total_disk_space as f64) * 100.0
	} else {
		0.0
	};
	DISK_USAGE_PERCENT.set(disk_percentage);
}
