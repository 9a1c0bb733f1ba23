//! Telemetry module
//!
//! Structured logging and Prometheus metrics

mod logging;
mod metrics;

pub use logging::init_logging;
pub use metrics::{init_metrics, record_scan, record_snapshot_age, record_upstream_latency, ScanOutcome};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
///
/// The metrics exporter binds its listener on the current tokio runtime, so
/// this must be called from within one.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)?;

    if let Some(port) = config.metrics_port {
        init_metrics(port)?;
    }

    Ok(())
}
