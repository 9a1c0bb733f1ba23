//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Final outcome of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Snapshot passed both guards
    Fresh,
    /// Snapshot is from another day or has no usable timestamp
    WrongDate,
    /// Snapshot is from today but too old
    DataTooOld,
    /// Upstream could not be fetched
    UpstreamError,
}

impl ScanOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanOutcome::Fresh => "fresh",
            ScanOutcome::WrongDate => "wrong_date",
            ScanOutcome::DataTooOld => "data_too_old",
            ScanOutcome::UpstreamError => "upstream_error",
        }
    }
}

/// Install the Prometheus exporter on `0.0.0.0:port`
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}

/// Count a finished scan by outcome
pub fn record_scan(outcome: ScanOutcome) {
    metrics::counter!("nserelay_scans_total", "outcome" => outcome.as_str()).increment(1);
}

/// Record the round-trip time of one upstream request
pub fn record_upstream_latency(duration: Duration) {
    metrics::histogram!("nserelay_upstream_latency_ms").record(duration.as_secs_f64() * 1000.0);
}

/// Record the age of the last snapshot that carried a usable timestamp
pub fn record_snapshot_age(age_seconds: u64) {
    metrics::gauge!("nserelay_snapshot_age_seconds").set(age_seconds as f64);
}
