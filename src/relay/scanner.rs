//! Scanner: fetch, validate, assemble

use super::ScanResponse;
use crate::freshness::Clock;
use crate::nse::SnapshotSource;
use crate::telemetry::{self, ScanOutcome};
use tracing::Instrument;
use uuid::Uuid;

/// Owns the upstream handle and the clock used to judge snapshots
///
/// The upstream connection pool lives as long as the scanner and is released
/// when it is dropped.
pub struct Scanner {
    source: Box<dyn SnapshotSource>,
    clock: Box<dyn Clock>,
    index: String,
}

impl Scanner {
    pub fn new(
        source: impl SnapshotSource + 'static,
        clock: impl Clock + 'static,
        index: impl Into<String>,
    ) -> Self {
        Self {
            source: Box::new(source),
            clock: Box::new(clock),
            index: index.into(),
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Fetch the index snapshot once and judge it against `max_age_seconds`
    pub async fn scan(&self, max_age_seconds: u64) -> ScanResponse {
        let span = tracing::info_span!("scan", scan_id = %Uuid::new_v4(), index = %self.index);

        async move {
            let response = match self.source.fetch_index(&self.index).await {
                Ok(snapshot) => {
                    let now = self.clock.now();
                    ScanResponse::assemble(snapshot, &now, max_age_seconds)
                }
                Err(e) => ScanResponse::UpstreamFailed {
                    details: e.to_string(),
                },
            };

            log_outcome(&response, max_age_seconds);
            telemetry::record_scan(response.outcome());
            response
        }
        .instrument(span)
        .await
    }
}

fn log_outcome(response: &ScanResponse, max_age_seconds: u64) {
    match response {
        ScanResponse::Fresh(report) => {
            telemetry::record_snapshot_age(report.age_seconds);
            tracing::info!(
                ts_ist = %report.ts_ist,
                age_seconds = report.age_seconds,
                max_age_seconds,
                symbol_count = report.symbol_count,
                "Snapshot is fresh"
            );
        }
        ScanResponse::Rejected(rejection) => {
            tracing::warn!(
                outcome = ScanOutcome::from(rejection).as_str(),
                reason = %rejection,
                max_age_seconds,
                "Snapshot rejected"
            );
        }
        ScanResponse::UpstreamFailed { details } => {
            tracing::error!(details = %details, "Snapshot unavailable");
        }
    }
}
