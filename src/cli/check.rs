//! Check command implementation

use super::FreshnessArgs;
use crate::config::Config;
use crate::freshness::{self, CanonicalInstant, Clock, FreshnessVerdict, SystemClock};
use crate::relay;
use clap::Args;
use reqwest::StatusCode;
use serde_json::json;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Vendor timestamp, e.g. "11-Aug-2025 15:29:59"; omit to check a missing one
    pub timestamp: Option<String>,

    #[command(flatten)]
    pub freshness: FreshnessArgs,

    /// Evaluate at this RFC 3339 instant instead of the system clock
    #[arg(long)]
    pub now: Option<String>,
}

impl CheckArgs {
    /// Returns whether the timestamp passed both guards
    pub fn execute(&self, config: &Config) -> anyhow::Result<bool> {
        let now = match &self.now {
            Some(raw) => CanonicalInstant::from_rfc3339(raw)?,
            None => SystemClock.now(),
        };
        let max_age = self.freshness.max_age_secs(config);

        let report = check_report(self.timestamp.as_deref(), &now, max_age)?;
        println!("{}", serde_json::to_string_pretty(&report)?);

        Ok(report["status"] == StatusCode::OK.as_u16())
    }
}

/// Status, body and the full verdict for one timestamp
pub fn check_report(
    timestamp: Option<&str>,
    now: &CanonicalInstant,
    max_age_secs: u64,
) -> anyhow::Result<serde_json::Value> {
    let instant = timestamp.and_then(|raw| {
        freshness::parse_vendor_timestamp(raw)
            .map_err(|e| tracing::warn!(error = %e, "Timestamp does not parse"))
            .ok()
    });
    let verdict = FreshnessVerdict::evaluate(instant.as_ref(), now, max_age_secs);

    let assessment = freshness::assess_instant(instant.as_ref(), now, max_age_secs);
    let (status, body) = relay::assessment_body(&assessment)?;

    Ok(json!({
        "now": now,
        "status": status.as_u16(),
        "body": body,
        "verdict": verdict,
    }))
}
