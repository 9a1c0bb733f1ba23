//! Watch command implementation

use super::{build_scanner, FreshnessArgs};
use crate::config::Config;
use clap::Args;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub freshness: FreshnessArgs,

    /// Index to fetch; defaults to the configured index
    #[arg(long)]
    pub index: Option<String>,

    /// Seconds between scans; defaults to the configured interval
    #[arg(long)]
    pub interval: Option<u64>,

    /// Stop after this many scans
    #[arg(long)]
    pub count: Option<u64>,
}

impl WatchArgs {
    /// Runs until Ctrl-C or `count` scans; returns whether the last scan was served
    pub async fn execute(&self, config: &Config) -> anyhow::Result<bool> {
        let scanner = build_scanner(config, self.index.as_deref())?;
        let max_age = self.freshness.max_age_secs(config);
        let interval = Duration::from_secs(self.interval.unwrap_or(config.watch.interval_secs).max(1));

        tracing::info!(
            index = scanner.index(),
            interval_secs = interval.as_secs(),
            max_age_secs = max_age,
            "Watching index snapshots"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        let mut scans = 0u64;
        let mut last_ok = true;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let response = scanner.scan(max_age).await;
                    println!("{}", serde_json::to_string(&response.body()?)?);
                    last_ok = response.status().is_success();

                    scans += 1;
                    if self.count.is_some_and(|count| scans >= count) {
                        break;
                    }
                }
                result = &mut shutdown => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "Failed to listen for shutdown signal");
                    }
                    tracing::info!(scans, "Shutting down");
                    break;
                }
            }
        }

        Ok(last_ok)
    }
}
