//! Scan command implementation

use super::{build_scanner, FreshnessArgs};
use crate::config::Config;
use clap::Args;

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub freshness: FreshnessArgs,

    /// Index to fetch; defaults to the configured index
    #[arg(long)]
    pub index: Option<String>,

    /// Pretty-print the JSON body
    #[arg(long)]
    pub pretty: bool,
}

impl ScanArgs {
    /// Returns whether the snapshot was served
    pub async fn execute(&self, config: &Config) -> anyhow::Result<bool> {
        let scanner = build_scanner(config, self.index.as_deref())?;
        let max_age = self.freshness.max_age_secs(config);

        let response = scanner.scan(max_age).await;
        let body = response.body()?;
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&body)?
        } else {
            serde_json::to_string(&body)?
        };

        tracing::info!(status = response.status().as_u16(), "Scan complete");
        println!("{rendered}");

        Ok(response.status().is_success())
    }
}
