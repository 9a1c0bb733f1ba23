//! CLI interface for nse-relay
//!
//! Provides subcommands for:
//! - `scan`: Fetch one snapshot and print the relay response
//! - `watch`: Scan periodically until interrupted
//! - `check`: Validate a vendor timestamp offline
//! - `config`: Show the effective configuration

mod check;
mod scan;
mod watch;

pub use check::CheckArgs;
pub use scan::ScanArgs;
pub use watch::WatchArgs;

use crate::config::{Config, FreshnessMode};
use crate::freshness::SystemClock;
use crate::nse::NseClient;
use crate::relay::Scanner;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "nse-relay")]
#[command(about = "Relay NSE India index snapshots with same-day and freshness validation")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one snapshot and print the relay response
    Scan(ScanArgs),
    /// Scan periodically until interrupted
    Watch(WatchArgs),
    /// Validate a vendor timestamp without fetching
    Check(CheckArgs),
    /// Show the effective configuration
    Config,
}

/// Threshold selection shared by every command that validates
#[derive(Args, Debug, Clone, Default)]
pub struct FreshnessArgs {
    /// Freshness mode; defaults to the configured mode
    #[arg(long, value_enum)]
    pub mode: Option<FreshnessMode>,

    /// Maximum snapshot age in seconds; overrides the mode (0 is allowed)
    #[arg(long)]
    pub max_age: Option<u64>,
}

impl FreshnessArgs {
    pub fn max_age_secs(&self, config: &Config) -> u64 {
        config.freshness.resolve(self.mode, self.max_age)
    }
}

/// Build a scanner against the live NSE endpoint
pub fn build_scanner(config: &Config, index: Option<&str>) -> anyhow::Result<Scanner> {
    let client = NseClient::new(&config.upstream, config.proxy.as_ref())?;
    let index = index.unwrap_or(&config.upstream.index);
    Ok(Scanner::new(client, SystemClock, index))
}

/// Print the effective configuration, masking the proxy password
pub fn print_config(config: &Config) {
    println!("Current configuration:");
    println!("  Upstream: {}", config.upstream.base_url);
    println!("  Index: {}", config.upstream.index);
    println!(
        "  Retries: {} attempts, {}ms linear backoff",
        config.upstream.max_attempts, config.upstream.retry_delay_ms
    );
    match &config.proxy {
        Some(proxy) => println!(
            "  Proxy: {} (user: {}, password: {})",
            proxy.url(),
            proxy.username.as_deref().unwrap_or("-"),
            if proxy.password.is_some() { "****" } else { "-" }
        ),
        None => println!("  Proxy: none"),
    }
    println!(
        "  Freshness: {:?} (live={}s, delayed={}s)",
        config.freshness.mode,
        config.freshness.live_max_age_secs,
        config.freshness.delayed_max_age_secs
    );
    println!("  Watch interval: {}s", config.watch.interval_secs);
}
