//! Configuration types for nse-relay

use serde::Deserialize;

/// Default NSE site root
pub const NSE_BASE_URL: &str = "https://www.nseindia.com";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
    #[serde(default)]
    pub freshness: FreshnessConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Upstream NSE endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Index name, e.g. "NIFTY 50"
    #[serde(default = "default_index")]
    pub index: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per fetch, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before retry n is n * retry_delay_ms
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_base_url() -> String {
    NSE_BASE_URL.to_string()
}
fn default_index() -> String {
    "NIFTY 50".to_string()
}
fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_max_attempts() -> u32 {
    3
}
fn default_retry_delay_ms() -> u64 {
    500
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            index: default_index(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Static HTTP proxy in front of the upstream
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Proxy URL without credentials
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// How strict the freshness guard is
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessMode {
    /// Near-real-time consumption, seconds of tolerance
    Live,
    /// Delayed quotes, minutes of tolerance
    #[default]
    Delayed,
}

/// Freshness thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct FreshnessConfig {
    #[serde(default)]
    pub mode: FreshnessMode,

    #[serde(default = "default_live_max_age_secs")]
    pub live_max_age_secs: u64,

    #[serde(default = "default_delayed_max_age_secs")]
    pub delayed_max_age_secs: u64,
}

fn default_live_max_age_secs() -> u64 {
    3
}
fn default_delayed_max_age_secs() -> u64 {
    900
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            mode: FreshnessMode::Delayed,
            live_max_age_secs: default_live_max_age_secs(),
            delayed_max_age_secs: default_delayed_max_age_secs(),
        }
    }
}

impl FreshnessConfig {
    /// Threshold for a mode
    pub fn max_age_secs(&self, mode: FreshnessMode) -> u64 {
        match mode {
            FreshnessMode::Live => self.live_max_age_secs,
            FreshnessMode::Delayed => self.delayed_max_age_secs,
        }
    }

    /// Resolve the effective threshold. An explicit max age wins, including 0.
    pub fn resolve(&self, mode: Option<FreshnessMode>, max_age_secs: Option<u64>) -> u64 {
        max_age_secs.unwrap_or_else(|| self.max_age_secs(mode.unwrap_or(self.mode)))
    }
}

/// Periodic scan configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    30
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; no exporter when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `PROXY_*` overrides from the process environment and `.env`
    pub fn with_process_env(self) -> anyhow::Result<Self> {
        // A missing .env file is normal
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "Ignoring unreadable .env file");
            }
        }
        self.with_env(|key| std::env::var(key).ok())
    }

    /// Apply `PROXY_HOST`, `PROXY_PORT`, `PROXY_USERNAME`, `PROXY_PASSWORD`
    ///
    /// `PROXY_HOST` enables the proxy; the others override the file values.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("PROXY_HOST").filter(|h| !h.is_empty());
        let port = lookup("PROXY_PORT")
            .map(|p| {
                p.parse::<u16>()
                    .map_err(|e| anyhow::anyhow!("Invalid PROXY_PORT {:?}: {}", p, e))
            })
            .transpose()?;

        let mut proxy = match (self.proxy.take(), host) {
            (_, Some(host)) => Some(ProxyConfig {
                host,
                port: port.unwrap_or(80),
                username: None,
                password: None,
            }),
            (existing, None) => existing,
        };

        if let Some(proxy) = proxy.as_mut() {
            if let Some(port) = port {
                proxy.port = port;
            }
            if let Some(username) = lookup("PROXY_USERNAME") {
                proxy.username = Some(username);
            }
            if let Some(password) = lookup("PROXY_PASSWORD") {
                proxy.password = Some(password);
            }
        }

        self.proxy = proxy;
        Ok(self)
    }
}
