//! End-to-end tests: real client, mock upstream, pinned clock

use crate::support::{index_payload, reply, spawn_upstream};
use nse_relay::config::{Config, FreshnessMode, UpstreamConfig};
use nse_relay::freshness::{CanonicalInstant, FixedClock};
use nse_relay::nse::NseClient;
use nse_relay::relay::{ScanResponse, Scanner};
use serde_json::json;
use wiremock::MockServer;

async fn scanner_at(body: String, now: &str) -> (Scanner, MockServer) {
    let upstream = spawn_upstream(vec![reply(200, &body)]).await;
    let config = UpstreamConfig {
        base_url: upstream.uri(),
        max_attempts: 1,
        ..UpstreamConfig::default()
    };
    let client = NseClient::new(&config, None).unwrap();
    let clock = FixedClock::new(CanonicalInstant::from_rfc3339(now).unwrap());
    (Scanner::new(client, clock, "NIFTY 50"), upstream)
}

#[test]
fn test_config_example_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let config = Config::load(path).unwrap();
    assert_eq!(config.upstream.index, "NIFTY 50");
    assert_eq!(config.freshness.mode, FreshnessMode::Delayed);
    assert_eq!(config.freshness.resolve(Some(FreshnessMode::Live), None), 3);
    assert!(config.proxy.is_none());
}

#[tokio::test]
async fn test_fresh_snapshot_is_relayed() {
    let (scanner, _upstream) = scanner_at(
        index_payload("11-Aug-2025 15:29:59"),
        "2025-08-11T15:30:09+05:30",
    )
    .await;

    let response = scanner.scan(900).await;
    assert_eq!(response.status().as_u16(), 200);

    let body = response.body().unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["ts_ist"], "2025-08-11T15:29:59+05:30");
    assert_eq!(body["age_seconds"], 10);
    assert_eq!(body["symbol_count"], 1);
    assert_eq!(body["symbols"][0]["symbol"], "RELIANCE");
    assert_eq!(body["index_quote"]["symbol"], "NIFTY 50");
}

#[tokio::test]
async fn test_stale_snapshot_is_refused() {
    let (scanner, _upstream) = scanner_at(
        index_payload("11-Aug-2025 15:29:59"),
        "2025-08-11T15:45:59+05:30",
    )
    .await;

    let response = scanner.scan(900).await;
    assert_eq!(response.status().as_u16(), 412);
    assert_eq!(
        response.body().unwrap(),
        json!({
            "ok": false,
            "error": "DATA_TOO_OLD",
            "age_seconds": 960,
            "max_age_seconds": 900,
            "ts_ist": "2025-08-11T15:29:59+05:30",
        })
    );
}

#[tokio::test]
async fn test_previous_day_snapshot_is_refused() {
    let (scanner, _upstream) = scanner_at(
        index_payload("08-Aug-2025 15:30:00"),
        "2025-08-11T09:00:00+05:30",
    )
    .await;

    let response = scanner.scan(900).await;
    assert_eq!(
        response.body().unwrap(),
        json!({
            "ok": false,
            "error": "WRONG_DATE",
            "expected_day": "2025-08-11",
            "got_day": "2025-08-08",
            "ts_ist": "2025-08-08T15:30:00+05:30",
        })
    );
}

#[tokio::test]
async fn test_unreachable_upstream() {
    // Bind and drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = UpstreamConfig {
        base_url,
        max_attempts: 1,
        ..UpstreamConfig::default()
    };
    let client = NseClient::new(&config, None).unwrap();
    let clock = FixedClock::new(CanonicalInstant::from_rfc3339("2025-08-11T15:30:09+05:30").unwrap());
    let scanner = Scanner::new(client, clock, "NIFTY 50");

    let response = scanner.scan(900).await;
    assert!(matches!(response, ScanResponse::UpstreamFailed { .. }));
    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(response.body().unwrap()["error"], "Failed to fetch data");
}
