//! Integration tests for the NSE client

use crate::support::{index_payload, received, reply, spawn_upstream};
use nse_relay::config::{ProxyConfig, UpstreamConfig};
use nse_relay::nse::{FetchError, NseClient, SnapshotSource, INDEX_PATH};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer};

fn upstream_config(base_url: &str, max_attempts: u32) -> UpstreamConfig {
    UpstreamConfig {
        base_url: base_url.to_string(),
        max_attempts,
        retry_delay_ms: 10,
        timeout_secs: 5,
        ..UpstreamConfig::default()
    }
}

fn header_value<'a>(request: &'a wiremock::Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_fetch_sends_index_and_headers() {
    let upstream = spawn_upstream(vec![reply(200, &index_payload("11-Aug-2025 15:29:59"))]).await;
    let client = NseClient::new(&upstream_config(&upstream.uri(), 1), None).unwrap();

    let snapshot = client.fetch_index("NIFTY 50").await.unwrap();
    assert_eq!(snapshot.timestamp.as_deref(), Some("11-Aug-2025 15:29:59"));
    assert_eq!(snapshot.data.len(), 2);

    let requests = received(&upstream).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), INDEX_PATH);
    assert_eq!(requests[0].url.query(), Some("index=NIFTY%2050"));
    assert_eq!(header_value(&requests[0], "user-agent"), Some("Mozilla/5.0"));
    assert_eq!(header_value(&requests[0], "accept"), Some("application/json"));
}

#[tokio::test]
async fn test_fetch_retries_then_succeeds() {
    let upstream = spawn_upstream(vec![
        reply(503, "{}"),
        reply(403, "Access Denied"),
        reply(200, &index_payload("11-Aug-2025 15:29:59")),
    ])
    .await;
    let client = NseClient::new(&upstream_config(&upstream.uri(), 3), None).unwrap();

    let snapshot = client.fetch("NIFTY 50").await.unwrap();
    assert_eq!(snapshot.name.as_deref(), Some("NIFTY 50"));
    assert_eq!(received(&upstream).await.len(), 3);
}

#[tokio::test]
async fn test_fetch_gives_up_after_max_attempts() {
    let upstream = spawn_upstream(vec![reply(403, "Access Denied")]).await;
    let client = NseClient::new(&upstream_config(&upstream.uri(), 2), None).unwrap();

    let err = client.fetch("NIFTY 50").await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 403, .. }));
    assert_eq!(err.to_string(), "Upstream returned 403: Access Denied");
    assert_eq!(received(&upstream).await.len(), 2);
}

#[tokio::test]
async fn test_retry_delay_grows_linearly() {
    let upstream = spawn_upstream(vec![reply(503, "{}")]).await;
    let config = UpstreamConfig {
        retry_delay_ms: 50,
        ..upstream_config(&upstream.uri(), 3)
    };
    let client = NseClient::new(&config, None).unwrap();

    let started = Instant::now();
    let err = client.fetch("NIFTY 50").await.unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, FetchError::Status { status: 503, .. }));
    assert_eq!(received(&upstream).await.len(), 3);
    // 50ms before the second attempt, 100ms before the third
    assert!(elapsed >= Duration::from_millis(150), "elapsed {elapsed:?}");
}

#[tokio::test]
async fn test_decode_errors_are_not_retried() {
    let upstream = spawn_upstream(vec![reply(200, "<html>blocked</html>")]).await;
    let client = NseClient::new(&upstream_config(&upstream.uri(), 3), None).unwrap();

    let err = client.fetch("NIFTY 50").await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
    assert_eq!(received(&upstream).await.len(), 1);
}

#[tokio::test]
async fn test_fetch_through_proxy() {
    // base64("user:pass")
    let proxy_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("proxy-authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(reply(200, &index_payload("11-Aug-2025 15:29:59")))
        .expect(1)
        .mount(&proxy_server)
        .await;

    let proxy = ProxyConfig {
        host: "127.0.0.1".to_string(),
        port: proxy_server.address().port(),
        username: Some("user".to_string()),
        password: Some("pass".to_string()),
    };

    let client = NseClient::new(&upstream_config("http://nse.invalid", 1), Some(&proxy)).unwrap();
    let snapshot = client.fetch("NIFTY 50").await.unwrap();
    assert_eq!(snapshot.data.len(), 2);

    let requests = received(&proxy_server).await;
    assert_eq!(requests[0].url.host_str(), Some("nse.invalid"));
    assert_eq!(requests[0].url.path(), INDEX_PATH);
    proxy_server.verify().await;
}
