//! Fetcher behavior against a mock server: status handling, the 429
//! protocol, and politeness adaptation.

use crate::test_config;
use policy_scout::crawler::Fetcher;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn make_fetcher() -> Fetcher {
    Fetcher::new(&test_config(), CancellationToken::new()).expect("Failed to build fetcher")
}

#[tokio::test]
async fn test_fetch_returns_body_on_200() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;

    let fetcher = make_fetcher();
    let body = fetcher.fetch_text(&format!("{}/page", server.uri())).await;
    assert_eq!(body, Some("hello".to_string()));
}

#[tokio::test]
async fn test_fetch_returns_none_on_404() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = make_fetcher();
    let body = fetcher
        .fetch_text(&format!("{}/missing", server.uri()))
        .await;
    assert!(body.is_none());
}

#[tokio::test]
async fn test_fetch_returns_none_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = make_fetcher();
    let body = fetcher.fetch_text(&format!("{}/page", server.uri())).await;
    assert!(body.is_none());
}

#[tokio::test]
async fn test_fetch_returns_none_on_unreachable_host() {
    // Bind a server and immediately drop it so the port refuses connections
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let fetcher = make_fetcher();
    let body = fetcher.fetch_text(&format!("{}/page", uri)).await;
    assert!(body.is_none());
}

#[tokio::test]
async fn test_429_with_retry_after_retries_once_and_adapts() {
    let server = MockServer::start().await;

    // First request: 429 with Retry-After. Mounted first, consumed once.
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // The retry lands here
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = make_fetcher();
    let start = std::time::Instant::now();
    let body = fetcher.fetch_text(&format!("{}/page", server.uri())).await;

    assert_eq!(body, Some("recovered".to_string()));
    // Suspended for the announced Retry-After before retrying
    assert!(start.elapsed() >= Duration::from_secs(1));

    // The host's minimum delay rose to max(Retry-After, floor) = 2s
    assert_eq!(
        fetcher.limiter().adapted_delay("127.0.0.1").await,
        Some(Duration::from_secs(2))
    );
}

#[tokio::test]
async fn test_429_twice_gives_up_after_single_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .expect(2)
        .mount(&server)
        .await;

    let fetcher = make_fetcher();
    let body = fetcher.fetch_text(&format!("{}/page", server.uri())).await;

    // The retried 429 degrades to a plain failure; no third attempt
    assert!(body.is_none());
}

#[tokio::test]
async fn test_429_without_retry_after_backs_off_exponentially() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let fetcher = make_fetcher();
    let body = fetcher.fetch_text(&format!("{}/page", server.uri())).await;

    assert_eq!(body, Some("ok".to_string()));
    // Host delay doubled from the 100ms default
    assert_eq!(
        fetcher.limiter().adapted_delay("127.0.0.1").await,
        Some(Duration::from_millis(200))
    );
}

#[tokio::test]
async fn test_same_host_requests_are_spaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let fetcher = make_fetcher();
    let start = std::time::Instant::now();

    fetcher.fetch_text(&format!("{}/a", server.uri())).await;
    fetcher.fetch_text(&format!("{}/b", server.uri())).await;
    fetcher.fetch_text(&format!("{}/c", server.uri())).await;

    // Three sequential requests to one host obey the 100ms minimum spacing
    assert!(start.elapsed() >= Duration::from_millis(200));
}
