//! Politeness-aware HTTP fetcher
//!
//! The single network boundary for page and sitemap content. Every request
//! goes through the per-host rate limiter, the transport connection ceiling,
//! and the 429 backoff-and-retry protocol. All failures degrade to "no
//! content" for the caller.

use crate::config::{Config, HttpConfig};
use crate::crawler::limiter::RateLimiter;
use crate::url::extract_host;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, RETRY_AFTER};
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Builds an HTTP client with a realistic browser-like header set
///
/// # Arguments
///
/// * `config` - The HTTP transport configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(
        "Upgrade-Insecure-Requests",
        HeaderValue::from_static("1"),
    );
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
    headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
    headers.insert("Sec-Fetch-Site", HeaderValue::from_static("none"));

    Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .pool_max_idle_per_host(config.max_keepalive)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Parses a Retry-After header value as whole seconds.
///
/// HTTP-date forms are ignored; only the delta-seconds form is honored.
fn parse_retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}

/// The politeness-aware fetcher
///
/// Owns the HTTP client, the injected rate limiter, and the transport
/// connection ceiling. Cancellation is honored at every suspension point.
pub struct Fetcher {
    client: Client,
    limiter: RateLimiter,
    permits: Semaphore,
    cancel: CancellationToken,
}

impl Fetcher {
    /// Creates a fetcher for one crawl session.
    pub fn new(config: &Config, cancel: CancellationToken) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.http)?;
        let limiter = RateLimiter::new(
            Duration::from_millis(config.crawler.host_delay_ms),
            Duration::from_millis(config.crawler.retry_after_floor_ms),
            Duration::from_millis(config.crawler.backoff_cap_ms),
        );

        Ok(Self {
            client,
            limiter,
            permits: Semaphore::new(config.http.max_connections),
            cancel,
        })
    }

    /// The session rate limiter (shared with the scheduler for its
    /// inter-batch delay).
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// The underlying HTTP client, for collaborators that need raw
    /// responses (platform detection).
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches a URL and returns its body text, or None on any failure.
    pub async fn fetch_text(&self, url: &str) -> Option<String> {
        let response = self.fetch_response(url).await?;
        response.text().await.ok()
    }

    /// Fetches a URL and returns its raw body bytes, or None on any failure.
    ///
    /// Sitemap documents come through here so gzip-compressed bodies stay
    /// intact for the caller to decompress.
    pub async fn fetch_bytes(&self, url: &str) -> Option<Vec<u8>> {
        let response = self.fetch_response(url).await?;
        response.bytes().await.ok().map(|b| b.to_vec())
    }

    /// Issues a GET with per-host politeness and the 429 protocol.
    ///
    /// On 429: honor Retry-After when present (raising the host's minimum
    /// delay to at least the configured floor), otherwise double the host's
    /// delay up to the cap; then retry exactly once. Anything other than a
    /// final 200 is None.
    async fn fetch_response(&self, url: &str) -> Option<Response> {
        let host = extract_host(url)?;

        let _permit = self.permits.acquire().await.ok()?;

        let wait = self.limiter.reserve(&host).await;
        if !wait.is_zero() {
            tracing::trace!("Politeness wait of {:?} before {}", wait, url);
            self.sleep_unless_cancelled(wait).await?;
        }

        match self.client.get(url).send().await {
            Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => {
                let wait = match parse_retry_after(&response) {
                    Some(seconds) => {
                        let retry_after = Duration::from_secs(seconds);
                        self.limiter.apply_retry_after(&host, retry_after).await;
                        tracing::warn!(
                            "429 from {}, Retry-After {}s, retrying once",
                            host,
                            seconds
                        );
                        retry_after
                    }
                    None => {
                        let backoff = self.limiter.backoff(&host).await;
                        tracing::warn!(
                            "429 from {} without Retry-After, backing off {:?}",
                            host,
                            backoff
                        );
                        backoff
                    }
                };

                self.sleep_unless_cancelled(wait).await?;

                // Exactly one retry; a second 429 degrades to a plain failure
                match self.client.get(url).send().await {
                    Ok(retry) if retry.status() == StatusCode::OK => Some(retry),
                    Ok(retry) => {
                        tracing::debug!("Retry of {} returned {}", url, retry.status());
                        None
                    }
                    Err(e) => {
                        tracing::debug!("Retry of {} failed: {}", url, e);
                        None
                    }
                }
            }
            Ok(response) if response.status() == StatusCode::OK => Some(response),
            Ok(response) => {
                tracing::debug!("Fetch of {} returned {}", url, response.status());
                None
            }
            Err(e) => {
                tracing::debug!("Fetch of {} failed: {}", url, e);
                None
            }
        }
    }

    /// Suspends for `duration`, or returns None if the session is cancelled
    /// first.
    async fn sleep_unless_cancelled(&self, duration: Duration) -> Option<()> {
        tokio::select! {
            _ = tokio::time::sleep(duration) => Some(()),
            _ = self.cancel.cancelled() => {
                tracing::debug!("Cancelled during politeness wait");
                None
            }
        }
    }
}
