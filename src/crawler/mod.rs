//! Crawler module for Policy-Scout
//!
//! The politeness-aware fetcher, the link extractor, and the session
//! orchestration that drives the breadth-first crawl.

mod fetcher;
mod limiter;
mod parser;
mod session;

pub use fetcher::{build_http_client, Fetcher};
pub use limiter::{HostRateState, RateLimiter};
pub use parser::extract_links;
pub use session::{CrawlSession, CrawlSummary, SessionPhase};

use crate::config::Config;
use crate::rank::{apply_reranker, UrlReranker};
use crate::Result;

/// Runs a complete discovery session and returns the ranked URL list.
///
/// The result may be empty: an unreachable site or a site with no policy
/// content is a valid outcome, not an error.
pub async fn discover_policy_urls(config: &Config, target: &str) -> Result<Vec<String>> {
    let mut session = CrawlSession::new(config.clone(), target)?;
    let ranked = session.run().await;
    Ok(ranked.into_iter().map(|scored| scored.url).collect())
}

/// Like [`discover_policy_urls`], but passes the ranked list through an
/// external re-ranker. Re-ranker failure falls back to the core ordering.
pub async fn discover_policy_urls_reranked(
    config: &Config,
    target: &str,
    reranker: &dyn UrlReranker,
) -> Result<Vec<String>> {
    let urls = discover_policy_urls(config, target).await?;
    Ok(apply_reranker(reranker, urls).await)
}
