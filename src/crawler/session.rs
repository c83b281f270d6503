//! Crawl session orchestration
//!
//! One session owns the breadth-first traversal for one target site:
//! seeding the frontier from the homepage and sitemaps, draining it in
//! bounded concurrent batches, and handing the discovered set to the scorer
//! once crawling halts. All session state (frontier, discovered set,
//! crawled set, rate-limit table) dies with the session.

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_links;
use crate::rank::{rank_urls, ScoredUrl};
use crate::sitemap::SitemapReader;
use crate::url::normalize_candidate;
use crate::{Result, UrlError};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::{BTreeSet, HashSet};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Where a session currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Seeding,
    Crawling,
    Scoring,
    Done,
}

/// Closing statistics for a finished session
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub pages_crawled: usize,
    pub urls_discovered: usize,
    pub results_ranked: usize,
}

/// A single crawl-and-rank session against one target site
pub struct CrawlSession {
    config: Config,
    fetcher: Fetcher,
    base_url: Url,
    target_domain: String,

    /// Discovered but not yet crawled
    frontier: BTreeSet<String>,

    /// Everything ever seen this session; superset of frontier and crawled
    discovered: HashSet<String>,

    /// URLs a fetch has been dispatched for; never re-fetched
    crawled: HashSet<String>,

    phase: SessionPhase,
    cancel: CancellationToken,
    summary: Option<CrawlSummary>,
}

impl CrawlSession {
    /// Creates a session for a target given as a bare domain or a base URL.
    pub fn new(config: Config, target: &str) -> Result<Self> {
        let raw = if target.contains("://") {
            target.to_string()
        } else {
            format!("https://{}/", target)
        };

        let base_url = normalize_candidate(&raw)?;
        let target_domain = base_url
            .host_str()
            .ok_or(UrlError::MissingHost)?
            .to_lowercase();

        let cancel = CancellationToken::new();
        let fetcher = Fetcher::new(&config, cancel.clone())?;

        Ok(Self {
            config,
            fetcher,
            base_url,
            target_domain,
            frontier: BTreeSet::new(),
            discovered: HashSet::new(),
            crawled: HashSet::new(),
            phase: SessionPhase::Seeding,
            cancel,
            summary: None,
        })
    }

    /// A token that cancels the session from outside. Honored at batch
    /// boundaries, inter-batch delays, and per-host politeness waits.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Statistics for the finished session, if `run` has completed.
    pub fn summary(&self) -> Option<&CrawlSummary> {
        self.summary.as_ref()
    }

    /// Runs the full session: seed, crawl, score.
    ///
    /// Never fails: an unreachable site, missing sitemaps, and fetch errors
    /// all degrade toward an empty result list.
    pub async fn run(&mut self) -> Vec<ScoredUrl> {
        let started_at = Utc::now();
        let start = Instant::now();

        self.seed().await;
        self.crawl().await;

        self.phase = SessionPhase::Scoring;
        tracing::info!(
            "Scoring {} discovered URLs ({} pages crawled)",
            self.discovered.len(),
            self.crawled.len()
        );

        let ranked = rank_urls(
            self.discovered.iter().cloned(),
            self.config.crawler.max_results,
        );

        self.phase = SessionPhase::Done;
        self.summary = Some(CrawlSummary {
            started_at,
            elapsed: start.elapsed(),
            pages_crawled: self.crawled.len(),
            urls_discovered: self.discovered.len(),
            results_ranked: ranked.len(),
        });

        ranked
    }

    /// Seeds the frontier with the homepage plus sitemap-discovered URLs.
    async fn seed(&mut self) {
        self.phase = SessionPhase::Seeding;
        tracing::info!("Seeding crawl of {}", self.target_domain);

        let homepage = self.base_url.to_string();
        self.discovered.insert(homepage.clone());
        self.frontier.insert(homepage);

        let reader = SitemapReader::new(&self.fetcher, self.target_domain.clone());
        for url in reader.discover(&self.base_url).await {
            if self.discovered.insert(url.clone()) {
                self.frontier.insert(url);
            }
        }

        tracing::info!("Seeded frontier with {} URLs", self.frontier.len());
    }

    /// Drains the frontier in bounded concurrent batches.
    ///
    /// Each loop iteration removes up to one batch, marks every member
    /// crawled before dispatch (failed pages are not retried), fans the
    /// fetch+extract out concurrently, joins the whole batch, then folds
    /// fresh links back into the frontier. The crawled count is the loop
    /// bound, so the loop runs at most ceil(max_pages / batch_size) times.
    async fn crawl(&mut self) {
        self.phase = SessionPhase::Crawling;
        let max_pages = self.config.crawler.max_pages as usize;

        while !self.frontier.is_empty() && self.crawled.len() < max_pages {
            if self.cancel.is_cancelled() {
                tracing::info!("Crawl cancelled at batch boundary");
                break;
            }

            let remaining = max_pages - self.crawled.len();
            let take = self.config.crawler.batch_size.min(remaining);
            let batch: Vec<String> = self.frontier.iter().take(take).cloned().collect();

            for url in &batch {
                self.frontier.remove(url);
                self.crawled.insert(url.clone());
            }

            let this = &*self;
            let results = join_all(batch.iter().map(|url| this.crawl_page(url))).await;

            let mut fresh = 0usize;
            for links in results {
                for link in links {
                    if self.discovered.insert(link.clone()) {
                        self.frontier.insert(link);
                        fresh += 1;
                    }
                }
            }

            tracing::info!(
                "Crawled: {}, Found: {}, Queue: {} (+{} new)",
                self.crawled.len(),
                self.discovered.len(),
                self.frontier.len(),
                fresh
            );

            if self.frontier.is_empty() || self.crawled.len() >= max_pages {
                break;
            }

            // Politeness at the crawl cadence: the target's adapted delay
            // when it has pushed back, the configured default otherwise
            let delay = self
                .fetcher
                .limiter()
                .adapted_delay(&self.target_domain)
                .await
                .unwrap_or(Duration::from_millis(self.config.crawler.batch_delay_ms));

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.cancel.cancelled() => {
                    tracing::info!("Crawl cancelled during inter-batch delay");
                    break;
                }
            }
        }
    }

    /// Fetches one page and extracts its eligible outbound links.
    async fn crawl_page(&self, url: &str) -> HashSet<String> {
        tracing::debug!("Crawling: {}", url);

        let Some(body) = self.fetcher.fetch_text(url).await else {
            return HashSet::new();
        };

        let Ok(page_url) = Url::parse(url) else {
            return HashSet::new();
        };

        extract_links(&body, &page_url, &self.target_domain)
    }
}
