//! Optional external re-ranking
//!
//! A re-ranker is an outside service (an LLM prioritizer, a learned model)
//! that reorders an already-ranked URL list. It is strictly optional: the
//! default implementation is a no-op, and any failure or misbehavior falls
//! back to the core ordering.

use async_trait::async_trait;

/// A pluggable relevance re-ranker.
///
/// Implementations take the core-ranked URL list and return it reordered.
/// They must not be relied on: the caller survives errors, dropped entries,
/// and invented entries.
#[async_trait]
pub trait UrlReranker: Send + Sync {
    async fn rerank(&self, urls: Vec<String>) -> anyhow::Result<Vec<String>>;
}

/// The default re-ranker: returns the input order unchanged.
pub struct NoopReranker;

#[async_trait]
impl UrlReranker for NoopReranker {
    async fn rerank(&self, urls: Vec<String>) -> anyhow::Result<Vec<String>> {
        Ok(urls)
    }
}

/// Applies a re-ranker to a ranked list, degrading gracefully.
///
/// On error the core ordering is returned untouched. On success the result
/// is sanitized: entries the re-ranker invented are dropped, and entries it
/// lost are appended in their original relative order, so the output is
/// always a permutation of the input.
pub async fn apply_reranker(reranker: &dyn UrlReranker, ranked: Vec<String>) -> Vec<String> {
    let original = ranked.clone();

    match reranker.rerank(ranked).await {
        Ok(reordered) => {
            let mut result: Vec<String> = reordered
                .into_iter()
                .filter(|url| original.contains(url))
                .collect();

            // Dedup anything the re-ranker repeated
            let mut seen = std::collections::HashSet::new();
            result.retain(|url| seen.insert(url.clone()));

            for url in &original {
                if !seen.contains(url) {
                    result.push(url.clone());
                }
            }

            result
        }
        Err(e) => {
            tracing::warn!("Re-ranker failed, keeping core ranking: {}", e);
            original
        }
    }
}
