//! Scoring and ranking module for Policy-Scout
//!
//! Deterministic keyword scoring plus the optional external re-ranker seam.

mod reranker;
mod scorer;

pub use reranker::{apply_reranker, NoopReranker, UrlReranker};
pub use scorer::{rank_urls, score_url, ScoredUrl};
