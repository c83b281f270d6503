//! Policy-Scout: a polite policy-page discovery crawler
//!
//! This crate crawls an e-commerce site, merging sitemap enumeration with
//! breadth-first link following, and ranks the discovered URLs by how likely
//! they are to hold policy/help content (shipping, returns, FAQ).

pub mod config;
pub mod crawler;
pub mod platform;
pub mod rank;
pub mod render;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for Policy-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Policy-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::url::{is_crawl_eligible, normalize_candidate};
pub use config::Config;
pub use crawler::{discover_policy_urls, CrawlSession};
pub use rank::{rank_urls, score_url, ScoredUrl};
