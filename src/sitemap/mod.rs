//! Sitemap module for Policy-Scout
//!
//! robots.txt directive extraction plus recursive sitemap/sitemap-index
//! expansion into a flat candidate URL set.

mod reader;

pub use reader::{sitemap_directives, SitemapReader};
