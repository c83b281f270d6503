//! HTML link extraction
//!
//! Pulls anchor hrefs out of a fetched page, resolves them against the page
//! URL, normalizes them to crawl-dedup form, and keeps only classifier-
//! eligible candidates. Malformed HTML yields whatever the lenient parser
//! can salvage, never an error.

use crate::url::{is_crawl_eligible, resolve_link};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts classifier-filtered outbound links from an HTML document.
///
/// # Arguments
///
/// * `html` - The page body
/// * `base_url` - The page's own URL, for resolving relative hrefs
/// * `target_domain` - The crawl target for the same-domain check
///
/// # Returns
///
/// Normalized absolute URLs that are eligible crawl candidates. The caller
/// is responsible for dropping URLs it has already crawled or discovered.
pub fn extract_links(html: &str, base_url: &Url, target_domain: &str) -> HashSet<String> {
    let document = Html::parse_document(html);
    let mut links = HashSet::new();

    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return links,
    };

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(resolved) = resolve_link(href, base_url) {
                let candidate = resolved.to_string();
                if is_crawl_eligible(&candidate, target_domain) {
                    links.insert(candidate);
                }
            }
        }
    }

    links
}
