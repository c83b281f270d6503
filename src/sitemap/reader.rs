//! Sitemap discovery and expansion
//!
//! Walks from robots.txt `Sitemap:` directives (or conventional fallback
//! locations) through nested sitemap indexes, flattening everything into one
//! classifier-filtered set of candidate page URLs. Expansion runs as a
//! worklist with a visited set keyed by sitemap URL, so self-references and
//! deeper reference cycles both terminate. Every per-document failure is
//! local: a sitemap that cannot be fetched, decompressed, or parsed simply
//! contributes nothing.

use crate::crawler::Fetcher;
use crate::url::{is_crawl_eligible, normalize_candidate};
use flate2::read::GzDecoder;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::{HashSet, VecDeque};
use std::io::Read;
use url::Url;

/// Conventional sitemap locations tried when robots.txt names none
const FALLBACK_SITEMAP_PATHS: &[&str] = &["/sitemap.xml", "/sitemap_index.xml", "/sitemap.xml.gz"];

/// The two kinds of `loc` entries a sitemap document can hold
#[derive(Debug, Default)]
struct SitemapDocument {
    /// Page URLs from `<url><loc>` entries
    page_urls: Vec<String>,

    /// Nested sitemap references from `<sitemap><loc>` entries
    nested: Vec<String>,
}

/// Discovers candidate URLs from a site's sitemaps
pub struct SitemapReader<'a> {
    fetcher: &'a Fetcher,
    target_domain: String,
}

impl<'a> SitemapReader<'a> {
    pub fn new(fetcher: &'a Fetcher, target_domain: impl Into<String>) -> Self {
        Self {
            fetcher,
            target_domain: target_domain.into(),
        }
    }

    /// Expands all reachable sitemaps into a flat set of candidate URLs.
    pub async fn discover(&self, base_url: &Url) -> HashSet<String> {
        let mut roots = self.sitemaps_from_robots(base_url).await;

        if roots.is_empty() {
            roots = FALLBACK_SITEMAP_PATHS
                .iter()
                .filter_map(|path| base_url.join(path).ok())
                .map(|u| u.to_string())
                .collect();
        }

        let mut urls = HashSet::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut worklist: VecDeque<String> = roots.into();

        while let Some(sitemap_url) = worklist.pop_front() {
            if !visited.insert(sitemap_url.clone()) {
                continue;
            }

            let Some(body) = self.fetcher.fetch_bytes(&sitemap_url).await else {
                tracing::debug!("Sitemap {} unavailable", sitemap_url);
                continue;
            };

            let body = maybe_decompress(&sitemap_url, body);
            let document = parse_sitemap_document(&body);

            for loc in document.page_urls {
                if let Ok(normalized) = normalize_candidate(&loc) {
                    let candidate = normalized.to_string();
                    if is_crawl_eligible(&candidate, &self.target_domain) {
                        urls.insert(candidate);
                    }
                }
            }

            for nested in document.nested {
                if !visited.contains(&nested) {
                    worklist.push_back(nested);
                }
            }
        }

        tracing::info!("Found {} URLs from sitemaps", urls.len());
        urls
    }

    /// Reads `Sitemap:` directives out of robots.txt.
    async fn sitemaps_from_robots(&self, base_url: &Url) -> Vec<String> {
        let Ok(robots_url) = base_url.join("/robots.txt") else {
            return Vec::new();
        };

        match self.fetcher.fetch_text(robots_url.as_str()).await {
            Some(content) => sitemap_directives(&content),
            None => Vec::new(),
        }
    }
}

/// Extracts `Sitemap:` directive values from robots.txt content.
///
/// The key match is case-insensitive; the value is everything after the
/// first colon.
pub fn sitemap_directives(robots: &str) -> Vec<String> {
    robots
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case("sitemap") {
                let value = value.trim();
                (!value.is_empty()).then(|| value.to_string())
            } else {
                None
            }
        })
        .collect()
}

/// Decompresses a gzip sitemap body, falling through to the raw bytes when
/// decompression fails.
fn maybe_decompress(sitemap_url: &str, body: Vec<u8>) -> Vec<u8> {
    if !sitemap_url.ends_with(".gz") {
        return body;
    }

    let mut decoded = Vec::new();
    let mut decoder = GzDecoder::new(body.as_slice());
    match decoder.read_to_end(&mut decoded) {
        Ok(_) => decoded,
        Err(e) => {
            tracing::debug!("Failed to decompress {}: {}", sitemap_url, e);
            body
        }
    }
}

/// Parses a sitemap or sitemap-index document.
///
/// `loc` elements are matched by local name irrespective of namespace. A
/// `loc` nested inside a `sitemap` element is an index entry; any other
/// `loc` is a page URL. Parse errors end the walk early, keeping whatever
/// was extracted up to that point.
fn parse_sitemap_document(bytes: &[u8]) -> SitemapDocument {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);

    let mut document = SitemapDocument::default();
    let mut buf = Vec::new();
    let mut in_sitemap_entry = false;
    let mut in_loc = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sitemap" => in_sitemap_entry = true,
                b"loc" => in_loc = true,
                _ => {}
            },
            Ok(Event::Text(t)) if in_loc => {
                if let Ok(text) = t.unescape() {
                    let loc = text.trim().to_string();
                    if !loc.is_empty() {
                        if in_sitemap_entry {
                            document.nested.push(loc);
                        } else {
                            document.page_urls.push(loc);
                        }
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"sitemap" => in_sitemap_entry = false,
                b"loc" => in_loc = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!("Sitemap parse error: {}", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    document
}
