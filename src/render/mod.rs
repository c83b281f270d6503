//! Page text rendering
//!
//! Turns a policy page URL into its visible text. The trait is the seam for
//! heavier renderers (a headless browser); the built-in implementation does
//! a lightweight HTML parse that strips chrome elements and prefers the
//! main-content containers storefront themes actually use.

use crate::crawler::Fetcher;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

/// Content containers tried in priority order before falling back to body
const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "[role=\"main\"]",
    ".main-content",
    ".content",
    ".policy-content",
    ".page-content",
    ".rte",
    ".shopify-policy__container",
    "article",
    ".article",
];

/// Elements whose text is never page content
const CHROME_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer", "aside", "noscript"];

/// A container this small is navigation, not content
const MIN_CONTAINER_LEN: usize = 200;

/// Extracted text shorter than this is considered empty
const MIN_TEXT_LEN: usize = 50;

/// Cap on returned text length
const MAX_TEXT_LEN: usize = 10_000;

/// Renders a page to its extracted visible text
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Returns the page's visible text, or None when the page is
    /// unreachable or has no meaningful content.
    async fn render_text(&self, url: &str) -> Option<String>;
}

/// The built-in renderer: fetch through the politeness-aware fetcher, then
/// extract text with a lightweight HTML parse.
pub struct HtmlTextRenderer<'a> {
    fetcher: &'a Fetcher,
}

impl<'a> HtmlTextRenderer<'a> {
    pub fn new(fetcher: &'a Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl PageRenderer for HtmlTextRenderer<'_> {
    async fn render_text(&self, url: &str) -> Option<String> {
        let html = self.fetcher.fetch_text(url).await?;
        extract_visible_text(&html)
    }
}

/// Extracts visible text from an HTML document.
///
/// Prefers the first priority container holding substantial text, falls
/// back to the whole body, collapses whitespace, and bounds the result
/// between the minimum and maximum lengths.
pub fn extract_visible_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let mut text = None;
    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let candidate = collect_text(element);
            if candidate.len() > MIN_CONTAINER_LEN {
                text = Some(candidate);
                break;
            }
        }
    }

    let text = match text {
        Some(t) => t,
        None => {
            let body_selector = Selector::parse("body").ok()?;
            let body = document.select(&body_selector).next()?;
            collect_text(body)
        }
    };

    if text.len() < MIN_TEXT_LEN {
        return None;
    }

    let mut text = text;
    if text.len() > MAX_TEXT_LEN {
        // Truncate on a char boundary
        let mut end = MAX_TEXT_LEN;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }

    Some(text)
}

/// Collects whitespace-collapsed text from an element, skipping text inside
/// chrome elements.
fn collect_text(element: ElementRef) -> String {
    let mut raw = String::new();

    for node in element.descendants() {
        if let Some(text) = node.value().as_text() {
            let inside_chrome = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map(|el| CHROME_ELEMENTS.contains(&el.name()))
                    .unwrap_or(false)
            });

            if !inside_chrome {
                raw.push_str(text);
                raw.push(' ');
            }
        }
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
