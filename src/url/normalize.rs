//! URL normalization for crawl dedup
//!
//! Two URLs differing only by fragment or query are the same crawl target,
//! so both are stripped here before a URL enters any session set.

use crate::UrlError;
use url::Url;

/// Normalizes a candidate URL to its crawl-dedup form.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an HTTP or HTTPS scheme
/// 3. Require a host
/// 4. Strip the query string
/// 5. Strip the fragment
///
/// The host keeps whatever case the `url` crate gives it (always lowercase
/// for registered names), and the path is left untouched.
pub fn normalize_candidate(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Resolves an anchor href against a base URL and normalizes the result.
///
/// Returns None for hrefs that can never be crawl targets:
/// - empty hrefs and fragment-only links
/// - `javascript:`, `mailto:`, `tel:`, `data:` schemes
/// - anything that fails to resolve or resolves to a non-HTTP(S) URL
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut resolved = base_url.join(href).ok()?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    resolved.set_query(None);
    resolved.set_fragment(None);

    Some(resolved)
}

/// Extracts the lowercase host from a URL string.
pub fn extract_host(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}
