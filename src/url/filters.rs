//! URL eligibility predicates
//!
//! Three independent pure checks decide whether a candidate URL is worth
//! crawling: domain membership, locale acceptability, and region
//! acceptability. All three work on the lower-cased URL string and never
//! touch the network.

use url::Url;

/// Non-English locale path segments that disqualify a URL
const NON_ENGLISH_LOCALES: &[&str] = &[
    "/fr/", "/es/", "/de/", "/it/", "/jp/", "/zh/", "/pt/", "/ru/", "/mx/", "/cl/", "/cr/",
    "/ar/", "/br/", "/co/", "/pe/", "/uy/", "/ve/", "/uk/", "/tr/", "/kz/", "/kh/", "/nl/",
    "/sv/", "/da/",
];

/// Path markers that positively identify a US storefront URL
const US_REGION_MARKERS: &[&str] = &["/us/", "/en-us/", "/us-en/", "/en_us/", "/us_en/"];

/// Path markers for storefronts serving some other region
const OTHER_REGION_MARKERS: &[&str] = &[
    "/en-gb/", "/en-au/", "/en-ca/", "/en-nz/", "/en-eu/", "/en-it/", "/en-ch/", "/gb/",
    "/au/", "/ca/", "/nz/", "/fr/", "/fr-", "/de/", "/es/", "/it/", "/pt/", "/ru/", "/zh/",
    "/jp/", "/kr/", "/mx/", "/br/", "/ar/", "/in/",
];

/// Checks whether a URL belongs to the target domain.
///
/// The check is substring containment on the host, not an exact-suffix
/// match: `example.com` matches `shop.example.com` but also any host that
/// merely contains `example.com`. This looseness is deliberate and callers
/// must accept the occasional false positive.
pub fn same_domain(url: &str, target_domain: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| host.to_lowercase().contains(&target_domain.to_lowercase()))
            .unwrap_or(false),
        Err(_) => false,
    }
}

/// Checks whether a URL is likely English content.
///
/// Returns false when the URL contains any known non-English locale
/// segment.
pub fn acceptable_locale(url: &str) -> bool {
    let url_lower = url.to_lowercase();
    !NON_ENGLISH_LOCALES
        .iter()
        .any(|locale| url_lower.contains(locale))
}

/// Checks whether a URL targets the US storefront or is region-generic.
///
/// A URL carrying a US marker is accepted, one carrying another region's
/// marker is rejected, and a URL with no region indicator at all is assumed
/// acceptable.
pub fn acceptable_region(url: &str) -> bool {
    let url_lower = url.to_lowercase();

    if US_REGION_MARKERS
        .iter()
        .any(|marker| url_lower.contains(marker))
    {
        return true;
    }

    if OTHER_REGION_MARKERS
        .iter()
        .any(|marker| url_lower.contains(marker))
    {
        return false;
    }

    true
}

/// A URL is crawl-eligible iff it passes all three predicates.
pub fn is_crawl_eligible(url: &str, target_domain: &str) -> bool {
    same_domain(url, target_domain) && acceptable_locale(url) && acceptable_region(url)
}
