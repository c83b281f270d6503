//! Relevance scoring for discovered URLs
//!
//! Every URL gets a deterministic integer score from fixed keyword tables.
//! Matches are case-insensitive substring checks against the whole URL, and
//! a keyword appearing in more than one table earns every bonus it matches.

/// High-value policy keywords
const KEYWORDS_PRIMARY: &[&str] = &[
    "shipping",
    "delivery",
    "returns",
    "return",
    "refund",
    "exchange",
    "exchanges",
    "warranty",
    "guarantee",
];

/// Supporting help/contact keywords
const KEYWORDS_SECONDARY: &[&str] = &[
    "policies",
    "help",
    "support",
    "faq",
    "faqs",
    "customer-service",
    "customer-care",
    "care",
    "assistance",
    "contact",
    "about",
];

/// Hyphenated path forms that policy pages commonly use
const KEYWORDS_PATH: &[&str] = &[
    "return-policy",
    "returns-policy",
    "shipping-policy",
    "delivery-policy",
    "how-to-return",
    "howtoreturn",
    "returns-exchanges",
    "shipping-delivery",
    "help-center",
    "customer-care",
    "customer-service",
    "support-center",
];

/// Path segments that usually host static policy pages
const POLICY_PATH_SEGMENTS: &[&str] = &["/pages/", "/help/", "/support/", "/policies/"];

/// URL shapes that are almost never policy content
const NOISE_PATTERNS: &[&str] = &[
    "/products/",
    "/product/",
    "/collections/",
    "/cart",
    "/checkout",
    "/search",
    "/account",
    "/signin",
    "/login",
    "/signup",
    "/register",
    "/blogs/",
    "/blog/",
    "/news/",
    "/press/",
    "?",
    "#",
    "/archive/",
];

/// A discovered URL together with its relevance score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredUrl {
    pub score: i32,
    pub url: String,
}

/// Scores a URL's relevance for policy/help content.
///
/// Starting from zero: +5 per primary keyword, +3 per secondary keyword,
/// +4 per path keyword, +2 once for a policy path segment, +3 once for a
/// US-region marker, -2 per noise pattern. The result is floored at 0.
pub fn score_url(url: &str) -> i32 {
    let url_lower = url.to_lowercase();
    let mut score = 0i32;

    for kw in KEYWORDS_PRIMARY {
        if url_lower.contains(kw) {
            score += 5;
        }
    }

    for kw in KEYWORDS_SECONDARY {
        if url_lower.contains(kw) {
            score += 3;
        }
    }

    for kw in KEYWORDS_PATH {
        if url_lower.contains(kw) {
            score += 4;
        }
    }

    if POLICY_PATH_SEGMENTS
        .iter()
        .any(|seg| url_lower.contains(seg))
    {
        score += 2;
    }

    if url_lower.contains("/us/") || url_lower.contains("/en-us/") {
        score += 3;
    }

    for noise in NOISE_PATTERNS {
        if url_lower.contains(noise) {
            score -= 2;
        }
    }

    score.max(0)
}

/// Ranks a set of discovered URLs.
///
/// Keeps only strictly-positive scores, sorts by descending score with an
/// ascending lexicographic URL tie-break, and truncates to `limit`.
pub fn rank_urls<I>(urls: I, limit: usize) -> Vec<ScoredUrl>
where
    I: IntoIterator<Item = String>,
{
    let mut scored: Vec<ScoredUrl> = urls
        .into_iter()
        .map(|url| ScoredUrl {
            score: score_url(&url),
            url,
        })
        .filter(|s| s.score > 0)
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.url.cmp(&b.url)));
    scored.truncate(limit);
    scored
}
