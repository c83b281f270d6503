//! Storefront platform detection
//!
//! Some storefront platforms publish policy pages at canonical paths, so
//! knowing the platform lets a caller skip straight to them. The core
//! treats the detector as a boolean oracle; the built-in implementation
//! fingerprints Shopify through headers, cookies, well-known JSON
//! endpoints, and HTML markers.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE, SET_COOKIE};
use reqwest::Client;
use url::Url;

/// Canonical policy paths on Shopify storefronts, highest priority first
pub const SHOPIFY_POLICY_PATHS: &[&str] = &[
    "/policies/shipping-policy",
    "/policies/refund-policy",
    "/policies/return-policy",
    "/policies/terms-of-service",
    "/policies/privacy-policy",
    "/pages/shipping-policy",
    "/pages/shipping-information",
    "/pages/shipping",
    "/pages/return-policy",
    "/pages/returns-exchanges",
    "/pages/returns",
    "/pages/refund-policy",
    "/pages/exchange-policy",
    "/pages/faq",
    "/pages/help",
    "/pages/customer-service",
];

/// Common policy paths tried as a last resort when crawling fails
pub const FALLBACK_POLICY_PATHS: &[&str] = &[
    "/pages/shipping-policy",
    "/pages/shipping-information",
    "/pages/shipping",
    "/pages/return-policy",
    "/pages/returns-exchanges",
    "/pages/returns",
    "/pages/faq",
    "/pages/help",
    "/pages/support",
    "/pages/customer-service",
    "/help",
    "/support",
    "/faq",
    "/shipping",
    "/returns",
    "/policies",
    "/customer-service",
    "/customer-care",
    "/contact-us",
    "/about-us",
];

/// JSON endpoints that exist on every Shopify storefront
const SHOPIFY_ENDPOINTS: &[&str] = &["/cart.js", "/products.json"];

/// Markers embedded in Shopify-served HTML
const SHOPIFY_HTML_SIGNALS: &[&str] = &[
    "window.Shopify",
    "ShopifyAnalytics",
    "cdn.shopify.com",
    "/s/files/1/",
];

/// A storefront-platform oracle
#[async_trait]
pub trait StorefrontDetector: Send + Sync {
    /// Returns true when the site runs on the detector's platform.
    async fn is_storefront(&self, base_url: &Url) -> bool;
}

/// Shopify signature detection
pub struct ShopifyDetector {
    client: Client,
}

impl ShopifyDetector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StorefrontDetector for ShopifyDetector {
    async fn is_storefront(&self, base_url: &Url) -> bool {
        // Headers and cookies first: cheapest and most reliable
        if let Ok(response) = self.client.head(base_url.as_str()).send().await {
            if headers_indicate_shopify(response.headers()) {
                tracing::debug!("Shopify detected via headers for {}", base_url);
                return true;
            }
        }

        // Well-known JSON endpoints
        for path in SHOPIFY_ENDPOINTS {
            let Ok(endpoint) = base_url.join(path) else {
                continue;
            };
            if let Ok(response) = self
                .client
                .get(endpoint.as_str())
                .header(ACCEPT, "application/json")
                .send()
                .await
            {
                let is_json = response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(|ct| ct.contains("application/json"))
                    .unwrap_or(false);
                if response.status().is_success() && is_json {
                    tracing::debug!("Shopify detected via endpoint {} for {}", path, base_url);
                    return true;
                }
            }
        }

        // HTML markers as a last resort
        if let Ok(response) = self.client.get(base_url.as_str()).send().await {
            if let Ok(text) = response.text().await {
                if html_indicates_shopify(&text) {
                    tracing::debug!("Shopify detected via HTML markers for {}", base_url);
                    return true;
                }
            }
        }

        false
    }
}

/// Checks response headers and cookies for Shopify signatures.
pub fn headers_indicate_shopify(headers: &HeaderMap) -> bool {
    let shopify_header = headers.keys().any(|name| {
        let name = name.as_str();
        name.starts_with("x-shopify") || name.starts_with("x-sorting-hat")
    });

    if shopify_header {
        return true;
    }

    headers.get_all(SET_COOKIE).iter().any(|value| {
        value
            .to_str()
            .map(|cookie| {
                let cookie = cookie.to_lowercase();
                cookie.contains("_shopify_") || cookie.contains("cart_sig")
            })
            .unwrap_or(false)
    })
}

/// Checks page HTML for Shopify markers.
pub fn html_indicates_shopify(html: &str) -> bool {
    SHOPIFY_HTML_SIGNALS.iter().any(|signal| html.contains(signal))
}

/// Builds absolute fallback policy URLs for a base URL.
pub fn fallback_policy_urls(base_url: &Url) -> Vec<String> {
    FALLBACK_POLICY_PATHS
        .iter()
        .filter_map(|path| base_url.join(path).ok())
        .map(|u| u.to_string())
        .collect()
}
