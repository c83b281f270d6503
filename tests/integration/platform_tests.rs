//! Storefront platform detection against a mock server.

use policy_scout::platform::{ShopifyDetector, StorefrontDetector};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_detected_via_response_headers() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-shopify-stage", "production"))
        .mount(&server)
        .await;

    let detector = ShopifyDetector::new(reqwest::Client::new());
    let base = Url::parse(&server.uri()).unwrap();
    assert!(detector.is_storefront(&base).await);
}

#[tokio::test]
async fn test_detected_via_json_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cart.js"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"items":[]}"#)
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    let detector = ShopifyDetector::new(reqwest::Client::new());
    let base = Url::parse(&server.uri()).unwrap();
    assert!(detector.is_storefront(&base).await);
}

#[tokio::test]
async fn test_plain_site_is_not_detected() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cart.js"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Plain shop</body></html>"),
        )
        .mount(&server)
        .await;

    let detector = ShopifyDetector::new(reqwest::Client::new());
    let base = Url::parse(&server.uri()).unwrap();
    assert!(!detector.is_storefront(&base).await);
}

#[tokio::test]
async fn test_detected_via_html_markers() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cart.js"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><script>window.Shopify = {shop: "x"};</script></head></html>"#,
        ))
        .mount(&server)
        .await;

    let detector = ShopifyDetector::new(reqwest::Client::new());
    let base = Url::parse(&server.uri()).unwrap();
    assert!(detector.is_storefront(&base).await);
}
