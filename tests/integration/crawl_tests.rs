//! End-to-end crawl sessions against a mock site: seeding, the page
//! budget, filtering, dedup, and the ranked output.

use crate::test_config;
use policy_scout::crawler::{
    discover_policy_urls, discover_policy_urls_reranked, CrawlSession,
};
use policy_scout::rank::NoopReranker;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts 404s for robots.txt and the conventional sitemap locations so a
/// test site runs on link crawling alone.
async fn mount_no_sitemaps(server: &MockServer) {
    for p in [
        "/robots.txt",
        "/sitemap.xml",
        "/sitemap_index.xml",
        "/sitemap.xml.gz",
    ] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(404))
            .mount(server)
            .await;
    }
}

fn html_page(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><head><title>Page</title></head><body>{}</body></html>", anchors)
}

#[tokio::test]
async fn test_full_crawl_ranks_policy_pages_first() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_no_sitemaps(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[
            "/pages/shipping-policy",
            "/pages/about",
            "/collections/all",
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/shipping-policy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/about"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/collections/all"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[])))
        .mount(&server)
        .await;

    let mut session = CrawlSession::new(test_config(), &base).expect("Failed to create session");
    let ranked = session.run().await;

    // The noise page and the homepage score zero and are excluded
    let urls: Vec<&str> = ranked.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/pages/shipping-policy", base).as_str(),
            format!("{}/pages/about", base).as_str(),
        ]
    );
    assert!(ranked[0].score > ranked[1].score);

    let summary = session.summary().expect("Summary missing after run");
    assert_eq!(summary.pages_crawled, 4);
    assert_eq!(summary.results_ranked, 2);
}

#[tokio::test]
async fn test_page_budget_halts_regrowing_frontier() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_no_sitemaps(&server).await;

    // Every page links to twenty fresh pages, so the frontier regrows much
    // faster than it drains
    let links: Vec<String> = (0..20).map(|i| format!("/pages/help-{:02}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(|s| s.as_str()).collect();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&link_refs)))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.crawler.max_pages = 5;
    config.crawler.batch_size = 2;

    let mut session = CrawlSession::new(config, &base).expect("Failed to create session");
    let ranked = session.run().await;

    let summary = session.summary().expect("Summary missing after run");
    // Crawling halts exactly at the budget despite the growing frontier
    assert_eq!(summary.pages_crawled, 5);
    assert!(summary.urls_discovered > 5);
    assert!(!ranked.is_empty());
}

#[tokio::test]
async fn test_rejected_locales_are_never_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_no_sitemaps(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[
            "/pages/shipping",
            "/fr/pages/shipping",
            "/en-gb/pages/shipping",
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/shipping"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fr/pages/shipping"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[])))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/en-gb/pages/shipping"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = CrawlSession::new(test_config(), &base).expect("Failed to create session");
    let ranked = session.run().await;

    let urls: Vec<&str> = ranked.iter().map(|s| s.url.as_str()).collect();
    assert!(urls.contains(&format!("{}/pages/shipping", base).as_str()));
    assert!(!urls.iter().any(|u| u.contains("/fr/") || u.contains("/en-gb/")));
}

#[tokio::test]
async fn test_sitemap_and_crawl_feed_one_discovered_set() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!("Sitemap: {}/sitemap.xml", base)),
        )
        .mount(&server)
        .await;

    // The sitemap knows a page nothing links to
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<urlset><url><loc>{}/pages/return-policy</loc></url></urlset>",
            base
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page(&["/pages/shipping-policy"])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/shipping-policy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[])))
        .mount(&server)
        .await;

    // Sitemap-seeded pages get crawled too
    Mock::given(method("GET"))
        .and(path("/pages/return-policy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = CrawlSession::new(test_config(), &base).expect("Failed to create session");
    let ranked = session.run().await;

    let urls: Vec<&str> = ranked.iter().map(|s| s.url.as_str()).collect();
    assert!(urls.contains(&format!("{}/pages/return-policy", base).as_str()));
    assert!(urls.contains(&format!("{}/pages/shipping-policy", base).as_str()));
}

#[tokio::test]
async fn test_query_and_fragment_variants_crawled_once() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_no_sitemaps(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[
            "/pages/faq",
            "/pages/faq?tab=shipping",
            "/pages/faq#returns",
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/faq"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = CrawlSession::new(test_config(), &base).expect("Failed to create session");
    session.run().await;

    let summary = session.summary().expect("Summary missing after run");
    assert_eq!(summary.pages_crawled, 2);
}

#[tokio::test]
async fn test_unreachable_site_yields_empty_result() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = CrawlSession::new(test_config(), &base).expect("Failed to create session");
    let ranked = session.run().await;

    // Total failure is an empty list, never a fault
    assert!(ranked.is_empty());
    let summary = session.summary().expect("Summary missing after run");
    assert_eq!(summary.pages_crawled, 1);
    assert_eq!(summary.results_ranked, 0);
}

#[tokio::test]
async fn test_failed_pages_are_not_retried() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_no_sitemaps(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(html_page(&["/pages/help", "/pages/faq"])),
        )
        .mount(&server)
        .await;

    // This page always fails; it must be fetched exactly once
    Mock::given(method("GET"))
        .and(path("/pages/help"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/faq"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&["/pages/help"])))
        .mount(&server)
        .await;

    let mut session = CrawlSession::new(test_config(), &base).expect("Failed to create session");
    let ranked = session.run().await;

    // The failed page still counts as crawled and still gets scored from
    // its URL alone
    let urls: Vec<&str> = ranked.iter().map(|s| s.url.as_str()).collect();
    assert!(urls.contains(&format!("{}/pages/help", base).as_str()));

    let summary = session.summary().expect("Summary missing after run");
    assert_eq!(summary.pages_crawled, 3);
}

#[tokio::test]
async fn test_discover_policy_urls_entry_point() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_no_sitemaps(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(html_page(&["/pages/shipping-policy"])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/shipping-policy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&[])))
        .mount(&server)
        .await;

    let urls = discover_policy_urls(&test_config(), &base)
        .await
        .expect("Discovery failed");
    assert_eq!(urls, vec![format!("{}/pages/shipping-policy", base)]);

    // The no-op re-ranker keeps the core ordering
    let reranked = discover_policy_urls_reranked(&test_config(), &base, &NoopReranker)
        .await
        .expect("Reranked discovery failed");
    assert_eq!(reranked, urls);
}

#[tokio::test]
async fn test_cancellation_stops_the_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_no_sitemaps(&server).await;

    let links: Vec<String> = (0..20).map(|i| format!("/pages/help-{:02}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(|s| s.as_str()).collect();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(&link_refs)))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.crawler.max_pages = 1_000;
    config.crawler.batch_size = 2;

    let mut session = CrawlSession::new(config, &base).expect("Failed to create session");
    let cancel = session.cancellation_token();

    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
        cancel.cancel();
    });

    let started = std::time::Instant::now();
    session.run().await;

    // Far below the page budget: the token stopped the session early
    let summary = session.summary().expect("Summary missing after run");
    assert!(summary.pages_crawled < 1_000);
    assert!(started.elapsed() < std::time::Duration::from_secs(30));
}
