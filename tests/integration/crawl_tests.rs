//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up both the website being crawled and
//! the index API, and run the full crawl cycle end-to-end.

use serde_json::Value;
use sitesift::config::{Config, CrawlerConfig, FrontierOrder, IndexConfig, LinkBase};
use sitesift::crawler::{run_crawl, Coordinator, HttpFetcher};
use sitesift::index::MemoryIndexHandle;
use sitesift::output::SilentReporter;
use sitesift::url::CanonicalUrl;
use std::collections::BTreeSet;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

fn config_for(index_server: &MockServer) -> Config {
    Config {
        index: IndexConfig {
            api_url: index_server.uri(),
            ..IndexConfig::default()
        },
        ..Config::default()
    }
}

/// Mounts an index API where `docs` does not exist yet and accepts documents
async fn mount_fresh_index(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/knowledge/by-name/docs"))
        .and(header("X-OPPER-API-KEY", API_KEY))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/knowledge"))
        .and(header("X-OPPER-API-KEY", API_KEY))
        .and(body_partial_json(serde_json::json!({ "name": "docs" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "id": "idx-1", "name": "docs" })),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/knowledge/idx-1/add"))
        .and(header("X-OPPER-API-KEY", API_KEY))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

/// Documents the index API received, in submission order
async fn submitted_documents(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .into_iter()
        .filter(|request| request.url.path().ends_with("/add"))
        .map(|request| serde_json::from_slice(&request.body).expect("JSON body"))
        .collect()
}

fn keys(documents: &[Value]) -> BTreeSet<String> {
    documents
        .iter()
        .map(|doc| doc["key"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_into_new_index() {
    let site = MockServer::start().await;
    let index = MockServer::start().await;
    let base = site.uri();

    mount_page(
        &site,
        "/",
        &format!(
            r#"<h1>Hello World</h1><a href="{}/b">B</a><a href="/c#part">C</a>"#,
            base
        ),
    )
    .await;
    mount_page(&site, "/b", "<p>Page B</p>").await;
    mount_page(&site, "/c", r#"<p>Page C</p><a href="/">Home</a>"#).await;
    mount_fresh_index(&index).await;

    let report = run_crawl(
        &config_for(&index),
        API_KEY,
        "docs",
        &format!("{}/", base),
        SilentReporter,
    )
    .await
    .expect("crawl should succeed");

    assert_eq!(report.indexed, 3);
    assert_eq!(report.visited, 3);
    assert_eq!(report.fetch_failures, 0);

    let documents = submitted_documents(&index).await;
    assert_eq!(documents.len(), 3);
    assert_eq!(
        keys(&documents),
        BTreeSet::from([
            format!("{}/", base),
            format!("{}/b", base),
            format!("{}/c", base),
        ])
    );

    let home = documents
        .iter()
        .find(|doc| doc["key"] == format!("{}/", base))
        .expect("home page submitted");
    assert_eq!(home["content"], "Hello World B C");
    assert_eq!(home["metadata"]["url"], format!("{}/", base));
}

#[tokio::test]
async fn test_existing_index_is_reused() {
    let site = MockServer::start().await;
    let index = MockServer::start().await;

    mount_page(&site, "/", "<p>Only page</p>").await;

    Mock::given(method("GET"))
        .and(path("/v1/knowledge/by-name/docs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "id": "existing", "name": "docs" })),
        )
        .mount(&index)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/knowledge"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&index)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/knowledge/existing/add"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&index)
        .await;

    let report = run_crawl(
        &config_for(&index),
        API_KEY,
        "docs",
        &format!("{}/", site.uri()),
        SilentReporter,
    )
    .await
    .expect("crawl should succeed");

    assert_eq!(report.indexed, 1);
}

#[tokio::test]
async fn test_index_setup_failure_is_api_error() {
    let site = MockServer::start().await;
    let index = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/knowledge/by-name/docs"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&index)
        .await;
    Mock::given(method("GET"))
        .respond_with(html("<p>never fetched</p>"))
        .expect(0)
        .mount(&site)
        .await;

    let err = run_crawl(
        &config_for(&index),
        API_KEY,
        "docs",
        &format!("{}/", site.uri()),
        SilentReporter,
    )
    .await
    .expect_err("lookup failure must abort");

    assert!(err.is_index_api_error());
    assert!(err.to_string().contains("invalid api key"));
}

#[tokio::test]
async fn test_upsert_failure_stops_crawl() {
    let site = MockServer::start().await;
    let index = MockServer::start().await;

    mount_page(&site, "/", r#"<p>Home</p><a href="/next">Next</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html("<p>Next</p>"))
        .expect(0)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/knowledge/by-name/docs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "id": "idx-1", "name": "docs" })),
        )
        .mount(&index)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/knowledge/idx-1/add"))
        .respond_with(ResponseTemplate::new(500).set_body_string("storage full"))
        .mount(&index)
        .await;

    let err = run_crawl(
        &config_for(&index),
        API_KEY,
        "docs",
        &format!("{}/", site.uri()),
        SilentReporter,
    )
    .await
    .expect_err("upsert failure must abort");

    assert!(err.is_index_api_error());
}

#[tokio::test]
async fn test_invalid_seed_rejected_before_index_setup() {
    let index = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&index)
        .await;

    let err = run_crawl(
        &config_for(&index),
        API_KEY,
        "docs",
        "not a url",
        SilentReporter,
    )
    .await
    .expect_err("invalid seed");

    assert!(!err.is_index_api_error());
}

/// Runs a coordinator over the live mock site with an in-memory index
async fn crawl_site(seed: &str, order: FrontierOrder, link_base: LinkBase) -> MemoryIndexHandle {
    let index = MemoryIndexHandle::new("docs");
    let fetcher = HttpFetcher::new(&Config::default().fetcher).expect("client");
    let config = CrawlerConfig {
        frontier_order: order,
        link_base,
        max_pages: 0,
    };

    let mut coordinator = Coordinator::new(
        CanonicalUrl::parse(seed).expect("seed"),
        config,
        fetcher,
        index.clone(),
        SilentReporter,
    );
    coordinator.run().await.expect("crawl should succeed");
    index
}

#[tokio::test]
async fn test_out_of_scope_links_not_followed() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;

    mount_page(
        &site,
        "/docs/",
        &format!(
            r#"<p>Docs</p><a href="{}/x">Other</a><a href="/blog">Blog</a><a href="intro">Intro</a>"#,
            other.uri()
        ),
    )
    .await;
    mount_page(&site, "/docs/intro", "<p>Intro</p>").await;
    Mock::given(method("GET"))
        .and(path("/blog"))
        .respond_with(html("<p>Blog</p>"))
        .expect(0)
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .respond_with(html("<p>Elsewhere</p>"))
        .expect(0)
        .mount(&other)
        .await;

    let index = crawl_site(
        &format!("{}/docs/", site.uri()),
        FrontierOrder::Fifo,
        LinkBase::Page,
    )
    .await;

    assert_eq!(
        index.keys(),
        vec![
            format!("{}/docs/", site.uri()),
            format!("{}/docs/intro", site.uri()),
        ]
    );
}

#[tokio::test]
async fn test_seed_not_found_indexes_nothing() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&site)
        .await;

    let index = crawl_site(&format!("{}/", site.uri()), FrontierOrder::Fifo, LinkBase::Page).await;

    assert!(index.is_empty());
    assert_eq!(index.submission_count(), 0);
}

#[tokio::test]
async fn test_server_errors_are_skipped() {
    let site = MockServer::start().await;
    mount_page(
        &site,
        "/",
        r#"<p>Home</p><a href="/broken">Broken</a><a href="/fine">Fine</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&site)
        .await;
    mount_page(&site, "/fine", "<p>Fine</p>").await;

    let index = crawl_site(&format!("{}/", site.uri()), FrontierOrder::Fifo, LinkBase::Page).await;

    assert_eq!(
        index.keys(),
        vec![format!("{}/", site.uri()), format!("{}/fine", site.uri())]
    );
}

#[tokio::test]
async fn test_whitespace_only_page_skipped() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("\n   <div>\t</div>\n   <span></span>"))
        .expect(1)
        .mount(&site)
        .await;

    let index = crawl_site(&format!("{}/", site.uri()), FrontierOrder::Fifo, LinkBase::Page).await;

    assert_eq!(index.submission_count(), 0);
}

/// A site with cycles, shared children and fragment links
async fn mount_graph(site: &MockServer) {
    mount_page(
        site,
        "/",
        r#"<p>Root</p><a href="/a">A</a><a href="/b">B</a><a href="/a#dup">A again</a>"#,
    )
    .await;
    mount_page(site, "/a", r#"<p>A</p><a href="/c">C</a><a href="/">Root</a>"#).await;
    mount_page(site, "/b", r#"<p>B</p><a href="/c#x">C</a><a href="/d">D</a>"#).await;
    mount_page(site, "/c", r#"<p>C</p><a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(site, "/d", "<script>var hidden = 1;</script>").await;
}

#[tokio::test]
async fn test_final_index_independent_of_frontier_order() {
    let fifo_site = MockServer::start().await;
    mount_graph(&fifo_site).await;
    let fifo = crawl_site(
        &format!("{}/", fifo_site.uri()),
        FrontierOrder::Fifo,
        LinkBase::Page,
    )
    .await;

    let lifo_site = MockServer::start().await;
    mount_graph(&lifo_site).await;
    let lifo = crawl_site(
        &format!("{}/", lifo_site.uri()),
        FrontierOrder::Lifo,
        LinkBase::Page,
    )
    .await;

    let strip = |keys: Vec<String>, base: &str| -> Vec<String> {
        keys.into_iter()
            .map(|k| k.trim_start_matches(base).to_string())
            .collect()
    };

    let fifo_paths = strip(fifo.keys(), &fifo_site.uri());
    let lifo_paths = strip(lifo.keys(), &lifo_site.uri());

    assert_eq!(fifo_paths, vec!["/", "/a", "/b", "/c"]);
    assert_eq!(fifo_paths, lifo_paths);
    assert_eq!(fifo.submission_count(), 4);
    assert_eq!(lifo.submission_count(), 4);
    // Each MockServer verifies on drop that every page was fetched exactly once
}

#[tokio::test]
async fn test_relative_links_resolved_against_seed_when_configured() {
    let site = MockServer::start().await;
    mount_page(&site, "/docs/", r#"<p>Index</p><a href="guide/start">Start</a>"#).await;
    mount_page(&site, "/docs/guide/start", r#"<p>Start</p><a href="next">Next</a>"#).await;
    // Resolved against the seed, "next" lands at /docs/next rather than /docs/guide/next
    mount_page(&site, "/docs/next", "<p>Next</p>").await;

    let index = crawl_site(
        &format!("{}/docs/", site.uri()),
        FrontierOrder::Fifo,
        LinkBase::Seed,
    )
    .await;

    assert!(index.get(&format!("{}/docs/next", site.uri())).is_some());
    assert!(index.get(&format!("{}/docs/guide/next", site.uri())).is_none());
}

#[tokio::test]
async fn test_relative_links_resolved_against_page_by_default() {
    let site = MockServer::start().await;
    mount_page(&site, "/docs/", r#"<p>Index</p><a href="guide/start">Start</a>"#).await;
    mount_page(&site, "/docs/guide/start", r#"<p>Start</p><a href="next">Next</a>"#).await;
    mount_page(&site, "/docs/guide/next", "<p>Next</p>").await;

    let index = crawl_site(
        &format!("{}/docs/", site.uri()),
        FrontierOrder::Fifo,
        LinkBase::Page,
    )
    .await;

    assert_eq!(index.len(), 3);
    assert!(index.get(&format!("{}/docs/guide/next", site.uri())).is_some());
}

#[tokio::test]
async fn test_relative_links_follow_redirect_target() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/docs/"))
        .expect(1)
        .mount(&site)
        .await;
    mount_page(&site, "/docs/", r#"<p>Docs</p><a href="intro">Intro</a>"#).await;
    mount_page(&site, "/docs/intro", "<p>Intro</p>").await;

    let index = crawl_site(
        &format!("{}/docs", site.uri()),
        FrontierOrder::Fifo,
        LinkBase::Page,
    )
    .await;

    assert_eq!(
        index.keys(),
        vec![
            format!("{}/docs", site.uri()),
            format!("{}/docs/intro", site.uri()),
        ]
    );
    assert_eq!(
        index
            .get(&format!("{}/docs/intro", site.uri()))
            .map(|doc| doc.content),
        Some("Intro".to_string())
    );
}
