//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! cycle end-to-end: seed document, engine run, final counters.

use link_crawler::config::{CrawlerConfig, UserAgentConfig};
use link_crawler::crawler::{crawl_endpoint, CrawlEngine, CrawlStats, HttpFetcher};
use link_crawler::{CrawlError, SeedError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates an engine suited to a local mock server
fn create_test_engine() -> CrawlEngine<HttpFetcher> {
    create_engine_with_redirects(10)
}

fn create_engine_with_redirects(max_redirects: u32) -> CrawlEngine<HttpFetcher> {
    let crawler = CrawlerConfig {
        start_endpoint: None,
        core_pool_size: 5,
        max_pool_size: 10,
        request_timeout: 5,
        max_redirects,
    };
    let user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
    };
    CrawlEngine::from_config(&crawler, &user_agent).expect("Failed to build engine")
}

/// Serves `links` as the seed document at /start-endpoint
async fn mount_seed(server: &MockServer, links: &[String]) {
    let body = serde_json::json!({ "links": links }).to_string();
    Mock::given(method("GET"))
        .and(path("/start-endpoint"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/json"),
        )
        .mount(server)
        .await;
}

/// Serves an empty page with the given status, expecting exactly one request
async fn mount_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/status/{}", status)))
        .respond_with(ResponseTemplate::new(status).insert_header("content-type", "text/html"))
        .expect(1)
        .mount(server)
        .await;
}

/// Serves an HTML page linking to `links`, expecting exactly one request
async fn mount_page(server: &MockServer, page_path: &str, links: &[String]) {
    let anchors: String = links
        .iter()
        .map(|link| format!(r#"<a href="{}">{}</a>"#, link, link))
        .collect();
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    "<html><head><title>{}</title></head><body>{}</body></html>",
                    page_path, anchors
                ))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn crawl(server: &MockServer) -> Result<CrawlStats, CrawlError> {
    let engine = create_test_engine();
    let endpoint = format!("{}/start-endpoint", server.uri());
    crawl_endpoint(&engine, Some(&endpoint))
        .await
        .map(|report| report.stats)
}

fn stats(requests: u64, successes: u64, failures: u64) -> CrawlStats {
    CrawlStats {
        requests,
        successes,
        failures,
    }
}

#[tokio::test]
async fn test_crawl_200_status() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_seed(&server, &[format!("{}/status/200", base)]).await;
    mount_status(&server, 200).await;

    assert_eq!(crawl(&server).await.unwrap(), stats(1, 1, 0));
}

#[tokio::test]
async fn test_crawl_201_status() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_seed(&server, &[format!("{}/status/201", base)]).await;
    mount_status(&server, 201).await;

    assert_eq!(crawl(&server).await.unwrap(), stats(1, 1, 0));
}

#[tokio::test]
async fn test_crawl_successful_duplicate_requests() {
    let server = MockServer::start().await;
    let link = format!("{}/status/200", server.uri());
    mount_seed(&server, &[link.clone(), link.clone(), link]).await;
    mount_status(&server, 200).await;

    assert_eq!(crawl(&server).await.unwrap(), stats(1, 1, 0));
}

#[tokio::test]
async fn test_crawl_successful_unique_requests() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_seed(
        &server,
        &[
            format!("{}/status/200", base),
            format!("{}/links/1", base),
            format!("{}/links/2", base),
        ],
    )
    .await;
    mount_status(&server, 200).await;
    // /links/1 has two children of its own; everything else links back
    mount_page(
        &server,
        "/links/1",
        &[format!("{}/links/1/0", base), format!("{}/links/1/1", base)],
    )
    .await;
    mount_page(&server, "/links/1/0", &[format!("{}/links/1", base)]).await;
    mount_page(&server, "/links/1/1", &["/links/1/0".to_string()]).await;
    mount_page(&server, "/links/2", &[format!("{}/status/200", base)]).await;

    assert_eq!(crawl(&server).await.unwrap(), stats(5, 5, 0));
}

#[tokio::test]
async fn test_crawl_successful_unique_and_duplicate_requests() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_seed(
        &server,
        &[
            format!("{}/status/200", base),
            format!("{}/status/200", base),
            format!("{}/links/1", base),
            format!("{}/links/1#top", base),
            format!("{}/links/2", base),
        ],
    )
    .await;
    mount_status(&server, 200).await;
    mount_page(
        &server,
        "/links/1",
        &[format!("{}/links/1/0", base), format!("{}/links/1/1", base)],
    )
    .await;
    mount_page(&server, "/links/1/0", &[]).await;
    mount_page(&server, "/links/1/1", &[]).await;
    mount_page(&server, "/links/2", &[]).await;

    assert_eq!(crawl(&server).await.unwrap(), stats(5, 5, 0));
}

#[tokio::test]
async fn test_crawl_502_error() {
    let server = MockServer::start().await;
    mount_seed(&server, &[format!("{}/status/502", server.uri())]).await;
    mount_status(&server, 502).await;

    assert_eq!(crawl(&server).await.unwrap(), stats(1, 0, 1));
}

#[tokio::test]
async fn test_crawl_client_and_server_errors() {
    for status in [400, 404, 500] {
        let server = MockServer::start().await;
        mount_seed(&server, &[format!("{}/status/{}", server.uri(), status)]).await;
        mount_status(&server, status).await;

        assert_eq!(
            crawl(&server).await.unwrap(),
            stats(1, 0, 1),
            "status {} should count as a failure",
            status
        );
    }
}

#[tokio::test]
async fn test_crawl_unique_and_duplicate_failed_requests() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_seed(
        &server,
        &[
            format!("{}/status/404", base),
            format!("{}/status/404", base),
            format!("{}/status/400", base),
            format!("{}/status/400", base),
            format!("{}/status/500", base),
        ],
    )
    .await;
    for status in [404, 400, 500] {
        mount_status(&server, status).await;
    }

    assert_eq!(crawl(&server).await.unwrap(), stats(3, 0, 3));
}

#[tokio::test]
async fn test_crawl_requests_with_child_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    let children: Vec<String> = (0..10).map(|i| format!("{}/links/10/{}", base, i)).collect();
    mount_seed(&server, &[format!("{}/links/10", base)]).await;
    mount_page(&server, "/links/10", &children).await;
    for i in 0..10 {
        // Each child links to its siblings and back to the parent
        let mut links = children.clone();
        links.push(format!("{}/links/10", base));
        mount_page(&server, &format!("/links/10/{}", i), &links).await;
    }

    assert_eq!(crawl(&server).await.unwrap(), stats(11, 11, 0));
}

#[tokio::test]
async fn test_crawl_requests_with_child_links_and_duplicates() {
    let server = MockServer::start().await;
    let base = server.uri();

    let children: Vec<String> = (0..10).map(|i| format!("{}/links/10/{}", base, i)).collect();
    mount_seed(
        &server,
        &[format!("{}/links/10", base), format!("{}/links/10/0", base)],
    )
    .await;
    mount_page(&server, "/links/10", &children).await;
    for i in 0..10 {
        mount_page(&server, &format!("/links/10/{}", i), &[]).await;
    }

    assert_eq!(crawl(&server).await.unwrap(), stats(11, 11, 0));
}

#[tokio::test]
async fn test_failed_links_mixed_with_successes() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_seed(&server, &[format!("{}/", base)]).await;
    mount_page(
        &server,
        "/",
        &[
            "/ok".to_string(),
            "/gone".to_string(),
            "mailto:someone@example.com".to_string(),
        ],
    )
    .await;
    mount_page(&server, "/ok", &["/".to_string()]).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    // The mailto: target is claimed and fails like the 404
    let result = crawl(&server).await.unwrap();
    assert_eq!(result, stats(4, 2, 2));
    assert_eq!(result.requests, result.successes + result.failures);
}

#[tokio::test]
async fn test_unreachable_and_malformed_links_count_as_failures() {
    let server = MockServer::start().await;
    mount_seed(
        &server,
        &[
            "notavalidlink".to_string(),
            // Nothing listens on port 1
            "http://127.0.0.1:1/".to_string(),
        ],
    )
    .await;

    assert_eq!(crawl(&server).await.unwrap(), stats(2, 0, 2));
}

#[tokio::test]
async fn test_non_web_links_are_counted_as_failures() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_seed(&server, &[format!("{}/contact", base)]).await;
    mount_page(
        &server,
        "/contact",
        &[
            "mailto:someone@example.com".to_string(),
            "ftp://files.example.com/x".to_string(),
        ],
    )
    .await;

    assert_eq!(crawl(&server).await.unwrap(), stats(3, 1, 2));
}

#[tokio::test]
async fn test_blank_seed_link_is_counted_as_failure() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_seed(&server, &[String::new(), format!("{}/ok", base)]).await;
    mount_page(&server, "/ok", &[]).await;

    assert_eq!(crawl(&server).await.unwrap(), stats(2, 1, 1));
}

#[tokio::test]
async fn test_unfollowed_redirect_is_success_without_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_seed(&server, &[format!("{}/moved", base)]).await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/target", base).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/target"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let engine = create_engine_with_redirects(0);
    let endpoint = format!("{}/start-endpoint", base);
    let report = crawl_endpoint(&engine, Some(&endpoint)).await.unwrap();

    assert_eq!(report.stats, stats(1, 1, 0));
}

#[tokio::test]
async fn test_followed_redirect_resolves_links_against_final_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_seed(&server, &[format!("{}/old", base)]).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/new/index.html", base).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    // "child" is relative, so it only reaches /new/child via the final URL
    mount_page(&server, "/new/index.html", &["child".to_string()]).await;
    mount_page(&server, "/new/child", &[]).await;

    // The redirect hop is part of one request
    assert_eq!(crawl(&server).await.unwrap(), stats(2, 2, 0));
}

#[tokio::test]
async fn test_non_html_response_is_success_without_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_seed(&server, &[format!("{}/data.json", base)]).await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(r#"{{"href": "<a href=\"{}/x\">x</a>"}}"#, base))
                .insert_header("content-type", "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(crawl(&server).await.unwrap(), stats(1, 1, 0));
}

#[tokio::test]
async fn test_empty_seed_document_fails_before_fetching() {
    let server = MockServer::start().await;
    mount_seed(&server, &[]).await;

    let err = crawl(&server).await.unwrap_err();
    assert!(matches!(err, CrawlError::InvalidSeed(SeedError::NoLinks)));

    // Only the seed document itself was requested
    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}

#[tokio::test]
async fn test_unset_endpoint_fails_without_network() {
    let engine = create_test_engine();

    let err = crawl_endpoint(&engine, None).await.unwrap_err();
    assert!(matches!(err, CrawlError::InvalidSeed(SeedError::EndpointNotSet)));
    assert_eq!(err.to_string(), "Invalid seed: Crawler endpoint is not set!");

    let err = crawl_endpoint(&engine, Some("")).await.unwrap_err();
    assert!(matches!(err, CrawlError::InvalidSeed(SeedError::EndpointNotSet)));
}

#[tokio::test]
async fn test_sequential_runs_start_fresh() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_seed(&server, &[format!("{}/page", base)]).await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .expect(2)
        .mount(&server)
        .await;

    let engine = create_test_engine();
    let endpoint = format!("{}/start-endpoint", base);

    let first = crawl_endpoint(&engine, Some(&endpoint)).await.unwrap();
    let second = crawl_endpoint(&engine, Some(&endpoint)).await.unwrap();

    assert_eq!(first.stats, stats(1, 1, 0));
    assert_eq!(second.stats, stats(1, 1, 0));
}
