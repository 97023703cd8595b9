// Tests for analysis orchestration

use pagelens_core::analyze::{
    AnalyzeOptions, AnalyzeProgressCallback, analyze_markup, analyze_url, execute_analysis,
};
use pagelens_core::error::AnalysisError;
use pagelens_core::fetch::build_client;
use pagelens_scanner::{HtmlVersion, PageAnalyzer, ScanError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Landing</title></head>
<body>
  <h1>Welcome</h1>
  <h2>One</h2>
  <h2>Two</h2>
  <a href="/about">About</a>
  <a href="contact">Contact</a>
  <a href="/missing">Missing</a>
  <a href="http://127.0.0.1:9/gone">Gone</a>
  <a>No href</a>
  <form><input type="password" name="pw"></form>
</body>
</html>"#;

fn options(url: &str) -> AnalyzeOptions {
    AnalyzeOptions {
        url: url.to_string(),
        concurrency: 4,
        probe_timeout: Duration::from_secs(5),
        deadline: Duration::from_secs(20),
        show_progress_bars: false,
    }
}

async fn mount_page(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body, "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_ok(server: &MockServer, at: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

// ============================================================================
// execute_analysis Tests
// ============================================================================

#[tokio::test]
async fn test_execute_analysis_end_to_end() {
    let server = MockServer::start().await;
    mount_page(&server, "/", LANDING_PAGE).await;
    mount_ok(&server, "/about").await;
    mount_ok(&server, "/contact").await;

    let result = execute_analysis(options(&server.uri()), None).await.unwrap();

    assert_eq!(result.html_version(), HtmlVersion::Html5);
    assert_eq!(result.page_title(), "Landing");
    assert_eq!(result.headings().get("h1"), Some(&1));
    assert_eq!(result.headings().get("h2"), Some(&2));
    assert_eq!(result.internal_links_count(), 3);
    assert_eq!(result.external_links_count(), 1);
    // /missing is unmocked (404) and the external target refuses connections
    assert_eq!(result.inaccessible_links_count(), 2);
    assert!(result.contains_login_form());
}

#[tokio::test]
async fn test_execute_analysis_uses_final_url_as_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/docs/index.html", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/docs/index.html",
        r#"<a href="guide.html">Guide</a><a href="../top">Top</a>"#,
    )
    .await;
    mount_ok(&server, "/docs/guide.html").await;
    mount_ok(&server, "/top").await;

    let result = execute_analysis(options(&format!("{}/start", server.uri())), None)
        .await
        .unwrap();

    assert_eq!(result.internal_links_count(), 2);
    assert_eq!(result.inaccessible_links_count(), 0);
}

#[tokio::test]
async fn test_execute_analysis_reports_progress() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<title>Quiet</title>").await;

    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    let callback: AnalyzeProgressCallback =
        Arc::new(move |msg: String| sink.lock().unwrap().push(msg));

    execute_analysis(options(&server.uri()), Some(callback))
        .await
        .unwrap();

    let messages = messages.lock().unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("Fetching "));
    assert!(messages[1].contains("0 links, 0 inaccessible"));
}

#[tokio::test]
async fn test_execute_analysis_fetch_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = execute_analysis(options(&server.uri()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::UnexpectedStatus(503)));
}

#[tokio::test]
async fn test_execute_analysis_missing_url() {
    let err = execute_analysis(options(""), None).await.unwrap_err();
    assert!(matches!(err, AnalysisError::MissingUrl));
}

// ============================================================================
// analyze_url Tests
// ============================================================================

#[tokio::test]
async fn test_analyze_url_with_shared_client() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN"><title>Old</title><a href="/x">x</a>"#,
    )
    .await;
    mount_ok(&server, "/x").await;

    let client = build_client(Duration::from_secs(5)).unwrap();
    let analyzer = PageAnalyzer::new().unwrap();

    let result = analyze_url(&client, &analyzer, &server.uri()).await.unwrap();
    assert_eq!(result.html_version(), HtmlVersion::Html401);
    assert_eq!(result.page_title(), "Old");
    assert_eq!(result.inaccessible_links_count(), 0);
}

#[tokio::test]
async fn test_analyze_url_invalid_target() {
    let client = build_client(Duration::from_secs(5)).unwrap();
    let analyzer = PageAnalyzer::new().unwrap();

    let err = analyze_url(&client, &analyzer, "example.com").await.unwrap_err();
    assert!(err.is_client_error());
}

// ============================================================================
// analyze_markup Tests
// ============================================================================

#[tokio::test]
async fn test_analyze_markup_offline_document() {
    let markup = r#"<title>Local</title><h3>a</h3><a href="mailto:me@example.com">mail</a>"#;
    let opts = AnalyzeOptions::new("");

    // mailto cannot be fetched, so it counts as inaccessible
    let result = analyze_markup(markup, "https://example.com/", &opts, None)
        .await
        .unwrap();

    assert_eq!(result.page_title(), "Local");
    assert_eq!(result.headings().get("h3"), Some(&1));
    assert_eq!(result.external_links_count(), 1);
    assert_eq!(result.inaccessible_links_count(), 1);
}

#[tokio::test]
async fn test_analyze_markup_invalid_base() {
    let opts = AnalyzeOptions::new("");
    let err = analyze_markup("<p>hi</p>", "not a base", &opts, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Scan(ScanError::InvalidBaseUrl(_))));
}
