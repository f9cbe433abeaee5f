//! Common test utilities for integration tests

use nirf_scraper::config::ScrapeConfig;
use nirf_scraper::models::Category;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointing at a mock server, writing under `root`, with no courtesy delay.
#[allow(dead_code)]
pub fn test_config(server: &MockServer, root: &Path, categories: &[Category]) -> ScrapeConfig {
    ScrapeConfig {
        base_url: server.uri(),
        start_year: 2020,
        end_year: 2021,
        categories: categories.to_vec(),
        output_dir: root.join("NIRF"),
        listing_timeout_ms: 2_000,
        download_timeouts_ms: vec![2_000, 3_000],
        request_delay_ms: 0,
        ..ScrapeConfig::default()
    }
}

/// Minimal listing page linking every href in order.
#[allow(dead_code)]
pub fn listing_html(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!("<tr><td><a href=\"{href}\">PDF</a></td></tr>\n"))
        .collect();
    format!("<html><body><table>\n{anchors}</table><a href=\"/index.html\">Home</a></body></html>")
}

/// Serves a listing page at `/Rankings/{year}/{token}.html`.
#[allow(dead_code)]
pub async fn mount_listing(server: &MockServer, year: u32, token: &str, hrefs: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/Rankings/{year}/{token}.html")))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(hrefs)))
        .mount(server)
        .await;
}

/// Serves `body` at `route`.
#[allow(dead_code)]
pub async fn mount_pdf(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serves the annual report for `year`.
#[allow(dead_code)]
pub async fn mount_report(server: &MockServer, year: u32) {
    mount_pdf(
        server,
        &format!("/nirfpdfcdn/{year}/pdf/Report/IR{year}_Report.pdf"),
        &format!("report {year}"),
    )
    .await;
}

/// Number of requests received so far for PDF documents.
#[allow(dead_code)]
pub async fn pdf_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path().to_ascii_lowercase().ends_with(".pdf"))
        .count()
}
