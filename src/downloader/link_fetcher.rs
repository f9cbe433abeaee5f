use super::http::{read_text, within};
use crate::config::ScrapeConfig;
use crate::constants::{ENCODED_SPACE, LINK_SELECTOR, PDF_MARKER, UNSAFE_FILENAME_CHARS};
use crate::errors::AppResult;
use crate::models::{Category, PdfLink};
use scraper::{Html, Selector};
use std::sync::OnceLock;
use tracing::{debug, warn};
use url::Url;

/// Cached CSS selector for anchors carrying an `href`.
/// Compiled once at initialization for performance.
static LINK_SELECTOR_CACHED: OnceLock<Selector> = OnceLock::new();

/// Builds the listing page URL for one (year, category) pair.
///
/// Returns `None` when the site publishes no listing for the pair, which is the case
/// for `Research` before `research_first_year`. Callers skip the pair without making
/// any request.
pub fn listing_url(config: &ScrapeConfig, year: u32, category: Category) -> Option<String> {
    if category == Category::Research && year < config.research_first_year {
        return None;
    }
    Some(format!(
        "{}/Rankings/{year}/{}.html",
        config.base(),
        category.path_token()
    ))
}

/// URL of the year-level annual report.
pub fn annual_report_url(config: &ScrapeConfig, year: u32) -> String {
    format!(
        "{}/nirfpdfcdn/{year}/pdf/Report/IR{year}_Report.pdf",
        config.base()
    )
}

/// Local file name of the annual report for `year`.
pub fn annual_report_filename(year: u32) -> String {
    format!("IR{year}_Report.pdf")
}

/// Fetches a listing page and extracts its PDF links.
///
/// The configured listing timeout bounds connecting and each read of the body, not
/// the whole transfer. Any non-success status fails. There is no retry at this level.
///
/// # Errors
///
/// Returns `Timeout`, `HttpStatus` or `NetworkError` when the page cannot be fetched.
pub async fn fetch_pdf_links(
    client: &reqwest::Client,
    config: &ScrapeConfig,
    listing_url: &str,
) -> AppResult<Vec<PdfLink>> {
    let limit = config.listing_timeout();
    let response = within(limit, listing_url, client.get(listing_url).send())
        .await?
        .error_for_status()?;
    let body = read_text(response, limit, listing_url).await?;

    Ok(parse_pdf_links(&body, config.base()))
}

/// Parses HTML content and extracts every link whose target mentions `.pdf`.
///
/// Matching is case-insensitive and links are returned in document order, duplicates
/// included. Relative targets are resolved against `base`; links that do not yield a
/// usable file name are dropped with a warning.
pub fn parse_pdf_links(html: &str, base: &str) -> Vec<PdfLink> {
    let document = Html::parse_document(html);

    let selector = LINK_SELECTOR_CACHED.get_or_init(|| {
        Selector::parse(LINK_SELECTOR).expect("LINK_SELECTOR is a valid CSS selector")
    });

    let mut links = Vec::new();
    for href in document
        .select(selector)
        .filter_map(|el| el.value().attr("href"))
        .filter(|href| href.to_ascii_lowercase().contains(PDF_MARKER))
    {
        let url = resolve_link(base, href);
        match local_filename(&url) {
            Some(filename) => links.push(PdfLink { url, filename }),
            None => warn!(href = href, "Skipping PDF link without a usable file name"),
        }
    }

    debug!(count = links.len(), "PDF links extracted");
    links
}

/// Makes `href` absolute.
///
/// Targets already starting with `http://` or `https://` are kept as-is; anything
/// else is appended to `base` after stripping leading slashes.
pub fn resolve_link(base: &str, href: &str) -> String {
    let lower = href.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return href.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}

/// Derives the local file name from the last path segment of `url`.
///
/// A query string is kept, joined with `_`, so `download?f=A.pdf` and
/// `download?f=B.pdf` land in different files. Encoded spaces and characters that
/// are not portable in file names become underscores. Returns `None` if the URL
/// does not parse or ends in a slash.
pub fn local_filename(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments().and_then(|mut s| s.next_back())?;
    if segment.is_empty() {
        return None;
    }

    let name = match parsed.query().filter(|q| !q.is_empty()) {
        Some(query) => format!("{segment}_{query}"),
        None => segment.to_string(),
    };
    let name = name.replace(ENCODED_SPACE, "_");
    Some(
        name.chars()
            .map(|c| if UNSAFE_FILENAME_CHARS.contains(&c) { '_' } else { c })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.nirfindia.org";

    #[test]
    fn test_listing_url_every_default_pair() {
        let config = ScrapeConfig::default();
        for year in 2020..=2025 {
            for category in Category::ALL {
                let url = listing_url(&config, year, category);
                if year == 2020 && category == Category::Research {
                    assert_eq!(url, None);
                    continue;
                }
                let token = match category {
                    Category::Engineering => "EngineeringRanking",
                    Category::Law => "LawRanking",
                    Category::Research => "ResearchRanking",
                    Category::Overall => "OverallRanking",
                };
                assert_eq!(
                    url.unwrap(),
                    format!("https://www.nirfindia.org/Rankings/{year}/{token}.html")
                );
            }
        }
    }

    #[test]
    fn test_listing_url_research_after_first_year() {
        let config = ScrapeConfig::default();
        assert_eq!(
            listing_url(&config, 2021, Category::Research).unwrap(),
            "https://www.nirfindia.org/Rankings/2021/ResearchRanking.html"
        );
    }

    #[test]
    fn test_listing_url_trailing_slash_base() {
        let config = ScrapeConfig {
            base_url: "http://127.0.0.1:9000/".to_string(),
            ..ScrapeConfig::default()
        };
        assert_eq!(
            listing_url(&config, 2023, Category::Law).unwrap(),
            "http://127.0.0.1:9000/Rankings/2023/LawRanking.html"
        );
    }

    #[test]
    fn test_annual_report_url_and_name() {
        let config = ScrapeConfig::default();
        assert_eq!(
            annual_report_url(&config, 2024),
            "https://www.nirfindia.org/nirfpdfcdn/2024/pdf/Report/IR2024_Report.pdf"
        );
        assert_eq!(annual_report_filename(2024), "IR2024_Report.pdf");
    }

    #[test]
    fn test_relative_link_with_encoded_space() {
        let url = resolve_link(BASE, "/Reports/Foo%20Bar.pdf");
        assert_eq!(url, "https://www.nirfindia.org/Reports/Foo%20Bar.pdf");
        assert_eq!(local_filename(&url).unwrap(), "Foo_Bar.pdf");
    }

    #[test]
    fn test_resolve_link_keeps_absolute_urls() {
        assert_eq!(
            resolve_link(BASE, "https://cdn.example.com/a.pdf"),
            "https://cdn.example.com/a.pdf"
        );
        assert_eq!(
            resolve_link(BASE, "HTTP://cdn.example.com/a.pdf"),
            "HTTP://cdn.example.com/a.pdf"
        );
        assert_eq!(
            resolve_link(BASE, "nirfpdfcdn/2023/x.pdf"),
            "https://www.nirfindia.org/nirfpdfcdn/2023/x.pdf"
        );
    }

    #[test]
    fn test_local_filename_edge_cases() {
        assert_eq!(local_filename("https://example.com/dir/"), None);
        assert_eq!(local_filename("::not a url::"), None);
        assert_eq!(
            local_filename("https://example.com/a%20b%20c.PDF?v=2").unwrap(),
            "a_b_c.PDF_v_2"
        );
        assert_eq!(local_filename("https://example.com/a.pdf?").unwrap(), "a.pdf");
    }

    #[test]
    fn test_query_keeps_file_names_distinct() {
        let html = r#"
            <html><body>
              <a href="/download?f=A.pdf">A</a>
              <a href="/download?f=B.pdf">B</a>
            </body></html>
        "#;

        let links = parse_pdf_links(html, BASE);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].filename, "download_f_A.pdf");
        assert_eq!(links[1].filename, "download_f_B.pdf");
        assert_ne!(links[0].filename, links[1].filename);
    }

    #[test]
    fn test_resolve_link_does_not_trim_whitespace() {
        assert_eq!(
            resolve_link(BASE, " /Reports/a.pdf"),
            "https://www.nirfindia.org/ /Reports/a.pdf"
        );
    }

    #[test]
    fn test_parse_pdf_links_order_case_and_duplicates() {
        let html = r#"
            <html><body>
              <a href="/Reports/Foo%20Bar.pdf">one</a>
              <a href="https://cdn.example.com/files/IR-1.PDF">two</a>
              <a href="/about.html">skip</a>
              <a>no href</a>
              <a href="/Reports/Foo%20Bar.pdf">again</a>
              <a href="download.pdf?id=7">query</a>
            </body></html>
        "#;

        let links = parse_pdf_links(html, BASE);
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://www.nirfindia.org/Reports/Foo%20Bar.pdf",
                "https://cdn.example.com/files/IR-1.PDF",
                "https://www.nirfindia.org/Reports/Foo%20Bar.pdf",
                "https://www.nirfindia.org/download.pdf?id=7",
            ]
        );
        assert_eq!(links[0].filename, "Foo_Bar.pdf");
        assert_eq!(links[1].filename, "IR-1.PDF");
        assert_eq!(links[3].filename, "download.pdf_id_7");
    }

    #[test]
    fn test_parse_pdf_links_none_found() {
        let html = r#"<html><body><a href="/index.html">home</a></body></html>"#;
        assert!(parse_pdf_links(html, BASE).is_empty());
    }

    #[test]
    fn test_parse_pdf_links_drops_unnamed_targets() {
        let html = r#"<html><body><a href="/pdfs.pdf/">dir</a></body></html>"#;
        assert!(parse_pdf_links(html, BASE).is_empty());
    }
}
