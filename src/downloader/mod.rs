//! Fetch and download operations for NIRF ranking documents.
//!
//! This module builds listing URLs, extracts PDF links from listing pages and
//! downloads the documents with a timeout-driven retry. The main entry point is
//! [`scrape_all`].

mod file_downloader;
mod http;
mod link_fetcher;
mod scrape;

// Re-export public API
pub use file_downloader::{download_file, RetryPolicy};
pub use link_fetcher::{
    annual_report_filename, annual_report_url, fetch_pdf_links, listing_url, local_filename,
    parse_pdf_links, resolve_link,
};
pub use scrape::{scrape_all, scrape_pair, PairStatus};
