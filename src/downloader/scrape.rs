use super::file_downloader::{download_file, RetryPolicy};
use super::link_fetcher::{annual_report_filename, annual_report_url, fetch_pdf_links, listing_url};
use crate::config::ScrapeConfig;
use crate::errors::AppResult;
use crate::layout::{pair_dir, provision_directories};
use crate::models::{Category, RunSummary};
use crate::ui;
use crate::utils::format_duration;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

/// How a single (year, category) pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStatus {
    /// Listing fetched; links and the annual report were attempted.
    Processed,
    /// The site publishes no listing for this pair.
    Unavailable,
    /// Listing page could not be fetched; nothing was downloaded.
    ListingFailed,
}

/// Runs the whole scrape described by `config`.
///
/// The directory tree is provisioned first; then years are walked in ascending
/// order and categories in configured order. Failures of a listing page or of a
/// single file are logged and never stop the run.
///
/// # Errors
///
/// Returns an error only if the directory tree cannot be created.
pub async fn scrape_all(client: &reqwest::Client, config: &ScrapeConfig) -> AppResult<RunSummary> {
    let started = Instant::now();
    provision_directories(config).await?;

    let policy = RetryPolicy::from_config(config);
    let mut summary = RunSummary::default();
    let pb = ui::create_progress_bar(config.pair_count() as u64)?;

    for year in config.years() {
        for &category in &config.categories {
            pb.set_message(format!("{year} {category}"));
            info!(year, category = category.label(), "Scraping");

            let status = scrape_pair(client, config, &policy, year, category, &mut summary).await;
            match status {
                PairStatus::Processed => summary.pairs_processed += 1,
                PairStatus::Unavailable => summary.pairs_unavailable += 1,
                PairStatus::ListingFailed => summary.listings_failed += 1,
            }
            pb.inc(1);
        }
    }

    pb.finish_with_message(format!("Downloaded {} file(s)", summary.written()));
    info!(
        pairs = summary.pairs_processed,
        unavailable = summary.pairs_unavailable,
        listings_failed = summary.listings_failed,
        downloaded = summary.downloaded,
        downloaded_on_retry = summary.downloaded_on_retry,
        already_present = summary.already_present,
        failed = summary.failed,
        elapsed = %format_duration(started.elapsed()),
        "Scrape completed"
    );

    Ok(summary)
}

/// Processes one (year, category) pair.
///
/// Downloads every PDF on the listing page, then the year's annual report into the
/// same directory. The courtesy delay applies only after a successful listing fetch.
pub async fn scrape_pair(
    client: &reqwest::Client,
    config: &ScrapeConfig,
    policy: &RetryPolicy,
    year: u32,
    category: Category,
    summary: &mut RunSummary,
) -> PairStatus {
    let Some(url) = listing_url(config, year, category) else {
        info!(year, category = category.label(), "Not available for this year, skipping");
        return PairStatus::Unavailable;
    };

    let links = match fetch_pdf_links(client, config, &url).await {
        Ok(links) => links,
        Err(e) => {
            error!(url = %url, error = %e, "Failed to access listing page");
            return PairStatus::ListingFailed;
        }
    };
    info!(url = %url, links = links.len(), "Listing fetched");

    let save_dir = pair_dir(config, year, category);
    for link in &links {
        fetch_into(client, &link.url, &save_dir.join(&link.filename), policy, summary).await;
    }

    // Same report lands in every category directory of the year
    let report_path = save_dir.join(annual_report_filename(year));
    fetch_into(
        client,
        &annual_report_url(config, year),
        &report_path,
        policy,
        summary,
    )
    .await;

    tokio::time::sleep(config.request_delay()).await;
    PairStatus::Processed
}

async fn fetch_into(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
    policy: &RetryPolicy,
    summary: &mut RunSummary,
) {
    match download_file(client, url, path, policy).await {
        Ok(outcome) => summary.record(&outcome),
        // Already logged by download_file
        Err(_) => summary.failed += 1,
    }
}
