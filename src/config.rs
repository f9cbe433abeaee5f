use crate::constants::*;
use crate::errors::{AppError, AppResult};
use crate::models::Category;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Scrape configuration with all values filled in (no Options).
///
/// `Default` reproduces the site constants; a TOML file may override any subset of
/// keys. Unknown keys are rejected to catch typos.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeConfig {
    /// Site root; listing and report URLs are built beneath it
    pub base_url: String,
    /// First year to scrape (inclusive)
    pub start_year: u32,
    /// Last year to scrape (inclusive)
    pub end_year: u32,
    /// Categories, walked in this order for every year
    pub categories: Vec<Category>,
    /// Research listings do not exist before this year
    pub research_first_year: u32,
    /// Root of the `{year}/{category}` tree
    pub output_dir: PathBuf,

    // Network
    /// Timeout for a listing page request
    pub listing_timeout_ms: u64,
    /// Per-attempt timeouts for file downloads; one entry per attempt
    pub download_timeouts_ms: Vec<u64>,
    /// Pause after each successfully listed (year, category) pair
    pub request_delay_ms: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            start_year: FIRST_YEAR,
            end_year: LAST_YEAR,
            categories: Category::ALL.to_vec(),
            research_first_year: RESEARCH_FIRST_YEAR,
            output_dir: PathBuf::from(OUTPUT_DIR),
            listing_timeout_ms: LISTING_TIMEOUT_MS,
            download_timeouts_ms: DOWNLOAD_TIMEOUTS_MS.to_vec(),
            request_delay_ms: REQUEST_DELAY_MS,
        }
    }
}

impl ScrapeConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// Keys missing from the file keep their default values.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read and `InvalidInput` if the TOML is
    /// malformed, carries unknown keys, or fails [`ScrapeConfig::validate`].
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ScrapeConfig = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the scraper relies on.
    pub fn validate(&self) -> AppResult<()> {
        if self.start_year > self.end_year {
            return Err(AppError::InvalidInput(format!(
                "start_year {} is after end_year {}",
                self.start_year, self.end_year
            )));
        }
        if self.categories.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one category is required".into(),
            ));
        }
        if self.download_timeouts_ms.is_empty() {
            return Err(AppError::InvalidInput(
                "download_timeouts_ms needs at least one attempt".into(),
            ));
        }
        if self.listing_timeout_ms == 0 || self.download_timeouts_ms.contains(&0) {
            return Err(AppError::InvalidInput(
                "Timeouts must be greater than 0".into(),
            ));
        }

        let base = Url::parse(&self.base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::InvalidInput(format!(
                "base_url must be http or https, got: {}",
                self.base_url
            )));
        }

        Ok(())
    }

    /// Years to scrape, ascending.
    pub fn years(&self) -> impl Iterator<Item = u32> {
        self.start_year..=self.end_year
    }

    /// Base URL without a trailing slash, ready for `format!("{base}/...")`.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_millis(self.listing_timeout_ms)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Number of (year, category) pairs a run will visit.
    pub fn pair_count(&self) -> usize {
        self.years().count() * self.categories.len()
    }
}
