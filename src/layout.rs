//! Local directory layout: `{output_dir}/{year}/{category}/`.

use crate::config::ScrapeConfig;
use crate::errors::{AppError, AppResult};
use crate::models::Category;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Directory holding every file downloaded for one (year, category) pair.
pub fn pair_dir(config: &ScrapeConfig, year: u32, category: Category) -> PathBuf {
    config
        .output_dir
        .join(year.to_string())
        .join(category.label())
}

/// Creates the full year × category tree before any network activity.
///
/// Existing directories are left alone. Any filesystem failure is returned to the
/// caller and is meant to end the run.
///
/// # Errors
///
/// Returns `IoError` if a directory cannot be created.
pub async fn provision_directories(config: &ScrapeConfig) -> AppResult<Vec<PathBuf>> {
    let mut created = Vec::with_capacity(config.pair_count());

    for year in config.years() {
        for &category in &config.categories {
            let dir = pair_dir(config, year, category);
            fs::create_dir_all(&dir).await.map_err(|e| {
                AppError::IoError(format!(
                    "Failed to create directory {}: {e}",
                    dir.display()
                ))
            })?;
            debug!(path = %dir.display(), "Directory ready");
            created.push(dir);
        }
    }

    Ok(created)
}
