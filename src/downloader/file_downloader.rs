use super::http::within;
use crate::config::ScrapeConfig;
use crate::constants::{DOWNLOAD_TIMEOUTS_MS, PART_SUFFIX};
use crate::errors::{AppError, AppResult};
use crate::models::DownloadOutcome;
use crate::utils::size_in_mb;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Per-attempt timeout schedule for file downloads.
///
/// Attempt `n` uses the `n`-th timeout as an inactivity limit: connecting and each
/// body read must finish within it, while a transfer that keeps receiving data may
/// take longer in total. Only timeouts lead to another attempt, so the schedule
/// length is the maximum number of requests for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    attempt_timeouts: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_millis(DOWNLOAD_TIMEOUTS_MS)
    }
}

impl RetryPolicy {
    pub fn new(attempt_timeouts: Vec<Duration>) -> Self {
        Self { attempt_timeouts }
    }

    pub fn from_millis(timeouts_ms: &[u64]) -> Self {
        Self::new(timeouts_ms.iter().copied().map(Duration::from_millis).collect())
    }

    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self::from_millis(&config.download_timeouts_ms)
    }

    pub fn max_attempts(&self) -> usize {
        self.attempt_timeouts.len()
    }

    /// Timeout for a 1-based attempt number.
    pub fn timeout_for(&self, attempt: usize) -> Option<Duration> {
        attempt
            .checked_sub(1)
            .and_then(|i| self.attempt_timeouts.get(i))
            .copied()
    }
}

/// Path of the in-progress file next to `file_path`.
pub(crate) fn part_path(file_path: &Path) -> PathBuf {
    let mut name = file_path.as_os_str().to_owned();
    name.push(".");
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

/// Downloads `url` to `file_path` unless the file already exists.
///
/// # Behavior
///
/// - **Skip existing**: an existing target returns [`DownloadOutcome::AlreadyExists`]
///   without any request.
/// - **Atomic writes**: the body streams into a `.part` file that is renamed onto the
///   target once complete, so an interrupted download never looks finished.
/// - **Retry on timeout**: a timed-out attempt is retried with the next timeout of
///   `policy`. Any other error fails immediately.
///
/// # Errors
///
/// Returns the error of the last attempt. No file is left at `file_path` or at its
/// `.part` path.
pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    file_path: &Path,
    policy: &RetryPolicy,
) -> AppResult<DownloadOutcome> {
    if file_path.exists() {
        info!(path = %file_path.display(), "Already exists");
        return Ok(DownloadOutcome::AlreadyExists);
    }

    let tmp_path = part_path(file_path);
    // Leftover from an interrupted run
    remove_partial(&tmp_path).await;

    let mut last_error: Option<AppError> = None;

    for attempt in 1..=policy.max_attempts() {
        let Some(timeout) = policy.timeout_for(attempt) else {
            break;
        };

        match download_single_file(client, url, &tmp_path, file_path, timeout).await {
            Ok(bytes) => {
                let size_mb = size_in_mb(bytes);
                if attempt == 1 {
                    info!(path = %file_path.display(), size_mb, "Downloaded");
                    return Ok(DownloadOutcome::Downloaded { bytes });
                }
                info!(path = %file_path.display(), attempt, size_mb, "Downloaded on retry");
                return Ok(DownloadOutcome::DownloadedOnRetry { attempt, bytes });
            }
            Err(e) => {
                remove_partial(&tmp_path).await;

                if e.is_timeout() {
                    if let Some(next_timeout) = policy.timeout_for(attempt + 1) {
                        warn!(
                            url = url,
                            attempt,
                            next_timeout_ms = next_timeout.as_millis() as u64,
                            "Timeout, retrying"
                        );
                        last_error = Some(e);
                        continue;
                    }
                }

                if attempt > 1 {
                    warn!(url = url, attempt, error = %e, "Failed to download after retry");
                } else {
                    warn!(url = url, error = %e, "Failed to download");
                }
                return Err(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        AppError::InvalidInput(format!("Retry policy allows no attempts for {url}"))
    }))
}

/// Performs one GET and streams the body to `tmp_path`, then renames it onto
/// `file_path`. `timeout` bounds each network step. Returns the number of bytes
/// written.
async fn download_single_file(
    client: &reqwest::Client,
    url: &str,
    tmp_path: &Path,
    file_path: &Path,
    timeout: Duration,
) -> AppResult<u64> {
    let mut response = within(timeout, url, client.get(url).send())
        .await?
        .error_for_status()?;

    let mut file = File::create(tmp_path).await.map_err(|e| {
        AppError::IoError(format!(
            "Failed to create temp file {}: {}",
            tmp_path.display(),
            e
        ))
    })?;

    let mut bytes: u64 = 0;
    while let Some(chunk) = within(timeout, url, response.chunk()).await? {
        file.write_all(&chunk).await.map_err(|e| {
            AppError::IoError(format!(
                "Failed to write to temp file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        bytes += chunk.len() as u64;
    }
    file.flush().await?;

    // Ensure the file is closed before renaming
    drop(file);

    fs::rename(tmp_path, file_path).await.map_err(|e| {
        AppError::IoError(format!(
            "Failed to rename temp file {} to {}: {}",
            tmp_path.display(),
            file_path.display(),
            e
        ))
    })?;

    Ok(bytes)
}

/// Best-effort removal of a partial download.
async fn remove_partial(tmp_path: &Path) {
    if tmp_path.exists() {
        if let Err(e) = fs::remove_file(tmp_path).await {
            warn!(
                file_path = %tmp_path.display(),
                error = %e,
                "Failed to remove partial file"
            );
        }
    }
}
