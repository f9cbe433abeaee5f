use crate::errors::{AppError, AppResult};
use indicatif::{ProgressBar, ProgressStyle};

/// Creates the progress bar that tracks (year, category) pairs.
///
/// The bar draws to stderr, so log lines on stdout stay readable, and it hides
/// itself when stderr is not a terminal.
///
/// # Example
///
/// ```no_run
/// use nirf_scraper::ui;
///
/// # fn main() -> Result<(), nirf_scraper::errors::AppError> {
/// let pb = ui::create_progress_bar(24)?;
/// pb.set_message("2020 Engineering");
/// pb.inc(1);
/// pb.finish_with_message("Done");
/// # Ok(())
/// # }
/// ```
pub fn create_progress_bar(total: u64) -> AppResult<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} pairs {msg}")
            .map_err(|e| AppError::IoError(format!("Failed to create progress bar template: {e}")))?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
