use serde::Deserialize;
use std::fmt;

/// Ranking category published on the listing site.
///
/// Variants are declared in the order the scraper walks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Category {
    Engineering,
    Law,
    Research,
    Overall,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Engineering,
        Category::Law,
        Category::Research,
        Category::Overall,
    ];

    /// Label used for the local directory name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Engineering => "Engineering",
            Self::Law => "Law",
            Self::Research => "Research",
            Self::Overall => "Overall",
        }
    }

    /// Page name under `/Rankings/{year}/`, without the `.html` extension.
    pub fn path_token(&self) -> &'static str {
        match self {
            Self::Engineering => "EngineeringRanking",
            Self::Law => "LawRanking",
            Self::Research => "ResearchRanking",
            Self::Overall => "OverallRanking",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// PDF hyperlink found on a listing page, resolved to an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfLink {
    pub url: String,
    /// Local file name derived from the last path segment of `url`.
    pub filename: String,
}

/// Result of a single file download that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Target path was already on disk; no request was made.
    AlreadyExists,
    /// Written on the first attempt.
    Downloaded { bytes: u64 },
    /// Written after one or more timed-out attempts. `attempt` is 1-based.
    DownloadedOnRetry { attempt: usize, bytes: u64 },
}

/// Aggregated counters for a whole run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub pairs_processed: usize,
    pub pairs_unavailable: usize,
    pub listings_failed: usize,
    pub downloaded: usize,
    pub downloaded_on_retry: usize,
    pub already_present: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::AlreadyExists => self.already_present += 1,
            DownloadOutcome::Downloaded { .. } => self.downloaded += 1,
            DownloadOutcome::DownloadedOnRetry { .. } => self.downloaded_on_retry += 1,
        }
    }

    /// Files written during this run, regardless of how many attempts it took.
    pub fn written(&self) -> usize {
        self.downloaded + self.downloaded_on_retry
    }
}
