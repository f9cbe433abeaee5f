use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Request did not complete within its timeout
    #[error("Request timed out: {0}")]
    Timeout(String),
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },
    /// Failed to parse HTML content
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    UrlError(String),
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
}

impl AppError {
    /// Only timeouts are worth another attempt; everything else fails the same way twice.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AppError::Timeout(_))
    }
}

// Conversion implementations for common errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AppError::Timeout(err.to_string());
        }
        match (err.status(), err.url()) {
            (Some(status), Some(url)) => AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            },
            _ => AppError::NetworkError(err.to_string()),
        }
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::UrlError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;
