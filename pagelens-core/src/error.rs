use pagelens_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No URL provided")]
    MissingUrl,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AnalysisError {
    /// The caller supplied a bad target; nothing was fetched.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingUrl | Self::InvalidUrl(_))
    }
}
