use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
