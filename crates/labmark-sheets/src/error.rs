//! Error types for gradebook access

use thiserror::Error;

/// Errors that can occur while talking to the spreadsheet service
#[derive(Error, Debug)]
pub enum SheetError {
    /// The named worksheet does not exist in the spreadsheet
    #[error("worksheet not found: {title}")]
    WorksheetNotFound { title: String },

    /// Transport-level failure (connection, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with an unexpected status code
    #[error("sheets API returned {status} for {url}")]
    Api { status: u16, url: String },

    /// Response body did not match the expected shape
    #[error("failed to decode sheets API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SheetError {
    fn from(err: reqwest::Error) -> Self {
        SheetError::Http(err.to_string())
    }
}
