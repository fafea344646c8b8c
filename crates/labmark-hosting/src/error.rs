//! Error types for the source-hosting client

use thiserror::Error;

/// Errors that can occur while querying the source-hosting service
#[derive(Error, Debug)]
pub enum HostError {
    /// Transport-level failure (connection, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with an unexpected status code
    #[error("hosting API returned {status} for {url}")]
    Api { status: u16, url: String },

    /// Response body did not match the expected shape
    #[error("failed to decode hosting API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for HostError {
    fn from(err: reqwest::Error) -> Self {
        HostError::Http(err.to_string())
    }
}
