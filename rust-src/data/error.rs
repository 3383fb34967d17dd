//! Errors raised while fetching a dashboard snapshot.

use thiserror::Error;


/// Fetch or parse failure for one snapshot request.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Configured endpoint is not a usable base URL
    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Transport failed before a response was read
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server responded with {0}")]
    Status(reqwest::StatusCode),

    /// Body is not the expected JSON payload
    #[error("invalid dashboard payload: {0}")]
    Decode(#[from] serde_json::Error),
}
