//! Error types for the exchange-rate API client.

use thiserror::Error;

/// Errors that can occur when talking to the exchange-rate API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (DNS, TLS, timeout, body decoding)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Request failed with status {0}")]
    Status(reqwest::StatusCode),

    /// API reported an error in its response body
    #[error("API error: {0}")]
    Api(String),

    /// Response did not contain the expected field
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No API key was configured
    #[error("No API key configured (set FXBOARD_API_KEY or pass --api-key)")]
    MissingApiKey,
}
