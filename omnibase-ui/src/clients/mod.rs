//! External API clients
//!
//! Streaming availability lookup (RapidAPI), RAWG game search, and the AI
//! recommendation providers. All clients share the error vocabulary below
//! and carry explicit request timeouts.

pub mod ai;
pub mod rawg;
pub mod streaming;

use thiserror::Error;

/// Errors from external API clients
#[derive(Debug, Error)]
pub enum ClientError {
    /// No API key configured for this client
    #[error("API key not configured: {0}")]
    MissingKey(String),

    /// Monthly API call budget exhausted
    #[error("API usage limit reached. Please try again later.")]
    BudgetExhausted,

    /// Network-level failure (connect, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream returned a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// Response could not be parsed into the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Lookup succeeded but returned no usable result
    #[error("No results found")]
    NoResults,

    /// Local persistence failure (cache, usage counter)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<anyhow::Error> for ClientError {
    fn from(e: anyhow::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}

impl From<omnibase_common::Error> for ClientError {
    fn from(e: omnibase_common::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}
