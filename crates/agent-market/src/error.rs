//! Error types for market-data operations

use thiserror::Error;

/// Market-data specific errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// The API answered with a non-200 status
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The request never produced a response (connection, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body was not the expected JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Tool arguments were missing or malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for market-data operations
pub type Result<T> = std::result::Result<T, MarketError>;

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        MarketError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        MarketError::InvalidResponse(err.to_string())
    }
}

/// Convert MarketError to agent_core::Error
///
/// Runtime failures keep their own message, since it becomes the tool
/// observation the LLM reads.
impl From<MarketError> for agent_core::Error {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::Config(msg) => agent_core::Error::Configuration(msg),
            other => agent_core::Error::Generic(other.to_string()),
        }
    }
}
