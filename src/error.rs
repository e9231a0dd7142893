//! Error types for the leadchat gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while wiring up or running the gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Service account loading or token minting failed
    #[error("credentials error: {0}")]
    Credentials(String),

    /// Spreadsheet provisioning or append failed
    #[error("sheets error: {0}")]
    Sheets(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV writing error
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
