//! Error types for whereabouts

use thiserror::Error;

/// Main error type for whereabouts operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Geocoding error: {0}")]
    Geocode(#[from] crate::geocode::ProviderError),
}

/// Result type alias for whereabouts operations
pub type Result<T> = std::result::Result<T, Error>;
