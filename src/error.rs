//! Error types for CloudSnap.

/// Top-level error type for the app.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Photo store error: {0}")]
    Store(#[from] StoreError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Photo directory (remote store) errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Request to photo store failed: {0}")]
    Transport(String),

    #[error("Photo store returned status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Failed to decode photo store response: {0}")]
    Decode(String),
}

/// Upload pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No photos selected")]
    NothingSelected,

    #[error("Upload rejected by photo store: status {status}")]
    Rejected { status: u16 },

    #[error("Upload transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Transport(e.to_string())
    }
}

/// Result type alias for the app.
pub type Result<T> = std::result::Result<T, Error>;
