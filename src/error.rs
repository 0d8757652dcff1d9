//! Error types for the module ownership registry.

use std::path::PathBuf;
use thiserror::Error;

/// Storage-related errors: registry document and filesystem I/O
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Failed to parse registry document {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize registry document: {0}")]
    Serialize(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Command-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Unsupported export format: {0} (must be 'rst' or 'md')")]
    UnsupportedFormat(String),

    #[error("Registry already exists at {0:?}")]
    RegistryExists(PathBuf),

    #[error(
        "Missing credentials: {0}. Set `directory.api_key` in the settings file or the BUGZILLA_API_KEY environment variable."
    )]
    MissingCredentials(String),

    #[error("People directory error: {0}")]
    ServiceError(String),

    #[error("People directory authentication failed: {0}")]
    ServiceAuthFailed(String),

    #[error("People directory rate limit exceeded: {0}")]
    ServiceRateLimit(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl ApiError {
    /// True when the failure needs a credential configured rather than a retry.
    pub fn is_missing_credentials(&self) -> bool {
        matches!(self, ApiError::MissingCredentials(_))
    }
}
