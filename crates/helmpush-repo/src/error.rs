//! Error types for resolving a repository and pushing to it

use helmpush_core::CoreError;
use thiserror::Error;

/// Push operation errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Configuration Errors ============
    #[error("Repository not found: {name}")]
    RepositoryNotFound { name: String },

    #[error("Invalid repository configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Malformed destination URL: {url} - {reason}")]
    MalformedDestination { url: String, reason: String },

    // ============ Chart Errors ============
    #[error("Failed to package chart: {0}")]
    PackagingError(#[from] CoreError),

    #[error("Failed to read chart package {path}: {message}")]
    ArtifactReadError { path: String, message: String },

    // ============ Network Errors ============
    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Failed to read response body: {message}")]
    ResponseReadError { message: String },

    #[error("{status}: {body}")]
    RemoteRejected { status: u16, body: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, RepoError>;

impl From<reqwest::Error> for RepoError {
    fn from(e: reqwest::Error) -> Self {
        let message = if e.is_timeout() {
            format!("Request timed out: {}", e)
        } else if e.is_connect() {
            format!("Connection failed: {}", e)
        } else {
            e.to_string()
        };
        RepoError::NetworkError { message }
    }
}
