//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Chart not found: {path}")]
    ChartNotFound { path: String },

    #[error("Invalid chart: {message}")]
    InvalidChart { message: String },

    #[error("Failed to parse Chart.yaml: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid .helmignore pattern: {message}")]
    GlobPattern { message: String },
}

impl From<walkdir::Error> for CoreError {
    fn from(e: walkdir::Error) -> Self {
        CoreError::Io(e.into())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
