//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use helmpush_core::CoreError;
use helmpush_repo::RepoError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Destination could not be resolved or addressed
    #[error("{message}")]
    #[diagnostic(code(helmpush::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Chart loading or packaging error
    #[error("Chart error: {message}")]
    #[diagnostic(code(helmpush::cli::chart))]
    Chart {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(helmpush::cli::io))]
    Io { message: String },

    /// Transport failure before a usable response
    #[error("{message}")]
    #[diagnostic(code(helmpush::cli::network))]
    Network { message: String },

    /// Repository answered with a non-success status
    #[error("{status}: {body}")]
    #[diagnostic(code(helmpush::cli::rejected))]
    Rejected {
        status: u16,
        body: String,
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Input { .. } => exit_codes::INPUT_ERROR,
            CliError::Chart { .. } => exit_codes::CHART_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Network { .. } => exit_codes::NETWORK_ERROR,
            CliError::Rejected { .. } => exit_codes::REMOTE_REJECTED,
        }
    }

    /// Create an input error
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: None,
        }
    }

    /// Create an input error with help text
    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a chart error
    pub fn chart(message: impl Into<String>) -> Self {
        Self::Chart {
            message: message.into(),
            help: None,
        }
    }

    /// Create a rejection error, with a hint for the statuses that have one
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        let help = match status {
            401 => Some("Check the username and password (--username/--password or HELM_REPO_USERNAME/HELM_REPO_PASSWORD)"),
            403 => Some("The user is not allowed to deploy to this repository"),
            404 => Some("Check that the URL points at a hosted Helm repository: https://<host>/repository/<name>/"),
            409 => Some("This chart version already exists; push with --force to overwrite it"),
            _ => None,
        };
        Self::Rejected {
            status,
            body: body.into(),
            help: help.map(String::from),
        }
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::RepositoryNotFound { name } => CliError::input_with_help(
                format!("Repository not found: {}", name),
                "Pass a repository URL (https://<host>/repository/<name>/) or add it with 'helm repo add'",
            ),
            e @ RepoError::MalformedDestination { .. } => CliError::input_with_help(
                e.to_string(),
                "Nexus repository URLs look like https://<host>/repository/<name>/",
            ),
            e @ RepoError::InvalidConfig { .. } => CliError::input(e.to_string()),
            RepoError::PackagingError(e) => CliError::from(e),
            e @ RepoError::ArtifactReadError { .. } => CliError::Io {
                message: e.to_string(),
            },
            e @ (RepoError::NetworkError { .. } | RepoError::ResponseReadError { .. }) => {
                CliError::Network {
                    message: e.to_string(),
                }
            }
            RepoError::RemoteRejected { status, body } => CliError::rejected(status, body),
            RepoError::Io(e) => CliError::from(e),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Io(e) => CliError::from(e),
            e => CliError::chart(e.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
