//! Destination and credential resolution
//!
//! Turns the command-line destination argument into a repository URL plus
//! the credentials to send, without touching the network.

use crate::config::{Repository, RepositoryLookup};
use crate::credentials::{CredentialEnv, CredentialOverrides, Credentials, resolve_credentials};
use crate::error::{RepoError, Result};

/// Destination argument, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// `http://` or `https://` URL used as-is
    DirectUrl(String),
    /// Name of a configured repository
    Named(String),
}

impl Target {
    /// Classify a destination argument
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Target::DirectUrl(arg.to_string())
        } else {
            Target::Named(arg.to_string())
        }
    }
}

/// Where to push and as whom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRepository {
    /// Name shown to the user (the URL for direct targets)
    pub name: String,
    /// Repository URL
    pub url: String,
    /// Effective credentials
    pub credentials: Credentials,
}

/// Resolves targets against a repository lookup and the credential environment
pub struct Resolver<L> {
    lookup: L,
    env: CredentialEnv,
}

impl<L: RepositoryLookup> Resolver<L> {
    pub fn new(lookup: L, env: CredentialEnv) -> Self {
        Self { lookup, env }
    }

    /// Resolve the destination URL and effective credentials
    pub fn resolve(
        &self,
        target: &Target,
        overrides: &CredentialOverrides,
    ) -> Result<ResolvedRepository> {
        let repo = match target {
            Target::DirectUrl(url) => Repository::from_url(url.as_str()),
            Target::Named(name) => {
                self.lookup
                    .lookup(name)?
                    .ok_or_else(|| RepoError::RepositoryNotFound { name: name.clone() })?
            }
        };

        let credentials = resolve_credentials(overrides, &self.env, &repo.credentials());
        tracing::debug!(
            repository = %repo.name,
            url = %repo.url,
            username = %credentials.username,
            "resolved destination"
        );

        Ok(ResolvedRepository {
            name: repo.name,
            url: repo.url,
            credentials,
        })
    }
}

/// The chart version to package: a non-empty override, else the declared one
pub fn effective_version<'a>(override_version: Option<&'a str>, declared: &'a str) -> &'a str {
    match override_version {
        Some(version) if !version.is_empty() => version,
        _ => declared,
    }
}
