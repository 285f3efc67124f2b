//! Repository configuration
//!
//! Reads the Helm repository list (`repositories.yaml`), located at
//! `$HELM_REPOSITORY_CONFIG` or `<config dir>/helm/repositories.yaml`.
//! Only the fields a push needs are kept; TLS settings and other keys in the
//! file are ignored.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::credentials::Credentials;
use crate::error::{RepoError, Result};

/// Environment variable Helm uses to point at the repository list
pub const REPOSITORY_CONFIG_ENV: &str = "HELM_REPOSITORY_CONFIG";

/// Repository configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryFile {
    /// API version
    #[serde(default)]
    pub api_version: String,

    /// Generation timestamp, as written by Helm
    #[serde(default)]
    pub generated: Option<String>,

    /// Configured repositories
    #[serde(default)]
    pub repositories: Vec<Repository>,
}

impl RepositoryFile {
    /// Load configuration from a specific path
    ///
    /// A missing file is an empty configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no repository config at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| RepoError::InvalidConfig {
            message: format!("{}: {}", path.display(), e),
        })
    }

    /// Get default configuration path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| RepoError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("helm").join("repositories.yaml"))
    }

    /// Pick the configuration path: an explicit path wins over the default
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    /// Get a repository by name
    pub fn get(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// List all repository names
    pub fn names(&self) -> Vec<&str> {
        self.repositories.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Repository definition
#[derive(Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Unique name for this repository
    pub name: String,

    /// Repository URL
    pub url: String,

    /// Basic auth username
    #[serde(default)]
    pub username: String,

    /// Basic auth password
    #[serde(default)]
    pub password: String,
}

impl Repository {
    /// Ad hoc repository for a URL given on the command line
    ///
    /// No stored entry exists for it, so it carries no credentials.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: url.clone(),
            url,
            username: String::new(),
            password: String::new(),
        }
    }

    /// Credentials stored with this entry
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Name-based repository lookup
pub trait RepositoryLookup {
    /// Find a repository by name
    fn lookup(&self, name: &str) -> Result<Option<Repository>>;
}

impl RepositoryLookup for RepositoryFile {
    fn lookup(&self, name: &str) -> Result<Option<Repository>> {
        Ok(self.get(name).cloned())
    }
}

/// Lookup that reads the repository file only when a name is resolved
///
/// Pushing to a URL therefore never touches the repository list.
#[derive(Debug, Clone, Default)]
pub struct ConfigFileLookup {
    path: Option<PathBuf>,
}

impl ConfigFileLookup {
    /// Read `path`, or the default location when `None`
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl RepositoryLookup for ConfigFileLookup {
    fn lookup(&self, name: &str) -> Result<Option<Repository>> {
        let path = RepositoryFile::resolve_path(self.path.as_deref())?;
        tracing::debug!("repository config: {}", path.display());

        let file = RepositoryFile::load_from(&path)?;
        let found = file.lookup(name)?;
        if found.is_none() {
            tracing::debug!(
                available = ?file.names(),
                "repository '{}' not in {}",
                name,
                path.display()
            );
        }
        Ok(found)
    }
}
