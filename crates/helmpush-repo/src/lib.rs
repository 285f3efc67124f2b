//! helmpush Repository Support
//!
//! This crate resolves where a chart goes and delivers it:
//!
//! - **Configuration**: the Helm repository list (`repositories.yaml`)
//! - **Credentials**: flag > environment > stored precedence for basic auth
//! - **Resolution**: URL-or-name destinations, effective chart version
//! - **Nexus upload**: multipart POST to the components API, response
//!   classification
//!
//! ## Example
//!
//! ```rust,no_run
//! use helmpush_repo::{
//!     ConfigFileLookup, CredentialEnv, CredentialOverrides, Destination, NexusClient,
//!     Resolver, Target,
//! };
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = Resolver::new(
//!     ConfigFileLookup::new(None),
//!     CredentialEnv::from_process(),
//! );
//! let repo = resolver.resolve(&Target::parse("nexus-helm-host"), &CredentialOverrides::default())?;
//!
//! let destination = Destination::parse(&repo.url)?;
//! let client = NexusClient::new(repo.credentials)?;
//! let outcome = client.upload(&destination, Path::new("mychart-0.1.0.tgz"), true)?;
//! outcome.into_result()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod nexus;
pub mod resolver;

// Re-exports for convenience
pub use config::{
    ConfigFileLookup, REPOSITORY_CONFIG_ENV, Repository, RepositoryFile, RepositoryLookup,
};
pub use credentials::{
    CredentialEnv, CredentialOverrides, Credentials, PASSWORD_ENV, USERNAME_ENV,
    resolve_credentials,
};
pub use error::{RepoError, Result};
pub use nexus::{ASSET_FIELD, COMPONENTS_PATH, Destination, NexusClient, UploadOutcome};
pub use resolver::{ResolvedRepository, Resolver, Target, effective_version};
