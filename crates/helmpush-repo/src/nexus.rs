//! Nexus Repository Manager upload
//!
//! Charts are pushed through the components API:
//!
//! ```text
//! POST /service/rest/v1/components?repository=<id>[&force]
//! Content-Type: multipart/form-data; boundary=...
//! Authorization: Basic ...
//! ```
//!
//! The repository id is the second path segment of the hosted repository
//! URL (`https://host/repository/<id>/`). Nexus answers 201 or 204 when the
//! asset is stored; anything else is a rejection whose body explains why.

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::header::AUTHORIZATION;
use std::fmt;
use std::fs::File;
use std::path::Path;
use url::Url;

use crate::credentials::Credentials;
use crate::error::{RepoError, Result};

/// Components API path, relative to the Nexus base URL
pub const COMPONENTS_PATH: &str = "/service/rest/v1/components";

/// Form field Nexus reads the chart from
pub const ASSET_FIELD: &str = "helm.asset";

const ASSET_MIME: &str = "application/octet-stream";

const USER_AGENT: &str = concat!("helmpush/", env!("CARGO_PKG_VERSION"));

/// A hosted Nexus repository, addressed by URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    url: Url,
    repository: String,
}

impl Destination {
    /// Parse a repository URL of the form `http(s)://host/repository/<id>/`
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = |reason: String| RepoError::MalformedDestination {
            url: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw).map_err(|e| malformed(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(malformed(format!("unsupported scheme '{}'", url.scheme())));
        }

        let repository = url
            .path_segments()
            .and_then(|mut segments| segments.nth(1))
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| malformed("expected a path like /repository/<name>/".to_string()))?
            .to_string();

        Ok(Self { url, repository })
    }

    /// Repository URL as configured
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Repository id taken from the URL path
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Components API endpoint for this repository
    ///
    /// `force` asks Nexus to replace an asset that already exists at the
    /// same coordinates.
    pub fn upload_endpoint(&self, force: bool) -> Url {
        let mut endpoint = self.url.clone();
        endpoint.set_path(COMPONENTS_PATH);
        endpoint.set_fragment(None);
        endpoint.set_query(None);

        {
            let mut query = endpoint.query_pairs_mut();
            query.append_pair("repository", &self.repository);
            if force {
                query.append_key_only("force");
            }
        }
        endpoint
    }
}

/// Result of one upload attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Asset stored (201 or 204)
    Success { status: u16 },
    /// Any other status, with the response body
    Failure { status: u16, body: String },
}

impl UploadOutcome {
    /// Statuses Nexus uses for a stored asset
    pub fn is_success_status(status: u16) -> bool {
        matches!(status, 201 | 204)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }

    pub fn status(&self) -> u16 {
        match self {
            UploadOutcome::Success { status } | UploadOutcome::Failure { status, .. } => *status,
        }
    }

    /// Turn a failure into `RepoError::RemoteRejected`
    pub fn into_result(self) -> Result<u16> {
        match self {
            UploadOutcome::Success { status } => Ok(status),
            UploadOutcome::Failure { status, body } => {
                Err(RepoError::RemoteRejected { status, body })
            }
        }
    }
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadOutcome::Success { status } => write!(f, "{}", status),
            UploadOutcome::Failure { status, body } => write!(f, "{}: {}", status, body),
        }
    }
}

/// Blocking client for the components API
pub struct NexusClient {
    client: Client,
    credentials: Credentials,
}

impl NexusClient {
    /// Create a client that authenticates with `credentials`
    pub fn new(credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            // Never replay credentials to wherever a redirect points
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RepoError::NetworkError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            credentials,
        })
    }

    /// Upload a packaged chart
    ///
    /// Sends exactly one request. The artifact is opened before anything goes
    /// on the wire, so a missing file never reaches the server; its content
    /// is streamed into the request body.
    pub fn upload(
        &self,
        destination: &Destination,
        artifact: &Path,
        force: bool,
    ) -> Result<UploadOutcome> {
        let endpoint = destination.upload_endpoint(force);
        let form = asset_form(artifact)?;

        if self.credentials.is_empty() {
            tracing::warn!("sending empty basic auth credentials to {}", endpoint);
        }
        tracing::info!(%endpoint, force, "uploading {}", artifact.display());

        // `multipart` sets Content-Type with the boundary the form writes
        let response = self
            .client
            .post(endpoint)
            .header(AUTHORIZATION, self.credentials.auth_header())
            .multipart(form)
            .send()?;

        classify(response)
    }
}

/// Single-part form carrying the chart under `helm.asset`
fn asset_form(artifact: &Path) -> Result<Form> {
    let read_error = |message: String| RepoError::ArtifactReadError {
        path: artifact.display().to_string(),
        message,
    };

    let file_name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| read_error("path has no file name".to_string()))?;
    let file = File::open(artifact).map_err(|e| read_error(e.to_string()))?;
    let length = file
        .metadata()
        .map_err(|e| read_error(e.to_string()))?
        .len();

    tracing::debug!(bytes = length, "streaming {}", file_name);

    let part = Part::reader_with_length(file, length)
        .file_name(file_name)
        .mime_str(ASSET_MIME)?;
    Ok(Form::new().part(ASSET_FIELD, part))
}

fn classify(response: Response) -> Result<UploadOutcome> {
    let status = response.status().as_u16();
    tracing::debug!(status, "upload response");

    if UploadOutcome::is_success_status(status) {
        return Ok(UploadOutcome::Success { status });
    }

    let body = response.text().map_err(|e| RepoError::ResponseReadError {
        message: e.to_string(),
    })?;

    Ok(UploadOutcome::Failure { status, body })
}
