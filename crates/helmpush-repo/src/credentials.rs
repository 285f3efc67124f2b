//! Basic auth credentials and their precedence
//!
//! A value can come from three places. The first non-empty one wins:
//! 1. command-line flag
//! 2. `HELM_REPO_USERNAME` / `HELM_REPO_PASSWORD`
//! 3. the stored repository entry
//!
//! When none is set the field is the empty string. The request still carries
//! a basic auth header in that case.

/// Username fallback variable
pub const USERNAME_ENV: &str = "HELM_REPO_USERNAME";

/// Password fallback variable
pub const PASSWORD_ENV: &str = "HELM_REPO_PASSWORD";

/// Resolved basic auth credentials
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields empty
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }

    /// `Authorization` header value
    pub fn auth_header(&self) -> String {
        let encoded = base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            format!("{}:{}", self.username, self.password),
        );
        format!("Basic {}", encoded)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credential values from the process environment
///
/// Read once at the edge of the program and passed in as data.
#[derive(Clone, Default)]
pub struct CredentialEnv {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialEnv {
    /// Read `HELM_REPO_USERNAME` and `HELM_REPO_PASSWORD`
    pub fn from_process() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            username: lookup(USERNAME_ENV),
            password: lookup(PASSWORD_ENV),
        }
    }
}

/// Credential values given as flags
#[derive(Clone, Default)]
pub struct CredentialOverrides {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Apply flag > environment > stored precedence, field by field
pub fn resolve_credentials(
    flags: &CredentialOverrides,
    env: &CredentialEnv,
    stored: &Credentials,
) -> Credentials {
    Credentials {
        username: first_non_empty([
            flags.username.as_deref(),
            env.username.as_deref(),
            Some(stored.username.as_str()),
        ]),
        password: first_non_empty([
            flags.password.as_deref(),
            env.password.as_deref(),
            Some(stored.password.as_str()),
        ]),
    }
}

fn first_non_empty<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}
