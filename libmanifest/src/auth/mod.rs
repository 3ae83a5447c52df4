//! Authentication handling for registry requests.
//!
//! Registries answer an unauthenticated request with `401` and a
//! `WWW-Authenticate` challenge. A `Basic` challenge is answered by resending
//! the request with Basic credentials; a `Bearer` challenge by requesting a
//! token from the challenge realm and resending with that token.

use crate::error::{Result, ToolError};
use serde::Deserialize;

pub mod docker_config;


/// Credentials for registry authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication
    Anonymous,

    /// HTTP Basic authentication
    Basic { username: String, password: String },

    /// A token obtained from a registry token service
    Bearer { token: String },
}

impl Credentials {
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    /// Creates Basic authentication credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifest::Credentials;
    ///
    /// let creds = Credentials::basic("user", "pass");
    /// assert_eq!(creds.to_header_value().unwrap(), "Basic dXNlcjpwYXNz");
    /// ```
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Returns the `Authorization` header value, or `None` for anonymous access.
    pub fn to_header_value(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Basic { username, password } => {
                use base64::{Engine as _, engine::general_purpose};
                let encoded = general_purpose::STANDARD.encode(format!("{}:{}", username, password));
                Some(format!("Basic {}", encoded))
            }
            Self::Bearer { token } => Some(format!("Bearer {}", token)),
        }
    }
}

/// A parsed `WWW-Authenticate` challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChallenge {
    /// The authentication scheme, `Bearer` or `Basic`
    pub scheme: String,

    /// Token endpoint for Bearer, protection space for Basic
    pub realm: String,

    pub service: Option<String>,

    pub scope: Option<String>,
}

impl AuthChallenge {
    /// Parses a `WWW-Authenticate` header value.
    ///
    /// Quoted parameter values may contain commas, as in
    /// `scope="repository:app:pull,push"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifest::auth::AuthChallenge;
    ///
    /// let header = r#"Bearer realm="https://auth.example.com/token",service="registry""#;
    /// let challenge = AuthChallenge::parse(header).unwrap();
    /// assert!(challenge.is_bearer());
    /// assert_eq!(challenge.service.as_deref(), Some("registry"));
    /// ```
    pub fn parse(header: &str) -> Result<Self> {
        let header = header.trim();
        let (scheme, params) = header
            .split_once(' ')
            .ok_or_else(|| ToolError::validation("Invalid WWW-Authenticate header format"))?;

        let mut realm = None;
        let mut service = None;
        let mut scope = None;

        for (key, value) in split_params(params) {
            match key.to_ascii_lowercase().as_str() {
                "realm" => realm = Some(value),
                "service" => service = Some(value),
                "scope" => scope = Some(value),
                _ => {}
            }
        }

        let realm = realm.ok_or_else(|| {
            ToolError::validation("WWW-Authenticate header missing required 'realm' parameter")
        })?;

        Ok(Self {
            scheme: scheme.to_string(),
            realm,
            service,
            scope,
        })
    }

    pub fn is_bearer(&self) -> bool {
        self.scheme.eq_ignore_ascii_case("bearer")
    }

    pub fn is_basic(&self) -> bool {
        self.scheme.eq_ignore_ascii_case("basic")
    }

    /// The scope to request a token for, defaulting to pull access on `repository`.
    pub fn scope_for(&self, repository: &str) -> String {
        self.scope
            .clone()
            .unwrap_or_else(|| format!("repository:{}:pull", repository))
    }
}

/// Splits `key="value",key=value` pairs, honouring quotes.
fn split_params(params: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in params.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                pairs.extend(parse_pair(&current));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    pairs.extend(parse_pair(&current));
    pairs
}

fn parse_pair(raw: &str) -> Option<(String, String)> {
    let (key, value) = raw.split_once('=')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}

/// Response body of a registry token service.
///
/// Docker Hub sends both `token` and `access_token`; other services send one.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

impl TokenResponse {
    /// Converts the response into Bearer credentials.
    pub fn into_credentials(self) -> Result<Credentials> {
        self.token
            .or(self.access_token)
            .filter(|token| !token.is_empty())
            .map(Credentials::bearer)
            .ok_or_else(|| ToolError::authentication("token response carried no token", None))
    }
}
