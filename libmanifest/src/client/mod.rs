//! HTTP client for registry communication.
//!
//! A thin layer over reqwest implementing the two read endpoints inspection
//! needs, `/v2/<name>/manifests/<reference>` and `/v2/<name>/blobs/<digest>`,
//! plus the token challenge flow registries use to grant pull access.

use crate::auth::{AuthChallenge, Credentials, TokenResponse};
use crate::digest::Digest;
use crate::error::{Result, ToolError};
use crate::oci::{
    MEDIA_TYPE_DOCKER_MANIFEST, MEDIA_TYPE_DOCKER_MANIFEST_LIST, MEDIA_TYPE_OCI_INDEX,
    MEDIA_TYPE_OCI_MANIFEST,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER, WWW_AUTHENTICATE};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, StatusCode};
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, trace};


/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libmanifest::client::ClientConfig;
///
/// let config = ClientConfig::new().with_timeout(60).with_plain_http(true);
/// assert_eq!(config.timeout_seconds, 60);
/// assert!(config.plain_http);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Accept invalid TLS certificates
    pub insecure: bool,
    /// Use `http://` for registries given without a scheme
    pub plain_http: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            insecure: false,
            plain_http: false,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_plain_http(mut self, plain_http: bool) -> Self {
        self.plain_http = plain_http;
        self
    }
}

/// A manifest or index as served by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedManifest {
    pub bytes: Vec<u8>,
    pub media_type: String,
    /// The `Docker-Content-Digest` header, when the registry sent one
    pub digest: Option<String>,
}

/// HTTP client bound to one registry.
#[derive(Debug)]
pub struct Client {
    http_client: ReqwestClient,
    registry_url: String,
    credentials: Credentials,
    /// Authorization header that satisfied the last challenge
    authorization: Mutex<Option<String>>,
    timeout_seconds: u64,
}

impl Client {
    /// Creates an anonymous client with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifest::client::Client;
    ///
    /// let client = Client::new("registry.example.com").unwrap();
    /// assert_eq!(client.registry_url(), "https://registry.example.com");
    /// ```
    pub fn new(registry_url: &str) -> Result<Self> {
        Self::with_config(registry_url, ClientConfig::default(), Credentials::Anonymous)
    }

    /// Creates a client with custom configuration and credentials.
    pub fn with_config(
        registry_url: &str,
        config: ClientConfig,
        credentials: Credentials,
    ) -> Result<Self> {
        let normalized_url = Self::normalize_url(registry_url, config.plain_http)?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| ToolError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            registry_url: normalized_url,
            credentials,
            authorization: Mutex::new(None),
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Ensures a scheme and strips trailing slashes.
    fn normalize_url(url: &str, plain_http: bool) -> Result<String> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ToolError::validation("Registry URL cannot be empty"));
        }

        let url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if plain_http {
            format!("http://{}", url)
        } else {
            format!("https://{}", url)
        };

        Ok(url.trim_end_matches('/').to_string())
    }

    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Fetches a manifest or index by tag or digest.
    ///
    /// The media type comes from the `Content-Type` header, falling back to
    /// the `mediaType` field of the body.
    pub async fn fetch_manifest(&self, repository: &str, reference: &str) -> Result<FetchedManifest> {
        let url = format!(
            "{}/v2/{}/manifests/{}",
            self.registry_url, repository, reference
        );
        let accept = [
            MEDIA_TYPE_OCI_MANIFEST,
            MEDIA_TYPE_OCI_INDEX,
            MEDIA_TYPE_DOCKER_MANIFEST,
            MEDIA_TYPE_DOCKER_MANIFEST_LIST,
        ]
        .join(", ");

        let response = self
            .send(repository, || self.http_client.get(&url).header(ACCEPT, accept.as_str()))
            .await?;

        let digest = header_str(&response, "Docker-Content-Digest");
        let content_type = header_str(&response, CONTENT_TYPE.as_str());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ToolError::network_with_source("Failed to read manifest response", e))?
            .to_vec();

        let media_type = content_type
            .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_string())
            .filter(|ct| !ct.is_empty() && ct != "application/json")
            .or_else(|| media_type_from_body(&bytes))
            .unwrap_or_default();

        debug!(repository, reference, %media_type, size = bytes.len(), "Fetched manifest");
        Ok(FetchedManifest {
            bytes,
            media_type,
            digest,
        })
    }

    /// Fetches a blob and verifies it against `digest`.
    pub async fn fetch_blob(&self, repository: &str, digest: &str) -> Result<Vec<u8>> {
        let expected = Digest::from_str(digest)?;
        if expected.algorithm() != "sha256" {
            return Err(ToolError::validation(format!(
                "Unsupported digest algorithm: {}. Only sha256 is currently supported",
                expected.algorithm()
            )));
        }

        let url = format!("{}/v2/{}/blobs/{}", self.registry_url, repository, digest);
        let response = self.send(repository, || self.http_client.get(&url)).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ToolError::network_with_source("Failed to read blob response", e))?
            .to_vec();

        let computed = Digest::sha256_of(&bytes)?;
        if computed != expected {
            return Err(ToolError::validation(format!(
                "Blob digest mismatch: expected {}, computed {}",
                expected, computed
            )));
        }

        debug!(repository, digest, size = bytes.len(), "Fetched blob");
        Ok(bytes)
    }

    /// Sends a request, answering at most one authentication challenge.
    async fn send<F>(&self, repository: &str, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let cached = self
            .authorization
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let response = self.dispatch(build(), cached.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check_response_status(response).await;
        }

        let Some(challenge) = header_str(&response, WWW_AUTHENTICATE.as_str())
            .and_then(|header| AuthChallenge::parse(&header).ok())
        else {
            return Self::check_response_status(response).await;
        };

        let authorization = if challenge.is_bearer() {
            self.fetch_token(&challenge, repository).await?.to_header_value()
        } else if challenge.is_basic() {
            self.credentials.to_header_value()
        } else {
            None
        };
        let Some(authorization) = authorization else {
            return Self::check_response_status(response).await;
        };

        trace!(scheme = %challenge.scheme, "Retrying request after authentication challenge");
        let response = self.dispatch(build(), Some(&authorization)).await?;
        let response = Self::check_response_status(response).await?;
        *self
            .authorization
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(authorization);
        Ok(response)
    }

    async fn dispatch(&self, request: RequestBuilder, authorization: Option<&str>) -> Result<Response> {
        let request = match authorization {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        };
        request
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e))
    }

    /// Requests a Bearer token from the challenge realm.
    async fn fetch_token(&self, challenge: &AuthChallenge, repository: &str) -> Result<Credentials> {
        let scope = challenge.scope_for(repository);
        let mut query = vec![("scope", scope.as_str())];
        if let Some(service) = challenge.service.as_deref() {
            query.push(("service", service));
        }

        debug!(realm = %challenge.realm, %scope, "Requesting registry token");
        let mut request = self.http_client.get(&challenge.realm).query(&query);
        if let Credentials::Basic { .. } = self.credentials
            && let Some(basic) = self.credentials.to_header_value()
        {
            request = request.header(AUTHORIZATION, basic);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e))?;
        let response = Self::check_response_status(response).await?;
        let token: TokenResponse = response.json().await.map_err(|e| {
            ToolError::authentication(format!("Failed to parse token response: {}", e), None)
        })?;
        token.into_credentials()
    }

    fn translate_reqwest_error(&self, error: reqwest::Error) -> ToolError {
        if error.is_timeout() {
            ToolError::network(format!(
                "Request to {} timed out after {} seconds",
                self.registry_url, self.timeout_seconds
            ))
        } else if error.is_connect() {
            ToolError::network_with_source(
                format!("Failed to connect to registry at {}", self.registry_url),
                error,
            )
        } else {
            ToolError::network_with_source(
                format!("Network error communicating with {}", self.registry_url),
                error,
            )
        }
    }

    /// Maps non-success statuses onto the error taxonomy.
    async fn check_response_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let retry_after = header_str(&response, RETRY_AFTER.as_str())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("(unable to read response body)"));

        match status {
            StatusCode::UNAUTHORIZED => Err(ToolError::authentication(
                format!("Authentication required for {}: {}", url, error_body),
                Some(401),
            )),
            StatusCode::FORBIDDEN => Err(ToolError::authentication(
                format!("Access forbidden for {}: {}", url, error_body),
                Some(403),
            )),
            StatusCode::NOT_FOUND => Err(ToolError::not_found("resource".to_string(), url)),
            StatusCode::TOO_MANY_REQUESTS => Err(ToolError::rate_limit(
                format!("Rate limit exceeded for {}", url),
                retry_after,
            )),
            s if s.is_server_error() => Err(ToolError::server(
                format!("Server error from {}: {}", url, error_body),
                status.as_u16(),
            )),
            _ => Err(ToolError::network(format!(
                "HTTP {} from {}: {}",
                status.as_u16(),
                url,
                error_body
            ))),
        }
    }
}

fn header_str(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

fn media_type_from_body(bytes: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    value.get("mediaType")?.as_str().map(String::from)
}
