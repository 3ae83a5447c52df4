//! Credentials from a Docker `config.json`.
//!
//! Only inline credentials under `auths` are read. Credential helpers
//! (`credsStore`, `credHelpers`) are not executed.

use crate::auth::Credentials;
use crate::error::{Result, ToolError};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[cfg(test)]
#[path = "docker_config_tests.rs"]
mod tests;

/// Name the Docker CLI stores Docker Hub credentials under, after normalisation.
const DOCKER_HUB_AUTH_HOST: &str = "index.docker.io";

#[derive(Debug, Default, Deserialize)]
struct DockerConfig {
    #[serde(default)]
    auths: HashMap<String, AuthEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthEntry {
    #[serde(default)]
    auth: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

/// Looks up credentials for `registry` in the config file at `path`.
///
/// A missing file yields `Ok(None)`; an unreadable or malformed one is a
/// configuration error.
pub fn lookup(path: &Path, registry: &str) -> Result<Option<Credentials>> {
    if !path.exists() {
        debug!(path = %path.display(), "No docker config file, using anonymous access");
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ToolError::config_with_source("Failed to read docker config file", path.to_str(), e)
    })?;
    let config: DockerConfig = serde_json::from_str(&contents).map_err(|e| {
        ToolError::config_with_source("Failed to parse docker config file", path.to_str(), e)
    })?;

    let wanted = auth_host(registry);
    let Some(entry) = config
        .auths
        .iter()
        .find(|(key, _)| auth_host(key) == wanted)
        .map(|(_, entry)| entry)
    else {
        debug!(registry, "No docker config credentials for registry");
        return Ok(None);
    };

    let credentials = decode_entry(entry)
        .map_err(|e| ToolError::config(e.to_string(), path.to_str().map(String::from)))?;
    if credentials.is_some() {
        debug!(registry, "Using docker config credentials");
    }
    Ok(credentials)
}

fn decode_entry(entry: &AuthEntry) -> Result<Option<Credentials>> {
    if let Some(auth) = entry.auth.as_deref().filter(|a| !a.is_empty()) {
        use base64::{Engine as _, engine::general_purpose};
        let decoded = general_purpose::STANDARD
            .decode(auth)
            .map_err(|e| ToolError::validation_with_source("Invalid docker config auth value", e))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|e| ToolError::validation_with_source("Invalid docker config auth encoding", e))?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| ToolError::validation("docker config auth value is not user:password"))?;
        return Ok(Some(Credentials::basic(username, password)));
    }

    match (&entry.username, &entry.password) {
        (Some(username), Some(password)) if !username.is_empty() => {
            Ok(Some(Credentials::basic(username.as_str(), password.as_str())))
        }
        _ => Ok(None),
    }
}

/// Reduces an `auths` key or registry name to a bare host, folding Docker Hub aliases.
fn auth_host(name: &str) -> String {
    let name = name
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let host = name.split('/').next().unwrap_or(name);
    match host {
        "docker.io" | "index.docker.io" | "registry-1.docker.io" => DOCKER_HUB_AUTH_HOST.to_string(),
        other => other.to_string(),
    }
}
