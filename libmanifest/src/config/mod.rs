//! Application configuration.
//!
//! Configuration is read from an optional YAML file layered over built-in
//! defaults. Every field may be omitted.
//!
//! ```yaml
//! output:
//!   color: never
//! network:
//!   timeout: 60
//!   insecure: false
//!   plain_http: true
//! docker_cfg: /home/user/.docker
//! ```

use crate::error::{Result, ToolError};
use config::{Config as ConfigRs, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;


/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub network: Network,
    /// Directory or file holding Docker registry credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_cfg: Option<String>,
}

impl Config {
    /// Parses a `Config` from a YAML string layered over the defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifest::Config;
    ///
    /// let config = Config::from_yaml_str("network:\n  timeout: 5\n").unwrap();
    /// assert_eq!(config.network.timeout, 5);
    /// assert!(!config.network.plain_http);
    /// ```
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from_str(s, FileFormat::Yaml));
        Self::from_builder(builder)
    }

    /// Loads a `Config`, layering the file at `path` over the defaults.
    ///
    /// A given path must exist; without one the defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults()?;
        if let Some(p) = path {
            builder = builder.add_source(File::from(p).format(FileFormat::Yaml).required(true));
        }
        Self::from_builder(builder)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = ConfigRs::try_from(&Config::default()).map_err(|e| {
            ToolError::config_with_source("Failed to build default configuration", None, e)
        })?;
        Ok(ConfigRs::builder().add_source(defaults))
    }

    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                ToolError::config_with_source("Failed to deserialize configuration", None, e)
            })
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Output {
    #[serde(default)]
    pub color: ColorChoice,
}

/// When to colourise human-readable output.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,

    Always,

    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(ToolError::validation(format!(
                "Invalid color choice '{}': expected auto, always or never",
                other
            ))),
        }
    }
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    /// Request timeout in seconds
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default)]
    pub plain_http: bool,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
            insecure: false,
            plain_http: false,
        }
    }
}

fn default_network_timeout() -> u64 {
    30
}
