//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables
//! 4. CLI flags
//!
//! Once built, the context is passed as read-only throughout the application.

use libmanifest::{ColorChoice, Config, HostOptions, Result, ToolError};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up inside a Docker config directory
const DOCKER_CONFIG_FILE: &str = "config.json";

/// Logging level selected by `-v` and `--debug`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    Normal,
    Verbose,
    Debug,
    Trace,
}

impl VerbosityLevel {
    /// Maps the repeat count of `-v` and the `--debug` switch to a level.
    pub fn from_flags(count: u8, debug: bool) -> Self {
        let level = match count {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::Debug,
            _ => Self::Trace,
        };
        if debug { level.max(Self::Debug) } else { level }
    }

    /// Filter directives for `tracing_subscriber::EnvFilter`.
    ///
    /// HTTP transport crates stay at `warn` whatever the level.
    pub fn filter_directives(&self) -> String {
        let level = match self {
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        format!("{},hyper=warn,reqwest=warn,h2=warn", level)
    }
}

/// Values taken from the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub color: Option<String>,
    pub config: Option<PathBuf>,
    pub insecure: bool,
    pub plain_http: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub docker_cfg: Option<PathBuf>,
}

/// Application context with resolved configuration and runtime state
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved color choice for stdout
    pub color: ColorChoice,
    /// Connection options for the registry
    pub host: HostOptions,
    /// Logging level, used to keep progress output out of debug logs
    pub verbosity: VerbosityLevel,
}

impl AppContext {
    /// Build context with precedence: defaults > config file > env vars > CLI flags
    pub fn build(overrides: CliOverrides, verbosity: VerbosityLevel) -> Result<Self> {
        let mut ctx = Self::resolve(overrides, verbosity, |key| env::var(key).ok())?;
        let needs_password = ctx.host.username.is_some() && ctx.host.password.is_none();
        if needs_password && std::io::stdin().is_terminal() {
            ctx.host.password = Some(rpassword::prompt_password("Password: ")?);
        }
        Ok(ctx)
    }

    /// Resolves the context against the environment lookup `env`.
    ///
    /// Never prompts; a username without a password stays password-less.
    pub fn resolve<F>(overrides: CliOverrides, verbosity: VerbosityLevel, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 1-2. Defaults layered with the config file, if any
        let config_path = overrides.config.clone().or_else(default_config_path);
        let explicit_config = overrides.config.is_some();
        let config = match config_path {
            Some(path) if explicit_config || path.is_file() => {
                debug!("Loading configuration from {}", path.display());
                Config::load(Some(path.as_path()))?
            }
            _ => Config::load(None)?,
        };

        // 3. Environment variable overrides
        let mut color = config.output.color;
        if let Some(value) = env("MANIFEST_TOOL_COLOR") {
            color = value.parse()?;
        } else if env("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            color = ColorChoice::Never;
        }

        // 4. CLI flag overrides (highest priority)
        if let Some(value) = overrides.color.as_deref() {
            color = value.parse()?;
        }

        let docker_cfg = resolve_docker_cfg(
            overrides
                .docker_cfg
                .or_else(|| config.docker_cfg.as_ref().map(PathBuf::from)),
        )?;

        // A password alone is meaningless
        let username = overrides.username.filter(|u| !u.is_empty());
        let password = username.as_ref().and(overrides.password);

        let host = HostOptions {
            username,
            password,
            insecure: overrides.insecure || config.network.insecure,
            plain_http: overrides.plain_http || config.network.plain_http,
            docker_cfg,
            timeout_seconds: config.network.timeout,
        };

        Ok(Self {
            color,
            host,
            verbosity,
        })
    }
}

/// Default configuration file location: `<config dir>/manifest-tool/config.yaml`
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("manifest-tool").join("config.yaml"))
}

/// Resolves the Docker credentials file.
///
/// An explicit path must exist; a directory gets `config.json` appended.
/// Without one `~/.docker/config.json` is used when a home directory is known.
fn resolve_docker_cfg(explicit: Option<PathBuf>) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ToolError::config(
                    "Docker config path does not exist".to_string(),
                    Some(path.display().to_string()),
                ));
            }
            Ok(Some(config_file_in(&path)))
        }
        None => Ok(dirs::home_dir().map(|home| home.join(".docker").join(DOCKER_CONFIG_FILE))),
    }
}

fn config_file_in(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DOCKER_CONFIG_FILE)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
