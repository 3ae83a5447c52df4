//! Rendering of resolved manifests.
//!
//! Two output modes share one resolved graph: a line-oriented human view and
//! a pretty-printed JSON document. Colour is a decoration applied through a
//! [`Palette`] value passed by the caller.

use crate::error::{Result, ToolError};
use owo_colors::OwoColorize;
use std::fmt::Display;

mod human;
mod raw;

pub use human::render_human;
pub use raw::render_raw;

#[cfg(test)]
mod tests;

/// Output mode selected by the `--raw` and `--expand-config` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Human,
    Raw { expand_config: bool },
}

impl RenderMode {
    /// Builds a mode from the two command-line flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifest::render::RenderMode;
    ///
    /// assert_eq!(RenderMode::from_flags(false, false).unwrap(), RenderMode::Human);
    /// assert!(RenderMode::from_flags(false, true).is_err());
    /// ```
    pub fn from_flags(raw: bool, expand_config: bool) -> Result<Self> {
        match (raw, expand_config) {
            (false, true) => Err(ToolError::validation(
                "the --expand-config flag is only valid when used with --raw",
            )),
            (false, false) => Ok(RenderMode::Human),
            (true, expand_config) => Ok(RenderMode::Raw { expand_config }),
        }
    }
}

/// Colours used by the human renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A palette that leaves text untouched.
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Names and media types.
    pub fn kind<D: Display>(&self, text: D) -> String {
        if self.enabled {
            text.green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn digest<D: Display>(&self, text: D) -> String {
        if self.enabled {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn size<D: Display>(&self, text: D) -> String {
        if self.enabled {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Counts and layer numbers.
    pub fn count<D: Display>(&self, text: D) -> String {
        if self.enabled {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }
}
