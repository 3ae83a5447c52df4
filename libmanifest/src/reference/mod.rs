//! OCI Image Reference parsing.
//!
//! This module wraps `oci_spec::distribution::Reference` to integrate with the
//! crate's error handling. Inspection only ever operates on tagged
//! references, so [`Reference::parse_tagged`] refuses names whose tag would
//! otherwise be defaulted.

use crate::error::{Result, ToolError};
use oci_spec::distribution::Reference as OciReference;
use std::fmt;
use std::str::FromStr;

#[cfg(test)]
mod tests;

/// Represents an OCI image reference, wrapping `oci_spec::distribution::Reference`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    inner: OciReference,
    original: String,
}

impl FromStr for Reference {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        let inner = OciReference::from_str(s).map_err(|e| ToolError::Validation {
            message: format!("Invalid image reference: {}", e),
            source: Some(Box::new(e)),
        })?;
        Ok(Reference {
            inner,
            original: s.to_string(),
        })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl Reference {
    /// Parses a reference that must carry an explicit tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifest::Reference;
    ///
    /// assert!(Reference::parse_tagged("example.com/app:v1").is_ok());
    /// assert!(Reference::parse_tagged("example.com/app").is_err());
    /// ```
    pub fn parse_tagged(s: &str) -> Result<Self> {
        let reference = Self::from_str(s)?;
        if !has_explicit_tag(s) {
            return Err(ToolError::validation(
                "image reference must include a tag; a default of 'latest' is never assumed",
            ));
        }
        Ok(reference)
    }

    /// Returns the registry part of the reference.
    pub fn registry(&self) -> &str {
        self.inner.registry()
    }

    /// Returns the repository part of the reference.
    pub fn repository(&self) -> &str {
        self.inner.repository()
    }

    /// Returns the tag part of the reference, if present.
    pub fn tag(&self) -> Option<&str> {
        self.inner.tag()
    }

    /// Returns the digest part of the reference, if present.
    pub fn digest(&self) -> Option<&str> {
        self.inner.digest()
    }

    /// Returns the reference exactly as it was given.
    pub fn original(&self) -> &str {
        &self.original
    }
}

/// A tag lives in the last path component; a `host:port` prefix is not one.
fn has_explicit_tag(s: &str) -> bool {
    let name = s.split('@').next().unwrap_or(s);
    let last = name.rsplit('/').next().unwrap_or(name);
    last.contains(':')
}
