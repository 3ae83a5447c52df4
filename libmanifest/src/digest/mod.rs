//! OCI Content Digest validation and computation.
//!
//! This module wraps `oci_spec::image::Digest` to integrate with the crate's
//! error handling, and computes the sha256 digests used as content store keys.

use crate::error::{Result, ToolError};
use oci_spec::image::Digest as OciDigest;
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::str::FromStr;

#[cfg(test)]
mod tests;

/// Represents a content digest, wrapping the `oci_spec::image::Digest` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest(OciDigest);

impl FromStr for Digest {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        let oci_digest = OciDigest::from_str(s).map_err(|e| ToolError::Validation {
            message: format!("Invalid digest format: {}", e),
            source: Some(Box::new(e)),
        })?;
        Ok(Digest(oci_digest))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<OciDigest> for Digest {
    fn from(digest: OciDigest) -> Self {
        Digest(digest)
    }
}

impl Digest {
    /// Computes the canonical `sha256:<hex>` digest of `bytes`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifest::Digest;
    ///
    /// let digest = Digest::sha256_of(b"").unwrap();
    /// assert_eq!(
    ///     digest.to_string(),
    ///     "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    /// );
    /// ```
    pub fn sha256_of(bytes: &[u8]) -> Result<Self> {
        let hex = format!("{:x}", Sha256::digest(bytes));
        Self::from_str(&format!("sha256:{}", hex))
    }

    /// Returns the algorithm part of the digest (e.g. `sha256`).
    pub fn algorithm(&self) -> String {
        let rendered = self.0.to_string();
        match rendered.split_once(':') {
            Some((algorithm, _)) => algorithm.to_string(),
            None => rendered,
        }
    }

    /// Returns the encoded hash part of the digest.
    pub fn hex(&self) -> String {
        let rendered = self.0.to_string();
        match rendered.split_once(':') {
            Some((_, hex)) => hex.to_string(),
            None => String::new(),
        }
    }

    /// Returns the wrapped `oci-spec` digest.
    pub fn as_oci(&self) -> &OciDigest {
        &self.0
    }
}
