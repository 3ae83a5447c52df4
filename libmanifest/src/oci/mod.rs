//! OCI specification data structures.
//!
//! This module re-exports the descriptor, index and manifest types from the
//! `oci-spec` crate and adds the pieces inspection needs on top of them: a
//! closed classification of media types and a permissive image config.

pub use oci_spec::image::{Descriptor, ImageIndex, ImageManifest, Platform};

use crate::error::{Result, ToolError};
use serde::{Deserialize, Serialize};


/// OCI image index media type.
pub const MEDIA_TYPE_OCI_INDEX: &str = "application/vnd.oci.image.index.v1+json";
/// Docker manifest list media type.
pub const MEDIA_TYPE_DOCKER_MANIFEST_LIST: &str =
    "application/vnd.docker.distribution.manifest.list.v2+json";
/// OCI image manifest media type.
pub const MEDIA_TYPE_OCI_MANIFEST: &str = "application/vnd.oci.image.manifest.v1+json";
/// Docker schema2 manifest media type.
pub const MEDIA_TYPE_DOCKER_MANIFEST: &str =
    "application/vnd.docker.distribution.manifest.v2+json";

/// The kinds of content inspection knows how to walk.
///
/// # Examples
///
/// ```
/// use libmanifest::oci::MediaKind;
///
/// assert_eq!(
///     MediaKind::classify("application/vnd.oci.image.index.v1+json"),
///     MediaKind::Index
/// );
/// assert!(matches!(
///     MediaKind::classify("application/vnd.in-toto+json"),
///     MediaKind::Unknown(_)
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    /// A multi-platform image index or Docker manifest list
    Index,
    /// A single-platform image manifest
    Manifest,
    /// Anything else, carrying the raw media type
    Unknown(String),
}

impl MediaKind {
    /// Classifies a media type string.
    pub fn classify(media_type: &str) -> Self {
        match media_type {
            MEDIA_TYPE_OCI_INDEX | MEDIA_TYPE_DOCKER_MANIFEST_LIST => MediaKind::Index,
            MEDIA_TYPE_OCI_MANIFEST | MEDIA_TYPE_DOCKER_MANIFEST => MediaKind::Manifest,
            other => MediaKind::Unknown(other.to_string()),
        }
    }

    /// Classifies the media type of a descriptor.
    pub fn of(descriptor: &Descriptor) -> Self {
        Self::classify(&media_type_of(descriptor))
    }
}

/// Returns the media type of a descriptor as a plain string.
pub fn media_type_of(descriptor: &Descriptor) -> String {
    descriptor.media_type().to_string()
}

/// Decoded image configuration.
///
/// Only `os` and `architecture` are interpreted; every other field is kept
/// as-is so the full document can be re-emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub architecture: String,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// Optional platform fields of an index entry, under their wire names.
///
/// `oci_spec::image::Platform` reads these as `os_version` and `os_features`,
/// so registry content written as `os.version` and `os.features` is picked up
/// here instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlatformDetails {
    #[serde(rename = "os.version", default)]
    pub os_version: Option<String>,
    #[serde(rename = "os.features", default)]
    pub os_features: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct IndexPlatforms {
    #[serde(default)]
    manifests: Vec<EntryPlatform>,
}

#[derive(Deserialize)]
struct EntryPlatform {
    #[serde(default)]
    platform: Option<PlatformDetails>,
}

/// Decodes the platform details of every entry of an image index, in entry
/// order. Entries without a platform get empty details.
pub fn decode_platform_details(bytes: &[u8]) -> Result<Vec<PlatformDetails>> {
    let index: IndexPlatforms =
        serde_json::from_slice(bytes).map_err(|e| ToolError::decode("image index", e))?;
    Ok(index
        .manifests
        .into_iter()
        .map(|entry| entry.platform.unwrap_or_default())
        .collect())
}

/// Decodes bytes as an image index.
pub fn decode_index(bytes: &[u8]) -> Result<ImageIndex> {
    serde_json::from_slice(bytes).map_err(|e| ToolError::decode("image index", e))
}

/// Decodes bytes as an image manifest.
pub fn decode_manifest(bytes: &[u8]) -> Result<ImageManifest> {
    serde_json::from_slice(bytes).map_err(|e| ToolError::decode("image manifest", e))
}

/// Decodes bytes as an image config.
pub fn decode_config(bytes: &[u8]) -> Result<ImageConfig> {
    serde_json::from_slice(bytes).map_err(|e| ToolError::decode("image config", e))
}
