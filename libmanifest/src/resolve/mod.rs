//! Manifest resolution.
//!
//! Turns a root descriptor whose content is already in the store into a typed
//! object graph. An index resolves to its entry list only; entries are
//! resolved one at a time by the caller through [`resolve_entry`], and their
//! configs and layers are never dereferenced.

use crate::error::{Result, ToolError};
use crate::oci::{
    self, Descriptor, ImageConfig, ImageIndex, ImageManifest, MediaKind, PlatformDetails,
    decode_config, decode_index, decode_manifest, decode_platform_details,
};
use crate::store::MemoryStore;
use tracing::debug;


/// A resolved root descriptor.
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum Resolved {
    /// A multi-platform index
    Index {
        descriptor: Descriptor,
        index: ImageIndex,
        /// Wire-named platform fields, one per entry of `index`
        platforms: Vec<PlatformDetails>,
    },
    /// A single-platform image with its decoded config
    Image {
        descriptor: Descriptor,
        manifest: ImageManifest,
        config: ImageConfig,
    },
}

impl Resolved {
    /// Returns the root descriptor.
    pub fn descriptor(&self) -> &Descriptor {
        match self {
            Resolved::Index { descriptor, .. } | Resolved::Image { descriptor, .. } => descriptor,
        }
    }
}

/// A resolved index entry.
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum ResolvedEntry {
    /// A single-platform manifest
    Manifest(ImageManifest),
    /// An entry this tool does not descend into, with its media type
    Unsupported(String),
}

/// Resolves the root descriptor of an inspection.
///
/// Fails with [`ToolError::UnknownMediaType`] for anything that is neither an
/// index nor a manifest, and with `NotFound` or `Decode` when the root, or an
/// image's config, is missing from the store or malformed.
pub fn resolve_root(descriptor: &Descriptor, store: &MemoryStore) -> Result<Resolved> {
    match MediaKind::of(descriptor) {
        MediaKind::Index => {
            let content = store.get(descriptor)?;
            let index = decode_index(&content.bytes)?;
            let platforms = decode_platform_details(&content.bytes)?;
            debug!(
                digest = %descriptor.digest(),
                entries = index.manifests().len(),
                "Resolved image index"
            );
            Ok(Resolved::Index {
                descriptor: descriptor.clone(),
                index,
                platforms,
            })
        }
        MediaKind::Manifest => {
            let content = store.get(descriptor)?;
            let manifest = decode_manifest(&content.bytes)?;
            let config_content = store.get(manifest.config())?;
            let config = decode_config(&config_content.bytes)?;
            debug!(
                digest = %descriptor.digest(),
                layers = manifest.layers().len(),
                "Resolved image manifest"
            );
            Ok(Resolved::Image {
                descriptor: descriptor.clone(),
                manifest,
                config,
            })
        }
        MediaKind::Unknown(media_type) => Err(ToolError::unknown_media_type(media_type)),
    }
}

/// Resolves one index entry.
///
/// Entries that are not single-platform manifests come back as
/// [`ResolvedEntry::Unsupported`] without touching the store.
pub fn resolve_entry(descriptor: &Descriptor, store: &MemoryStore) -> Result<ResolvedEntry> {
    match MediaKind::of(descriptor) {
        MediaKind::Manifest => {
            let content = store.get(descriptor)?;
            Ok(ResolvedEntry::Manifest(decode_manifest(&content.bytes)?))
        }
        MediaKind::Index | MediaKind::Unknown(_) => {
            Ok(ResolvedEntry::Unsupported(oci::media_type_of(descriptor)))
        }
    }
}
