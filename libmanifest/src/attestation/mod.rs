//! Attestation manifest classification.
//!
//! BuildKit stores provenance and SBOM attestations in an image index next to
//! the platform images. Such entries carry a reference-type annotation and
//! point at the digest of the image they describe.

use crate::oci::{Descriptor, ImageIndex};


/// Annotation key naming the kind of reference an index entry is.
pub const REFERENCE_TYPE_ANNOTATION: &str = "vnd.docker.reference.type";
/// Annotation key naming the digest an attestation describes.
pub const REFERENCE_DIGEST_ANNOTATION: &str = "vnd.docker.reference.digest";
/// Reference type value marking an attestation manifest.
pub const ATTESTATION_MANIFEST: &str = "attestation-manifest";

/// What an index entry represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A runnable platform image
    Image,
    /// An attestation for another entry
    Attestation { attests: Option<String> },
}

impl Classification {
    pub fn is_attestation(&self) -> bool {
        matches!(self, Classification::Attestation { .. })
    }
}

/// Classifies one index entry by its annotations.
///
/// # Examples
///
/// ```
/// use libmanifest::attestation::{classify, Classification};
///
/// let entry: libmanifest::oci::Descriptor = serde_json::from_str(r#"{
///     "mediaType": "application/vnd.oci.image.manifest.v1+json",
///     "digest": "sha256:5b0bcabd1ed22e9fb1310cf6c2dec7cdef19f0ad69efa1f392e94a4333501270",
///     "size": 566
/// }"#).unwrap();
/// assert_eq!(classify(&entry), Classification::Image);
/// ```
pub fn classify(descriptor: &Descriptor) -> Classification {
    let Some(annotations) = descriptor.annotations() else {
        return Classification::Image;
    };
    match annotations.get(REFERENCE_TYPE_ANNOTATION) {
        Some(kind) if kind == ATTESTATION_MANIFEST => Classification::Attestation {
            attests: annotations.get(REFERENCE_DIGEST_ANNOTATION).cloned(),
        },
        _ => Classification::Image,
    }
}

/// Entry counts for an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub images: usize,
    pub attestations: usize,
}

impl Summary {
    pub fn of(index: &ImageIndex) -> Self {
        let total = index.manifests().len();
        let attestations = index
            .manifests()
            .iter()
            .filter(|entry| classify(entry).is_attestation())
            .count();
        Summary {
            total,
            images: total - attestations,
            attestations,
        }
    }
}

/// Picks the singular label for exactly one, the plural label otherwise.
pub fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}
