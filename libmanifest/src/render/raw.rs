use crate::error::{Result, ToolError};
use crate::oci::{Descriptor, ImageConfig, ImageManifest};
use crate::resolve::{Resolved, ResolvedEntry, resolve_entry};
use crate::store::MemoryStore;
use oci_spec::image::MediaType;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::{BTreeMap, HashMap};

#[cfg(test)]
#[path = "raw_tests.rs"]
mod tests;

/// An index with every entry replaced by its decoded manifest.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexDocument<'a> {
    name: &'a str,
    digest: String,
    schema_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_type: Option<&'a MediaType>,
    manifests: Vec<ManifestFields<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotations: Option<BTreeMap<&'a str, &'a str>>,
}

/// The fields of a manifest, in document order with sorted annotations.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestFields<'a> {
    schema_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_type: Option<&'a MediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact_type: Option<&'a MediaType>,
    config: &'a Descriptor,
    layers: &'a [Descriptor],
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a Descriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotations: Option<BTreeMap<&'a str, &'a str>>,
}

impl<'a> ManifestFields<'a> {
    fn of(manifest: &'a ImageManifest) -> Self {
        ManifestFields {
            schema_version: manifest.schema_version(),
            media_type: manifest.media_type().as_ref(),
            artifact_type: manifest.artifact_type().as_ref(),
            config: manifest.config(),
            layers: manifest.layers(),
            subject: manifest.subject().as_ref(),
            annotations: sorted(manifest.annotations()),
        }
    }
}

#[derive(Serialize)]
struct ImageDocument<'a> {
    name: &'a str,
    digest: String,
    #[serde(skip_serializing_if = "str::is_empty")]
    os: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    architecture: &'a str,
    #[serde(flatten)]
    manifest: ManifestFields<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExpandedImageDocument<'a> {
    schema_version: u32,
    name: &'a str,
    digest: String,
    #[serde(skip_serializing_if = "str::is_empty")]
    os: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    architecture: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_type: Option<&'a MediaType>,
    config: &'a ImageConfig,
    layers: &'a [Descriptor],
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a Descriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotations: Option<BTreeMap<&'a str, &'a str>>,
}

/// Renders the JSON document for a resolved root.
///
/// Every index entry must decode as a manifest; the first one that does not
/// fails the whole document. Nothing is returned on failure, so callers never
/// see partial JSON.
pub fn render_raw(
    name: &str,
    resolved: &Resolved,
    store: &MemoryStore,
    expand_config: bool,
) -> Result<String> {
    match resolved {
        Resolved::Index {
            descriptor,
            index,
            ..
        } => {
            let manifests = index
                .manifests()
                .iter()
                .map(|entry| -> Result<ImageManifest> {
                    match resolve_entry(entry, store)? {
                        ResolvedEntry::Manifest(manifest) => Ok(manifest),
                        ResolvedEntry::Unsupported(media_type) => {
                            Err(ToolError::unknown_media_type(media_type))
                        }
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            let document = IndexDocument {
                name,
                digest: descriptor.digest().to_string(),
                schema_version: index.schema_version(),
                media_type: index.media_type().as_ref(),
                manifests: manifests.iter().map(ManifestFields::of).collect(),
                annotations: sorted(index.annotations()),
            };
            to_pretty_json(&document)
        }
        Resolved::Image {
            descriptor,
            manifest,
            config,
        } if expand_config => to_pretty_json(&ExpandedImageDocument {
            schema_version: manifest.schema_version(),
            name,
            digest: descriptor.digest().to_string(),
            os: &config.os,
            architecture: &config.architecture,
            media_type: manifest.media_type().as_ref(),
            config,
            layers: manifest.layers(),
            subject: manifest.subject().as_ref(),
            annotations: sorted(manifest.annotations()),
        }),
        Resolved::Image {
            descriptor,
            manifest,
            config,
        } => to_pretty_json(&ImageDocument {
            name,
            digest: descriptor.digest().to_string(),
            os: &config.os,
            architecture: &config.architecture,
            manifest: ManifestFields::of(manifest),
        }),
    }
}

fn sorted(annotations: &Option<HashMap<String, String>>) -> Option<BTreeMap<&str, &str>> {
    annotations.as_ref().filter(|map| !map.is_empty()).map(|map| {
        map.iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    })
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|e| ToolError::encode("raw output", e))?;
    String::from_utf8(buf)
        .map_err(|e| ToolError::validation_with_source("raw output is not valid UTF-8", e))
}
