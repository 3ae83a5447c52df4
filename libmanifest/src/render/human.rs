use super::Palette;
use crate::attestation::{Classification, Summary, classify, pluralize};
use crate::error::Result;
use crate::oci::{
    Descriptor, ImageConfig, ImageIndex, ImageManifest, PlatformDetails, media_type_of,
};
use crate::resolve::{Resolved, ResolvedEntry, resolve_entry};
use crate::store::MemoryStore;
use std::io::Write;
use tracing::warn;

#[cfg(test)]
#[path = "human_tests.rs"]
mod tests;

const ATTESTATION_DETAIL: &str = " (vnd.docker.reference.type=attestation-manifest)";

/// Writes the human-readable view of a resolved root.
///
/// For an index the name and digest lines are written first; the entry
/// blocks are collected and only written once every entry has resolved, so
/// a failing entry leaves just those two lines on `out`.
pub fn render_human<W: Write>(
    name: &str,
    resolved: &Resolved,
    store: &MemoryStore,
    palette: &Palette,
    out: &mut W,
) -> Result<()> {
    match resolved {
        Resolved::Image {
            descriptor,
            manifest,
            config,
        } => write_image(name, descriptor, manifest, config, palette, out),
        Resolved::Index {
            descriptor,
            index,
            platforms,
        } => write_index(name, descriptor, index, platforms, store, palette, out),
    }
}

fn write_image<W: Write>(
    name: &str,
    descriptor: &Descriptor,
    manifest: &ImageManifest,
    config: &ImageConfig,
    palette: &Palette,
    out: &mut W,
) -> Result<()> {
    writeln!(
        out,
        "Name: {} (Type: {})",
        palette.kind(name),
        palette.kind(media_type_of(descriptor))
    )?;
    writeln!(out, "      Digest: {}", palette.digest(descriptor.digest()))?;
    writeln!(out, "        Size: {}", palette.size(descriptor.size()))?;
    writeln!(out, "          OS: {}", palette.kind(&config.os))?;
    writeln!(out, "        Arch: {}", palette.kind(&config.architecture))?;
    writeln!(out, "    # Layers: {}", palette.count(manifest.layers().len()))?;
    for (i, layer) in manifest.layers().iter().enumerate() {
        writeln!(
            out,
            "      layer {}: digest = {}",
            palette.count(format!("{:02}", i + 1)),
            palette.digest(layer.digest())
        )?;
    }
    Ok(())
}

fn write_index<W: Write>(
    name: &str,
    descriptor: &Descriptor,
    index: &ImageIndex,
    platforms: &[PlatformDetails],
    store: &MemoryStore,
    palette: &Palette,
    out: &mut W,
) -> Result<()> {
    writeln!(
        out,
        "Name:   {} (Type: {})",
        palette.kind(name),
        palette.kind(media_type_of(descriptor))
    )?;
    writeln!(out, "Digest: {}", palette.digest(descriptor.digest()))?;

    let mut entries = Vec::new();
    for (i, entry) in index.manifests().iter().enumerate() {
        let details = platforms.get(i).cloned().unwrap_or_default();
        write_entry(i + 1, entry, &details, store, palette, &mut entries)?;
    }

    let summary = Summary::of(index);
    writeln!(
        out,
        " * Contains {} manifest references ({} {}, {} {}):",
        palette.count(summary.total),
        palette.count(summary.images),
        pluralize(summary.images, "image", "images"),
        palette.count(summary.attestations),
        pluralize(summary.attestations, "attestation", "attestations"),
    )?;
    out.write_all(&entries)?;
    Ok(())
}

fn write_entry<W: Write>(
    n: usize,
    entry: &Descriptor,
    details: &PlatformDetails,
    store: &MemoryStore,
    palette: &Palette,
    out: &mut W,
) -> Result<()> {
    let classification = classify(entry);
    let media_type = media_type_of(entry);
    let detail = if classification.is_attestation() {
        ATTESTATION_DETAIL
    } else {
        ""
    };
    writeln!(
        out,
        "[{n}]     Type: {}",
        palette.kind(format!("{}{}", media_type, detail))
    )?;
    writeln!(out, "[{n}]   Digest: {}", palette.digest(entry.digest()))?;
    writeln!(out, "[{n}]   Length: {}", palette.size(entry.size()))?;

    let manifest = match resolve_entry(entry, store)? {
        ResolvedEntry::Manifest(manifest) => manifest,
        ResolvedEntry::Unsupported(media_type) => {
            warn!(digest = %entry.digest(), %media_type, "Skipping index entry");
            writeln!(out, "Unknown media type for further display: {}", media_type)?;
            return Ok(());
        }
    };

    if let Classification::Attestation { attests } = classification {
        writeln!(
            out,
            "[{n}]       >>> Attestation for digest: {}\n",
            palette.digest(attests.unwrap_or_default())
        )?;
        return Ok(());
    }

    writeln!(out, "[{n}] Platform:")?;
    match entry.platform() {
        Some(platform) => {
            writeln!(out, "[{n}]    -      OS: {}", palette.kind(platform.os()))?;
            let os_version = details.os_version.as_ref().or(platform.os_version().as_ref());
            if let Some(version) = os_version.filter(|v| !v.is_empty()) {
                writeln!(out, "[{n}]    - OS Vers: {}", palette.kind(version))?;
            }
            let os_features = details.os_features.as_ref().or(platform.os_features().as_ref());
            if let Some(features) = os_features.filter(|f| !f.is_empty()) {
                writeln!(
                    out,
                    "[{n}]    - OS Feat: {}",
                    palette.kind(format!("[{}]", features.join(" ")))
                )?;
            }
            writeln!(
                out,
                "[{n}]    -    Arch: {}",
                palette.kind(platform.architecture())
            )?;
            if let Some(variant) = platform.variant().as_deref().filter(|v| !v.is_empty()) {
                writeln!(out, "[{n}]    - Variant: {}", palette.kind(variant))?;
            }
        }
        None => writeln!(out, "[{n}]    - (not specified)")?,
    }

    writeln!(out, "[{n}] # Layers: {}", palette.count(manifest.layers().len()))?;
    for (j, layer) in manifest.layers().iter().enumerate() {
        writeln!(
            out,
            "     layer {}: digest = {}",
            palette.count(format!("{:02}", j + 1)),
            palette.digest(layer.digest())
        )?;
        writeln!(
            out,
            "                 type = {}",
            palette.kind(media_type_of(layer))
        )?;
    }
    writeln!(out)?;
    Ok(())
}
