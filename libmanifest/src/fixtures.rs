//! Content graphs shared by the resolve, render and inspect tests.

use crate::attestation::{ATTESTATION_MANIFEST, REFERENCE_DIGEST_ANNOTATION, REFERENCE_TYPE_ANNOTATION};
use crate::oci::{Descriptor, MEDIA_TYPE_OCI_INDEX, MEDIA_TYPE_OCI_MANIFEST};
use crate::store::MemoryStore;
use serde_json::{Value, json};

pub const LAYER_A: &str = "sha256:aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const LAYER_B: &str = "sha256:cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc";
pub const ATTESTED: &str = "sha256:bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const LAYER_TYPE: &str = "application/vnd.oci.image.layer.v1.tar+gzip";

/// Puts `value` serialized as JSON and returns a descriptor for it.
pub fn put_json(store: &MemoryStore, value: &Value, media_type: &str) -> Descriptor {
    let bytes = serde_json::to_vec(value).unwrap();
    let size = bytes.len();
    let digest = store.put(bytes, media_type).unwrap();
    descriptor(media_type, &digest.to_string(), size, None)
}

pub fn descriptor(media_type: &str, digest: &str, size: usize, extra: Option<Value>) -> Descriptor {
    let mut value = json!({ "mediaType": media_type, "digest": digest, "size": size });
    if let Some(Value::Object(extra)) = extra {
        for (key, field) in extra {
            value[key] = field;
        }
    }
    serde_json::from_value(value).unwrap()
}

/// Stores a config and a manifest referencing it, returning the manifest descriptor.
pub fn put_image(store: &MemoryStore, os: &str, arch: &str, layers: &[&str]) -> Descriptor {
    let config = put_json(
        store,
        &json!({ "os": os, "architecture": arch, "rootfs": { "type": "layers", "diff_ids": [] } }),
        "application/vnd.oci.image.config.v1+json",
    );
    let layers: Vec<Value> = layers
        .iter()
        .map(|digest| json!({ "mediaType": LAYER_TYPE, "digest": digest, "size": 1024 }))
        .collect();
    put_json(
        store,
        &json!({
            "schemaVersion": 2,
            "mediaType": MEDIA_TYPE_OCI_MANIFEST,
            "config": config,
            "layers": layers
        }),
        MEDIA_TYPE_OCI_MANIFEST,
    )
}

/// Stores an index over `entries` and returns its descriptor.
pub fn put_index(store: &MemoryStore, entries: &[Descriptor]) -> Descriptor {
    let entries: Vec<Value> = entries
        .iter()
        .map(|entry| serde_json::to_value(entry).unwrap())
        .collect();
    put_index_json(store, &entries)
}

/// Stores an index over entries given as raw JSON, keeping wire-only keys
/// such as `os.version` intact.
pub fn put_index_json(store: &MemoryStore, entries: &[Value]) -> Descriptor {
    put_json(
        store,
        &json!({
            "schemaVersion": 2,
            "mediaType": MEDIA_TYPE_OCI_INDEX,
            "manifests": entries
        }),
        MEDIA_TYPE_OCI_INDEX,
    )
}

/// Re-describes an image entry with a platform.
pub fn with_platform(entry: &Descriptor, platform: Value) -> Descriptor {
    descriptor(
        &entry.media_type().to_string(),
        &entry.digest().to_string(),
        entry.size() as usize,
        Some(json!({ "platform": platform })),
    )
}

/// Raw JSON for an image entry with a platform written in wire form.
pub fn platform_entry_json(entry: &Descriptor, platform: Value) -> Value {
    json!({
        "mediaType": entry.media_type().to_string(),
        "digest": entry.digest().to_string(),
        "size": entry.size(),
        "platform": platform
    })
}

/// Re-describes an entry as an attestation for `attests`.
pub fn as_attestation(entry: &Descriptor, attests: &str) -> Descriptor {
    descriptor(
        &entry.media_type().to_string(),
        &entry.digest().to_string(),
        entry.size() as usize,
        Some(json!({
            "annotations": {
                REFERENCE_TYPE_ANNOTATION: ATTESTATION_MANIFEST,
                REFERENCE_DIGEST_ANNOTATION: attests
            }
        })),
    )
}

/// Two platform images plus one attestation for the first of them.
pub fn multi_arch(store: &MemoryStore) -> Descriptor {
    let amd64 = put_image(store, "linux", "amd64", &[LAYER_A]);
    let arm64 = put_image(store, "linux", "arm64", &[LAYER_A, LAYER_B]);
    let attestation = put_image(store, "unknown", "unknown", &[LAYER_B]);
    put_index(
        store,
        &[
            with_platform(&amd64, json!({ "os": "linux", "architecture": "amd64" })),
            with_platform(
                &arm64,
                json!({ "os": "linux", "architecture": "arm64", "variant": "v8" }),
            ),
            as_attestation(&attestation, ATTESTED),
        ],
    )
}
