use super::*;
use crate::error::ToolError;
use crate::fixtures::{self, ATTESTED, LAYER_A, LAYER_B, LAYER_TYPE};
use crate::oci::{MEDIA_TYPE_OCI_INDEX, MEDIA_TYPE_OCI_MANIFEST};
use crate::resolve::resolve_root;
use serde_json::json;

fn render(store: &MemoryStore, root: &Descriptor) -> Result<String> {
    let resolved = resolve_root(root, store)?;
    let mut out = Vec::new();
    render_human(
        "example.com/app:v1",
        &resolved,
        store,
        &Palette::plain(),
        &mut out,
    )?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_single_image_output() {
    let store = MemoryStore::new();
    let root = fixtures::put_image(&store, "linux", "amd64", &[LAYER_A]);

    let expected = format!(
        "Name: example.com/app:v1 (Type: {MEDIA_TYPE_OCI_MANIFEST})\n\
         \x20     Digest: {}\n\
         \x20       Size: {}\n\
         \x20         OS: linux\n\
         \x20       Arch: amd64\n\
         \x20   # Layers: 1\n\
         \x20     layer 01: digest = {LAYER_A}\n",
        root.digest(),
        root.size()
    );
    assert_eq!(render(&store, &root).unwrap(), expected);
}

#[test]
fn test_index_summary_and_entry_order() {
    let store = MemoryStore::new();
    let root = fixtures::multi_arch(&store);
    let output = render(&store, &root).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(
        lines[0],
        format!("Name:   example.com/app:v1 (Type: {MEDIA_TYPE_OCI_INDEX})")
    );
    assert_eq!(lines[1], format!("Digest: {}", root.digest()));
    assert_eq!(
        lines[2],
        " * Contains 3 manifest references (2 images, 1 attestation):"
    );
    assert_eq!(lines[3], format!("[1]     Type: {MEDIA_TYPE_OCI_MANIFEST}"));
    assert!(lines.contains(&"[1]    -    Arch: amd64"));
    assert!(lines.contains(&"[2]    - Variant: v8"));

    let first = output.find("[1]").unwrap();
    let second = output.find("[2]").unwrap();
    let third = output.find("[3]").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn test_image_entry_block() {
    let store = MemoryStore::new();
    let root = fixtures::multi_arch(&store);
    let output = render(&store, &root).unwrap();

    let block: Vec<&str> = output
        .lines()
        .skip_while(|line| !line.starts_with("[2]"))
        .take_while(|line| !line.starts_with("[3]"))
        .collect();
    assert_eq!(block[3], "[2] Platform:");
    assert_eq!(block[4], "[2]    -      OS: linux");
    assert_eq!(block[5], "[2]    -    Arch: arm64");
    assert_eq!(block[6], "[2]    - Variant: v8");
    assert_eq!(block[7], "[2] # Layers: 2");
    assert_eq!(block[8], format!("     layer 01: digest = {LAYER_A}"));
    assert_eq!(block[9], format!("                 type = {LAYER_TYPE}"));
    assert_eq!(block[10], format!("     layer 02: digest = {LAYER_B}"));
    assert_eq!(block[12], "");
}

#[test]
fn test_attestation_collapses_to_pointer_line() {
    let store = MemoryStore::new();
    let root = fixtures::multi_arch(&store);
    let output = render(&store, &root).unwrap();

    let block: Vec<&str> = output
        .lines()
        .skip_while(|line| !line.starts_with("[3]"))
        .collect();
    assert_eq!(
        block[0],
        format!(
            "[3]     Type: {MEDIA_TYPE_OCI_MANIFEST} (vnd.docker.reference.type=attestation-manifest)"
        )
    );
    assert_eq!(
        block[3],
        format!("[3]       >>> Attestation for digest: {ATTESTED}")
    );
    assert_eq!(block[4], "");
    assert!(!output.contains("[3] Platform:"));
    assert!(output.ends_with("\n\n"));
}

#[test]
fn test_optional_platform_fields() {
    let store = MemoryStore::new();
    let image = fixtures::put_image(&store, "windows", "amd64", &[LAYER_A]);
    let entry = fixtures::platform_entry_json(
        &image,
        json!({
            "os": "windows",
            "architecture": "amd64",
            "os.version": "10.0.17763.1817",
            "os.features": ["win32k", "sse4"]
        }),
    );
    let root = fixtures::put_index_json(&store, &[entry]);
    let output = render(&store, &root).unwrap();

    assert!(output.contains(" * Contains 1 manifest references (1 image, 0 attestations):"));
    assert!(output.contains("[1]    - OS Vers: 10.0.17763.1817\n"));
    assert!(output.contains("[1]    - OS Feat: [win32k sse4]\n"));
    assert!(!output.contains("Variant"));
}

#[test]
fn test_unknown_entry_is_skipped() {
    let store = MemoryStore::new();
    let image = fixtures::put_image(&store, "linux", "amd64", &[LAYER_A]);
    let nested = fixtures::descriptor(MEDIA_TYPE_OCI_INDEX, LAYER_B, 100, None);
    let root = fixtures::put_index(
        &store,
        &[
            nested,
            fixtures::with_platform(&image, json!({ "os": "linux", "architecture": "amd64" })),
        ],
    );
    let output = render(&store, &root).unwrap();

    assert!(output.contains(&format!(
        "Unknown media type for further display: {MEDIA_TYPE_OCI_INDEX}\n"
    )));
    assert!(output.contains("[2] Platform:"));
}

#[test]
fn test_failing_entry_leaves_only_header() {
    let store = MemoryStore::new();
    let missing = fixtures::descriptor(MEDIA_TYPE_OCI_MANIFEST, LAYER_A, 100, None);
    let root = fixtures::put_index(&store, &[missing]);
    let resolved = resolve_root(&root, &store).unwrap();

    let mut out = Vec::new();
    let err = render_human("app:v1", &resolved, &store, &Palette::plain(), &mut out).unwrap_err();
    assert!(matches!(err, ToolError::NotFound { .. }));

    let written = String::from_utf8(out).unwrap();
    assert_eq!(written.lines().count(), 2);
    assert!(written.starts_with("Name:   app:v1"));
}

#[test]
fn test_malformed_attestation_is_fatal() {
    let store = MemoryStore::new();
    let bogus = fixtures::put_json(&store, &json!({ "layers": 3 }), MEDIA_TYPE_OCI_MANIFEST);
    let root = fixtures::put_index(&store, &[fixtures::as_attestation(&bogus, ATTESTED)]);

    assert!(matches!(
        render(&store, &root),
        Err(ToolError::Decode { .. })
    ));
}

#[test]
fn test_empty_index_pluralizes_zero() {
    let store = MemoryStore::new();
    let root = fixtures::put_index(&store, &[]);
    let output = render(&store, &root).unwrap();

    assert!(output.ends_with(" * Contains 0 manifest references (0 images, 0 attestations):\n"));
}
