use super::*;
use libmanifest::{Digest, HostOptions, ToolError};
use serde_json::json;

const MANIFEST_TYPE: &str = "application/vnd.oci.image.manifest.v1+json";
const CONFIG_TYPE: &str = "application/vnd.oci.image.config.v1+json";

fn context() -> AppContext {
    AppContext {
        color: libmanifest::ColorChoice::Never,
        host: HostOptions {
            plain_http: true,
            ..HostOptions::default()
        },
        verbosity: VerbosityLevel::Normal,
    }
}

async fn serve_image(server: &mut mockito::Server) -> (String, Vec<mockito::Mock>) {
    let config = serde_json::to_vec(&json!({ "os": "linux", "architecture": "amd64" })).unwrap();
    let config_digest = Digest::sha256_of(&config).unwrap().to_string();
    let manifest = serde_json::to_vec(&json!({
        "schemaVersion": 2,
        "mediaType": MANIFEST_TYPE,
        "config": { "mediaType": CONFIG_TYPE, "digest": config_digest, "size": config.len() },
        "layers": []
    }))
    .unwrap();
    let manifest_digest = Digest::sha256_of(&manifest).unwrap().to_string();

    let manifest_mock = server
        .mock("GET", "/v2/app/manifests/v1")
        .with_status(200)
        .with_header("content-type", MANIFEST_TYPE)
        .with_header("docker-content-digest", &manifest_digest)
        .with_body(&manifest)
        .create_async()
        .await;
    let config_mock = server
        .mock("GET", format!("/v2/app/blobs/{}", config_digest).as_str())
        .with_status(200)
        .with_body(&config)
        .create_async()
        .await;
    (manifest_digest, vec![manifest_mock, config_mock])
}

#[tokio::test]
async fn test_inspect_writes_human_output() {
    let mut server = mockito::Server::new_async().await;
    let (digest, mocks) = serve_image(&mut server).await;
    let name = format!("{}/app:v1", server.host_with_port());

    let request = InspectRequest::new(&name, false, false).unwrap();
    let mut out = Vec::new();
    inspect_to(&context(), &request, &Palette::plain(), &mut out)
        .await
        .unwrap();

    for mock in mocks {
        mock.assert_async().await;
    }
    let output = String::from_utf8(out).unwrap();
    assert!(output.starts_with(&format!("Name: {} (Type: {})", name, MANIFEST_TYPE)));
    assert!(output.contains(&format!("Digest: {}", digest)));
    assert!(output.contains("Arch: amd64"));
}

#[tokio::test]
async fn test_inspect_raw_writes_json() {
    let mut server = mockito::Server::new_async().await;
    let (digest, _mocks) = serve_image(&mut server).await;
    let name = format!("{}/app:v1", server.host_with_port());

    let request = InspectRequest::new(&name, true, false).unwrap();
    let mut out = Vec::new();
    inspect_to(&context(), &request, &Palette::plain(), &mut out)
        .await
        .unwrap();

    let document: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(document["name"], name.as_str());
    assert_eq!(document["digest"], digest.as_str());
    assert_eq!(document["architecture"], "amd64");
}

#[tokio::test]
async fn test_missing_manifest_writes_nothing() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/app/manifests/v1")
        .with_status(404)
        .create_async()
        .await;
    let name = format!("{}/app:v1", server.host_with_port());

    let request = InspectRequest::new(&name, true, false).unwrap();
    let mut out = Vec::new();
    let err = inspect_to(&context(), &request, &Palette::plain(), &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::NotFound { .. }));
    assert!(out.is_empty());
}
