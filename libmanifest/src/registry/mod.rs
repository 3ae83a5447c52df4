//! Registry host configuration and content fetching.
//!
//! [`RegistryHost`] binds an HTTP client and credentials to the registry a
//! reference names. [`fetch_descriptor`] pulls the reference's manifest graph
//! into a [`MemoryStore`], one request at a time, and returns the root
//! descriptor for resolution.

use crate::auth::{Credentials, docker_config};
use crate::client::{Client, ClientConfig};
use crate::digest::Digest;
use crate::error::{Result, ToolError};
use crate::oci::{Descriptor, MediaKind, decode_index, decode_manifest, media_type_of};
use crate::reference::Reference;
use crate::store::MemoryStore;
use oci_spec::image::{DescriptorBuilder, MediaType};
use std::path::PathBuf;
use tracing::{debug, info};


/// Registry the Docker Hub name `docker.io` is served from.
const DOCKER_HUB_REGISTRY: &str = "registry-1.docker.io";

/// Connection and credential options for a registry host.
#[derive(Debug, Clone)]
pub struct HostOptions {
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: bool,
    pub plain_http: bool,
    /// Path to a Docker `config.json`
    pub docker_cfg: Option<PathBuf>,
    pub timeout_seconds: u64,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            insecure: false,
            plain_http: false,
            docker_cfg: None,
            timeout_seconds: 30,
        }
    }
}

/// A configured connection to the registry of one reference.
#[derive(Debug)]
pub struct RegistryHost {
    client: Client,
    registry: String,
}

impl RegistryHost {
    /// Creates a host for the registry `reference` names.
    ///
    /// An explicit username takes precedence over the Docker config file;
    /// without either, access is anonymous.
    pub fn new(reference: &Reference, options: &HostOptions) -> Result<Self> {
        let registry = reference.registry().to_string();
        let credentials = resolve_credentials(&registry, options)?;
        let config = ClientConfig::new()
            .with_timeout(options.timeout_seconds)
            .with_insecure(options.insecure)
            .with_plain_http(options.plain_http);

        let endpoint = endpoint_for(&registry);
        debug!(
            registry = %registry,
            endpoint,
            anonymous = credentials.is_anonymous(),
            "Configured registry host"
        );
        Ok(Self {
            client: Client::with_config(endpoint, config, credentials)?,
            registry,
        })
    }

    /// The registry name as written in the reference.
    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn endpoint_for(registry: &str) -> &str {
    match registry {
        "docker.io" | "index.docker.io" => DOCKER_HUB_REGISTRY,
        other => other,
    }
}

fn resolve_credentials(registry: &str, options: &HostOptions) -> Result<Credentials> {
    if let Some(username) = options.username.as_deref().filter(|u| !u.is_empty()) {
        return Ok(Credentials::basic(
            username,
            options.password.clone().unwrap_or_default(),
        ));
    }
    match &options.docker_cfg {
        Some(path) => Ok(docker_config::lookup(path, registry)?.unwrap_or(Credentials::Anonymous)),
        None => Ok(Credentials::Anonymous),
    }
}

/// Fetches the manifest graph of a tagged reference into `store`.
///
/// For an index every manifest-like entry is fetched by digest; for a
/// manifest its config blob is fetched. Entries of other media types, and
/// the configs and layers of index entries, are left alone.
pub async fn fetch_descriptor(
    host: &RegistryHost,
    store: &MemoryStore,
    reference: &Reference,
) -> Result<Descriptor> {
    let repository = reference.repository();
    let tag = reference
        .tag()
        .ok_or_else(|| ToolError::validation("image reference must include a tag"))?;

    let fetched = host.client().fetch_manifest(repository, tag).await?;
    let size = fetched.bytes.len() as u64;
    let digest = store.put(fetched.bytes, &fetched.media_type)?;
    if let Some(served) = fetched.digest.as_deref()
        && served != digest.to_string()
    {
        return Err(ToolError::validation(format!(
            "Manifest digest mismatch: registry sent {}, content is {}",
            served, digest
        )));
    }

    let root = descriptor(&fetched.media_type, size, &digest)?;
    info!(reference = %reference.original(), digest = %digest, "Resolved reference");

    match MediaKind::of(&root) {
        MediaKind::Index => {
            let index = decode_index(&store.get(&root)?.bytes)?;
            for entry in index.manifests() {
                match MediaKind::of(entry) {
                    MediaKind::Manifest => fetch_entry(host, store, repository, entry).await?,
                    _ => debug!(
                        digest = %entry.digest(),
                        media_type = %media_type_of(entry),
                        "Not fetching index entry"
                    ),
                }
            }
        }
        MediaKind::Manifest => {
            let manifest = decode_manifest(&store.get(&root)?.bytes)?;
            fetch_config(host, store, repository, manifest.config()).await?;
        }
        MediaKind::Unknown(media_type) => {
            debug!(%media_type, "Root has an unrecognised media type, nothing more to fetch")
        }
    }

    Ok(root)
}

async fn fetch_entry(
    host: &RegistryHost,
    store: &MemoryStore,
    repository: &str,
    entry: &Descriptor,
) -> Result<()> {
    let expected = Digest::from(entry.digest().clone());
    if store.contains(&expected) {
        return Ok(());
    }
    let fetched = host
        .client()
        .fetch_manifest(repository, &expected.to_string())
        .await?;
    let digest = store.put(fetched.bytes, &media_type_of(entry))?;
    if digest != expected {
        return Err(ToolError::validation(format!(
            "Manifest digest mismatch: expected {}, computed {}",
            expected, digest
        )));
    }
    Ok(())
}

async fn fetch_config(
    host: &RegistryHost,
    store: &MemoryStore,
    repository: &str,
    config: &Descriptor,
) -> Result<()> {
    let expected = Digest::from(config.digest().clone());
    if store.contains(&expected) {
        return Ok(());
    }
    let bytes = host
        .client()
        .fetch_blob(repository, &expected.to_string())
        .await?;
    store.put(bytes, &media_type_of(config))?;
    Ok(())
}

fn descriptor(media_type: &str, size: u64, digest: &Digest) -> Result<Descriptor> {
    DescriptorBuilder::default()
        .media_type(MediaType::from(media_type))
        .size(size)
        .digest(digest.as_oci().clone())
        .build()
        .map_err(|e| ToolError::validation_with_source("Failed to build root descriptor", e))
}
