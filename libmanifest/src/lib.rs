//! libmanifest - Container Image Manifest Inspection
//!
//! libmanifest resolves a tagged image reference against an OCI or Docker
//! registry and renders the manifest structure behind it: a single-platform
//! image with its config and layers, or a multi-platform index with its
//! platform images and attestations.
//!
//! # Quick Start
//!
//! ```no_run
//! use libmanifest::{HostOptions, InspectRequest, Palette, inspect};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = InspectRequest::new("ghcr.io/org/app:v1.2.0", true, false)?;
//!     let mut stdout = std::io::stdout();
//!     inspect(&request, &HostOptions::default(), &Palette::plain(), &mut stdout).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Pipeline
//!
//! - [`registry`] fetches the manifest graph into a [`MemoryStore`]
//! - [`resolve`] turns the root descriptor into typed objects
//! - [`attestation`] tells platform images from attestation manifests
//! - [`render`] writes the human view or the raw JSON document
//!
//! [`inspect()`] runs the whole pipeline; the low-level modules are public
//! for callers that already hold content in a store.

#![warn(clippy::all)]

/// Returns the libmanifest crate version.
///
/// # Examples
///
/// ```
/// let version = libmanifest::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use auth::Credentials;
pub use config::{ColorChoice, Config};
pub use digest::Digest;
pub use error::{Result, ToolError};
pub use inspect::{Fetched, InspectRequest, fetch, inspect, render};
pub use reference::Reference;
pub use registry::HostOptions;
pub use render::{Palette, RenderMode};
pub use resolve::Resolved;
pub use store::MemoryStore;

pub mod attestation;
#[doc(hidden)]
pub mod auth;
#[doc(hidden)]
pub mod client;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod digest;
#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod inspect;
pub mod oci;
#[doc(hidden)]
pub mod reference;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod store;

#[cfg(test)]
mod fixtures;
