//! Manifest inspection, end to end.
//!
//! An [`InspectRequest`] is validated up front, before any network access.
//! [`fetch`] then pulls the reference's manifest graph into a fresh
//! [`MemoryStore`] and [`render`] writes exactly one artifact: the human view
//! or a complete JSON document.
//!
//! # Examples
//!
//! ```no_run
//! use libmanifest::{HostOptions, InspectRequest, Palette, inspect};
//!
//! # #[tokio::main]
//! # async fn main() -> libmanifest::Result<()> {
//! let request = InspectRequest::new("docker.io/library/alpine:3.19", false, false)?;
//! let mut stdout = std::io::stdout();
//! inspect(&request, &HostOptions::default(), &Palette::plain(), &mut stdout).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use crate::oci::Descriptor;
use crate::reference::Reference;
use crate::registry::{HostOptions, RegistryHost, fetch_descriptor};
use crate::render::{Palette, RenderMode, render_human, render_raw};
use crate::resolve::resolve_root;
use crate::store::MemoryStore;
use std::io::Write;


/// A validated inspection request.
#[derive(Debug, Clone)]
pub struct InspectRequest {
    reference: Reference,
    mode: RenderMode,
}

impl InspectRequest {
    /// Validates the flags, then the reference.
    pub fn new(name: &str, raw: bool, expand_config: bool) -> Result<Self> {
        let mode = RenderMode::from_flags(raw, expand_config)?;
        let reference = Reference::parse_tagged(name)?;
        Ok(Self { reference, mode })
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }
}

/// Content fetched for one request.
#[derive(Debug)]
pub struct Fetched {
    pub store: MemoryStore,
    pub root: Descriptor,
}

/// Fetches the manifest graph for `request`.
pub async fn fetch(request: &InspectRequest, options: &HostOptions) -> Result<Fetched> {
    let host = RegistryHost::new(&request.reference, options)?;
    let store = MemoryStore::new();
    let root = fetch_descriptor(&host, &store, &request.reference).await?;
    Ok(Fetched { store, root })
}

/// Resolves fetched content and writes it in the requested mode.
pub fn render<W: Write>(
    request: &InspectRequest,
    fetched: &Fetched,
    palette: &Palette,
    out: &mut W,
) -> Result<()> {
    let resolved = resolve_root(&fetched.root, &fetched.store)?;
    let name = request.reference.original();
    match request.mode {
        RenderMode::Human => render_human(name, &resolved, &fetched.store, palette, out)?,
        RenderMode::Raw { expand_config } => {
            let document = render_raw(name, &resolved, &fetched.store, expand_config)?;
            writeln!(out, "{}", document)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Fetches and renders in one step.
pub async fn inspect<W: Write>(
    request: &InspectRequest,
    options: &HostOptions,
    palette: &Palette,
    out: &mut W,
) -> Result<()> {
    let fetched = fetch(request, options).await?;
    render(request, &fetched, palette, out)
}
