use crate::context::{AppContext, VerbosityLevel};
use crate::format;
use libmanifest::{InspectRequest, Palette, Result};
use std::io::Write;
use tracing::info;

/// Handle `manifest-tool inspect`, writing the artifact to stdout.
pub async fn handle_inspect(ctx: &AppContext, request: &InspectRequest) -> Result<()> {
    let palette = format::stdout_palette(ctx.color);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    inspect_to(ctx, request, &palette, &mut out).await
}

/// Fetch and render `request` into `out`.
///
/// Nothing is written to `out` unless fetching succeeded.
pub async fn inspect_to<W: Write>(
    ctx: &AppContext,
    request: &InspectRequest,
    palette: &Palette,
    out: &mut W,
) -> Result<()> {
    info!("Inspecting {}", request.reference());

    // Progress and debug logs share stderr
    let show_progress = ctx.verbosity < VerbosityLevel::Debug;
    let spinner = format::spinner(
        &format!("Fetching {}", request.reference()),
        show_progress,
    );
    let fetched = libmanifest::fetch(request, &ctx.host).await;
    spinner.finish_and_clear();

    libmanifest::render(request, &fetched?, palette, out)
}

#[cfg(test)]
#[path = "inspect_tests.rs"]
mod tests;
