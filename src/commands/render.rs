//! Waveform rendering command.

use crate::config::RenderConfig;
use crate::render;
use std::path::Path;

/// Renders the waveform of `input` into a PNG at `output`.
///
/// The configuration is validated before the input is touched.
///
/// # Errors
/// - If the configuration is rejected
/// - If decoding, rendering or writing the image fails
pub fn handle_render(input: &Path, output: &Path, config: &RenderConfig) -> anyhow::Result<()> {
    tracing::info!("=== waveformgen Render Command ===");
    tracing::info!("Input: {}, output: {}", input.display(), output.display());

    render::generate_image(input, output, config).map_err(|e| {
        tracing::error!("Render failed: {e}");
        anyhow::Error::new(e)
    })
}
