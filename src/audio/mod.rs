//! Audio input for waveformgen.
//!
//! Decoding sits behind the [`AudioSource`] trait so the renderer only ever sees
//! interleaved `f32` samples delivered in fixed-size blocks. WAV files go through
//! hound, AIFF files through symphonia.

pub mod aiff;
pub mod source;
pub mod wav;

use crate::error::Result;
use std::path::Path;

pub use aiff::AiffSource;
pub use source::AudioSource;
pub use wav::WavSource;

/// Opens `path` with the decoder matching its extension.
///
/// `.aif` and `.aiff` files use the AIFF decoder; everything else is read as WAV.
///
/// # Errors
/// - If the file cannot be opened or decoded by the chosen decoder
pub fn open(path: &Path) -> Result<Box<dyn AudioSource>> {
    let is_aiff = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("aif") || ext.eq_ignore_ascii_case("aiff"));

    if is_aiff {
        Ok(Box::new(AiffSource::open(path)?))
    } else {
        Ok(Box::new(WavSource::open(path)?))
    }
}
