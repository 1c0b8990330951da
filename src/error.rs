//! Error types for waveform rendering.
//!
//! Every failure is fatal to the render in progress. The caller receives a single
//! descriptive error and no image is written.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaveformError {
    /// The decoder could not open or parse the input resource.
    #[error("Could not open input file {}: {source}", .path.display())]
    InputOpen {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    /// No decoder accepted the input resource.
    #[error("Could not open input file {}: {source}", .path.display())]
    InputFormat {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },

    /// A sample buffer or the canvas could not be allocated.
    #[error("Could not allocate {0}")]
    Allocation(String),

    /// Fewer samples were available than the current column window requires.
    #[error("Could not read samples from audio file (column {column}: expected {expected} samples, got {got})")]
    Read {
        column: u32,
        expected: usize,
        got: usize,
    },

    /// The decoder failed mid-stream.
    #[error("Could not decode audio data: {0}")]
    Decode(#[from] hound::Error),

    #[error("Could not decode audio data: {0}")]
    StreamDecode(#[from] symphonia::core::errors::Error),

    /// The destination could not be opened for writing.
    #[error("Could not open output file {}: {source}", .path.display())]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not encode image: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("{0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, WaveformError>;
