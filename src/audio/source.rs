//! Sequential audio sample sources.

use crate::error::Result;

/// Stream properties reported by a decoder before any samples are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    /// Number of frames (one sample per channel) in the stream
    pub frames: u64,
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl StreamInfo {
    /// Stream length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames as f64 / self.sample_rate as f64
    }
}

/// A forward-only reader of interleaved floating-point samples.
///
/// Sources are never assumed to be seekable; consumers read blocks strictly in order.
pub trait AudioSource {
    fn info(&self) -> StreamInfo;

    /// Fills `buf` with the next interleaved samples, nominally in `[-1.0, 1.0]`.
    ///
    /// Returns the number of samples written. A count below `buf.len()` means the
    /// stream is exhausted; decoder failures are reported as errors instead.
    fn read_block(&mut self, buf: &mut [f32]) -> Result<usize>;
}

impl<S: AudioSource + ?Sized> AudioSource for Box<S> {
    fn info(&self) -> StreamInfo {
        (**self).info()
    }

    fn read_block(&mut self, buf: &mut [f32]) -> Result<usize> {
        (**self).read_block(buf)
    }
}
