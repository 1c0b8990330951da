//! Column-wise peak/RMS statistics.
//!
//! The stream is cut into `width` windows of `frames / width` frames each, read strictly
//! left to right. Frames past `width * frames_per_line` are never read.

use crate::audio::AudioSource;
use crate::error::{Result, WaveformError};

/// Amplitude statistics of one window for one drawing channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColumnStat {
    /// Largest sample in the window, never below zero
    pub peak_positive: f32,
    /// Smallest sample in the window, never above zero
    pub peak_negative: f32,
    /// Root mean square of the window
    pub rms: f32,
}

impl ColumnStat {
    /// Computes statistics over the samples yielded by `samples`.
    ///
    /// An empty window is silence.
    fn from_samples(samples: impl Iterator<Item = f32>) -> Self {
        let mut sum_sq = 0.0f64;
        let mut count = 0usize;
        let mut peak_positive = 0.0f32;
        let mut peak_negative = 0.0f32;

        for sample in samples {
            sum_sq += f64::from(sample) * f64::from(sample);
            count += 1;
            peak_positive = peak_positive.max(sample);
            peak_negative = peak_negative.min(sample);
        }

        let rms = if count == 0 {
            0.0
        } else {
            (sum_sq / count as f64).sqrt() as f32
        };

        Self {
            peak_positive,
            peak_negative,
            rms,
        }
    }
}

/// Reads one window per output column and reduces it to per-channel statistics.
pub struct Downsampler<'a, S: AudioSource> {
    source: &'a mut S,
    channels: usize,
    mix_channels: bool,
    frames_per_line: usize,
    buffer: Vec<f32>,
    stats: Vec<ColumnStat>,
    column: u32,
}

impl<'a, S: AudioSource> Downsampler<'a, S> {
    /// Prepares a downsampler producing `width` columns from `source`.
    ///
    /// # Errors
    /// - If the window buffer cannot be allocated
    pub fn new(source: &'a mut S, width: u32, mix_channels: bool) -> Result<Self> {
        let info = source.info();
        let channels = info.channels as usize;
        let frames_per_line = (info.frames / u64::from(width.max(1))) as usize;

        let window_len = frames_per_line.checked_mul(channels).ok_or_else(|| {
            WaveformError::Allocation(format!("sample buffer of {frames_per_line} frames"))
        })?;
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(window_len).map_err(|_| {
            WaveformError::Allocation(format!("sample buffer of {window_len} samples"))
        })?;
        buffer.resize(window_len, 0.0);

        let dropped = info.frames - frames_per_line as u64 * u64::from(width);
        if frames_per_line == 0 {
            tracing::warn!(
                "Input has only {} frames for {} columns, rendering silence",
                info.frames,
                width
            );
        } else if dropped > 0 {
            tracing::debug!("Ignoring {} trailing frames", dropped);
        }
        tracing::debug!(
            "Downsampling {} frames at {} frames per column",
            info.frames,
            frames_per_line
        );

        let drawing_channels = if mix_channels { 1 } else { channels };

        Ok(Self {
            source,
            channels,
            mix_channels,
            frames_per_line,
            buffer,
            stats: vec![ColumnStat::default(); drawing_channels],
            column: 0,
        })
    }

    pub fn frames_per_line(&self) -> usize {
        self.frames_per_line
    }

    /// Number of drawing channels each column yields.
    pub fn drawing_channels(&self) -> usize {
        self.stats.len()
    }

    /// Reads the next window and returns one statistic per drawing channel.
    ///
    /// # Errors
    /// - If the source delivers fewer samples than the window needs
    /// - If the decoder fails
    pub fn next_column(&mut self) -> Result<&[ColumnStat]> {
        let got = self.source.read_block(&mut self.buffer)?;
        if got != self.buffer.len() {
            return Err(WaveformError::Read {
                column: self.column,
                expected: self.buffer.len(),
                got,
            });
        }
        self.column += 1;

        if self.mix_channels {
            self.stats[0] = ColumnStat::from_samples(self.buffer.iter().copied());
        } else {
            for (channel, stat) in self.stats.iter_mut().enumerate() {
                let samples = self.buffer.iter().skip(channel).step_by(self.channels);
                *stat = ColumnStat::from_samples(samples.copied());
            }
        }

        Ok(&self.stats)
    }
}
