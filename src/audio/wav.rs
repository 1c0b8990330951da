//! WAV decoding through hound.
//!
//! Integer PCM is normalized by `2^(bits - 1)` so every sample lands in `[-1.0, 1.0)`;
//! IEEE float data is passed through untouched.

use super::source::{AudioSource, StreamInfo};
use crate::error::{Result, WaveformError};
use hound::{SampleFormat, WavReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A WAV file opened for sequential block reads.
pub struct WavSource {
    reader: WavReader<BufReader<File>>,
    info: StreamInfo,
}

impl WavSource {
    /// Opens a WAV file and reads its header.
    ///
    /// # Errors
    /// - If the file cannot be opened
    /// - If the header is malformed or describes an unsupported format
    pub fn open(path: &Path) -> Result<Self> {
        let reader = WavReader::open(path).map_err(|source| WaveformError::InputOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let spec = reader.spec();
        if spec.channels == 0 {
            return Err(WaveformError::InputOpen {
                path: path.to_path_buf(),
                source: hound::Error::FormatError("stream has no channels"),
            });
        }

        let info = StreamInfo {
            frames: u64::from(reader.duration()),
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        };

        tracing::debug!(
            "Opened {}: {} frames, {} channels, {}Hz, {} bit {:?}",
            path.display(),
            info.frames,
            info.channels,
            info.sample_rate,
            spec.bits_per_sample,
            spec.sample_format
        );

        Ok(Self { reader, info })
    }
}

impl AudioSource for WavSource {
    fn info(&self) -> StreamInfo {
        self.info
    }

    fn read_block(&mut self, buf: &mut [f32]) -> Result<usize> {
        let spec = self.reader.spec();
        let mut count = 0;

        match spec.sample_format {
            SampleFormat::Float => {
                for (slot, sample) in buf.iter_mut().zip(self.reader.samples::<f32>()) {
                    *slot = sample?;
                    count += 1;
                }
            }
            SampleFormat::Int => {
                let scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
                for (slot, sample) in buf.iter_mut().zip(self.reader.samples::<i32>()) {
                    *slot = sample? as f32 / scale;
                    count += 1;
                }
            }
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    fn write_wav(path: &Path, spec: WavSpec, samples: &[i16]) {
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_open_missing_file() {
        let result = WavSource::open(Path::new("/definitely/not/here.wav"));
        assert!(matches!(result, Err(WaveformError::InputOpen { .. })));
    }

    #[test]
    fn test_open_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"this is not a riff file").unwrap();
        assert!(matches!(
            WavSource::open(&path),
            Err(WaveformError::InputOpen { .. })
        ));
    }

    #[test]
    fn test_reads_normalized_stereo_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        write_wav(&path, spec, &[16384, -16384, 0, 32767, -32768, 0]);

        let mut source = WavSource::open(&path).unwrap();
        assert_eq!(
            source.info(),
            StreamInfo {
                frames: 3,
                channels: 2,
                sample_rate: 8000
            }
        );

        let mut buf = [0.0f32; 4];
        assert_eq!(source.read_block(&mut buf).unwrap(), 4);
        assert_eq!(buf[0], 0.5);
        assert_eq!(buf[1], -0.5);
        assert_eq!(buf[2], 0.0);
        assert!((buf[3] - 1.0).abs() < 1e-4);

        // Short read once the stream runs out
        assert_eq!(source.read_block(&mut buf).unwrap(), 2);
        assert_eq!(buf[0], -1.0);
        assert_eq!(source.read_block(&mut buf).unwrap(), 0);
    }
}
