//! AIFF decoding through symphonia.
//!
//! Packets are decoded on demand and converted to interleaved `f32`, so memory use
//! stays at one packet regardless of file length.

use super::source::{AudioSource, StreamInfo};
use crate::error::{Result, WaveformError};
use std::fs::File;
use std::io;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// An AIFF file opened for sequential block reads.
pub struct AiffSource {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    info: StreamInfo,
    sample_buf: Option<SampleBuffer<f32>>,
    /// Frame capacity `sample_buf` was created with
    buf_frames: usize,
    pending: Vec<f32>,
    consumed: usize,
    finished: bool,
}

impl AiffSource {
    /// Opens an AIFF file and reads its header.
    ///
    /// # Errors
    /// - If the file cannot be opened or is not a supported AIFF stream
    /// - If the header does not state the channel count, sample rate or length
    pub fn open(path: &Path) -> Result<Self> {
        let open_error = |source: SymphoniaError| WaveformError::InputFormat {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(|e| open_error(SymphoniaError::from(e)))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        hint.with_extension("aiff");

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(open_error)?;
        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| open_error(SymphoniaError::Unsupported("no audio track")))?;
        let params = &track.codec_params;

        let channels = params
            .channels
            .map(|c| c.count())
            .filter(|&c| c > 0)
            .and_then(|c| u16::try_from(c).ok())
            .ok_or_else(|| open_error(SymphoniaError::Unsupported("stream has no channels")))?;
        let sample_rate = params
            .sample_rate
            .ok_or_else(|| open_error(SymphoniaError::Unsupported("unknown sample rate")))?;
        let frames = params
            .n_frames
            .ok_or_else(|| open_error(SymphoniaError::Unsupported("unknown stream length")))?;

        let track_id = track.id;
        let decoder = symphonia::default::get_codecs()
            .make(params, &DecoderOptions::default())
            .map_err(open_error)?;

        let info = StreamInfo {
            frames,
            channels,
            sample_rate,
        };

        tracing::debug!(
            "Opened {}: {} frames, {} channels, {}Hz",
            path.display(),
            info.frames,
            info.channels,
            info.sample_rate
        );

        Ok(Self {
            format,
            decoder,
            track_id,
            info,
            sample_buf: None,
            buf_frames: 0,
            pending: Vec::new(),
            consumed: 0,
            finished: false,
        })
    }

    /// Decodes the next packet of the audio track into `pending`.
    ///
    /// Returns false once the stream is exhausted.
    fn refill(&mut self) -> Result<bool> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Ok(false);
                }
                Err(SymphoniaError::ResetRequired) => return Ok(false),
                Err(e) => return Err(e.into()),
            };
            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = self.decoder.decode(&packet)?;
            let frames = decoded.capacity();
            let spec = *decoded.spec();
            if frames > self.buf_frames {
                self.buf_frames = frames;
                self.sample_buf = None;
            }
            let sample_buf = self
                .sample_buf
                .get_or_insert_with(|| SampleBuffer::new(frames as u64, spec));
            sample_buf.copy_interleaved_ref(decoded);

            self.pending.clear();
            self.pending.extend_from_slice(sample_buf.samples());
            self.consumed = 0;
            if !self.pending.is_empty() {
                return Ok(true);
            }
        }
    }
}

impl AudioSource for AiffSource {
    fn info(&self) -> StreamInfo {
        self.info
    }

    fn read_block(&mut self, buf: &mut [f32]) -> Result<usize> {
        let mut count = 0;

        while count < buf.len() {
            if self.consumed == self.pending.len() {
                if self.finished || !self.refill()? {
                    self.finished = true;
                    break;
                }
            }

            let available = &self.pending[self.consumed..];
            let n = available.len().min(buf.len() - count);
            buf[count..count + n].copy_from_slice(&available[..n]);
            self.consumed += n;
            count += n;
        }

        Ok(count)
    }
}
