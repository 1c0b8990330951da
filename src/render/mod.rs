//! Waveform image rendering.
//!
//! A render is one sequential pass over the audio, one window per image column, drawing
//! peak and RMS lines for every drawing channel. With RMS scaling enabled the RMS lines
//! are held back and drawn in a second pass. The timeline, if requested, goes into a
//! band at the bottom that the waveform never touches.

pub mod canvas;
pub mod column;
pub mod downsample;
pub mod font;
pub mod marks;
pub mod timeline;

use crate::audio::{self, AudioSource};
use crate::config::RenderConfig;
use crate::error::Result;
use canvas::{Canvas, ColorIndex};
use column::{ChannelLayout, ColumnRenderer, DeferredRms, RmsRecord};
use downsample::Downsampler;
use std::path::Path;
use timeline::{TimelineColors, TimelineRenderer, TIMELINE_HEIGHT};

/// Palette entries allocated for one render.
struct Palette {
    rms: ColorIndex,
    peak: ColorIndex,
    timeline: Option<TimelineColors>,
}

impl Palette {
    fn allocate(canvas: &mut Canvas, config: &RenderConfig) -> Result<Self> {
        // Allocated first so it fills the canvas
        let background = canvas.allocate_color(config.background_color)?;
        if config.transparent_background {
            canvas.set_transparent(background);
        }

        let rms = canvas.allocate_color(config.rms_color)?;
        let peak = canvas.allocate_color(config.peak_color)?;

        let timeline = if config.draw_timeline {
            Some(TimelineColors {
                line: canvas.allocate_color(config.timeline_color)?,
                odd: canvas.allocate_color(config.timeline_odd_color)?,
                background: canvas.allocate_color(config.timeline_background_color)?,
            })
        } else {
            None
        };

        Ok(Self {
            rms,
            peak,
            timeline,
        })
    }
}

/// Renders the waveform of `input` and writes it to `output` as a PNG.
///
/// # Errors
/// - If the configuration is rejected
/// - If the input cannot be opened or read to the end of the last window
/// - If the output cannot be written
pub fn generate_image(input: &Path, output: &Path, config: &RenderConfig) -> Result<()> {
    config.validate()?;

    let mut source = audio::open(input)?;
    let canvas = render(&mut source, config)?;
    canvas.save(output)?;

    tracing::info!("Saved waveform image to {}", output.display());
    Ok(())
}

/// Renders the waveform of `source` into a new canvas.
///
/// # Errors
/// - If the configuration is rejected or leaves no room for the channel bands
/// - If the canvas or sample buffers cannot be allocated
/// - If the source runs dry before the last column or fails to decode
pub fn render<S: AudioSource>(source: &mut S, config: &RenderConfig) -> Result<Canvas> {
    config.validate()?;

    let info = source.info();
    let duration_secs = info.duration_secs();
    tracing::info!(
        "Rendering {}x{} waveform: {} channels, {:.2}s at {}Hz",
        config.width,
        config.height,
        info.channels,
        duration_secs,
        info.sample_rate
    );

    let mut canvas = Canvas::new(config.width, config.height)?;
    let palette = Palette::allocate(&mut canvas, config)?;

    let usable_height = if config.draw_timeline {
        config.height.saturating_sub(TIMELINE_HEIGHT)
    } else {
        config.height
    };

    let mut downsampler = Downsampler::new(source, config.width, config.mix_channels)?;
    let channels = downsampler.drawing_channels();
    let layout = ChannelLayout::new(usable_height, channels, config.channel_spacing)?;
    tracing::debug!(
        "{} frames per column, {} drawing channel(s), {}px each, {}px apart",
        downsampler.frames_per_line(),
        channels,
        layout.channel_height,
        layout.spacing
    );

    let renderer = ColumnRenderer::new(layout, palette.peak, palette.rms);
    let mut deferred = if config.scale_rms {
        Some(DeferredRms::with_capacity(config.width as usize * channels)?)
    } else {
        None
    };

    for x in 0..config.width as i32 {
        let stats = downsampler.next_column()?;
        for (channel, stat) in stats.iter().enumerate() {
            match deferred.as_mut() {
                Some(deferred) => {
                    renderer.draw_peak(&mut canvas, x, channel, stat);
                    deferred.push(RmsRecord {
                        x,
                        channel,
                        extent: renderer.rms_extent(stat),
                    });
                }
                None => renderer.draw_column(&mut canvas, x, channel, stat),
            }
        }
    }

    if let Some(deferred) = deferred {
        deferred.draw(&renderer, &mut canvas);
    }

    if let Some(colors) = palette.timeline {
        TimelineRenderer::new(colors, config.mark_spacing, config.draw_mark_every_minute)
            .draw(&mut canvas, duration_secs);
    }

    Ok(canvas)
}
