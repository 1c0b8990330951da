//! Mapping column statistics to vertical line draws.
//!
//! Each drawing channel owns a horizontal band of `channel_height` pixels, separated by
//! `spacing` pixels. Amplitudes map linearly onto the band's half-height around its center.
//! Peak lines are drawn as soon as a column is known. RMS lines are drawn either at the
//! same time or, when RMS scaling is on, in a second pass once the loudest column is known.

use super::canvas::{Canvas, ColorIndex};
use super::downsample::ColumnStat;
use crate::error::{Result, WaveformError};

/// Vertical placement of the drawing channel bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    pub channels: usize,
    /// Height of one channel band in pixels
    pub channel_height: i32,
    pub spacing: i32,
}

impl ChannelLayout {
    /// Splits `usable_height` evenly among `channels` bands.
    ///
    /// # Errors
    /// - If the bands would be less than one pixel tall
    pub fn new(usable_height: u32, channels: usize, spacing: u32) -> Result<Self> {
        let too_small = || {
            WaveformError::InvalidConfig(format!(
                "Image height {usable_height} leaves no room for {channels} channel(s) with {spacing}px spacing"
            ))
        };

        if channels == 0 {
            return Err(too_small());
        }

        let gaps = (channels as i64 - 1) * i64::from(spacing);
        let channel_height = (i64::from(usable_height) - gaps) / channels as i64;
        if channel_height < 1 {
            return Err(too_small());
        }

        Ok(Self {
            channels,
            channel_height: channel_height as i32,
            spacing: spacing as i32,
        })
    }

    /// Top edge of a channel band.
    pub fn offset(&self, channel: usize) -> i32 {
        channel as i32 * (self.channel_height + self.spacing)
    }

    pub fn half_height(&self) -> i32 {
        self.channel_height / 2
    }

    /// Zero line of a channel band.
    pub fn center(&self, channel: usize) -> i32 {
        self.offset(channel) + self.half_height()
    }
}

/// Draws peak and RMS lines for one column at a time.
pub struct ColumnRenderer {
    layout: ChannelLayout,
    peak_color: ColorIndex,
    rms_color: ColorIndex,
}

impl ColumnRenderer {
    pub fn new(layout: ChannelLayout, peak_color: ColorIndex, rms_color: ColorIndex) -> Self {
        Self {
            layout,
            peak_color,
            rms_color,
        }
    }

    pub fn layout(&self) -> &ChannelLayout {
        &self.layout
    }

    pub fn draw_peak(&self, canvas: &mut Canvas, x: i32, channel: usize, stat: &ColumnStat) {
        let half = self.layout.half_height() as f32;
        let y = self.layout.center(channel);
        let top = y - (stat.peak_positive * half).round() as i32;
        let bottom = y + (-stat.peak_negative * half).round() as i32;
        canvas.vertical_line(x, top, bottom, self.peak_color);
    }

    /// RMS extent in whole pixels above and below the zero line.
    pub fn rms_extent(&self, stat: &ColumnStat) -> i32 {
        (stat.rms * self.layout.half_height() as f32).round() as i32
    }

    /// Draws an RMS line reaching `extent` pixels each side of the channel's zero line.
    pub fn draw_rms(&self, canvas: &mut Canvas, x: i32, channel: usize, extent: i32) {
        let y = self.layout.center(channel);
        canvas.vertical_line(x, y - extent, y + extent, self.rms_color);
    }

    /// Draws peak and RMS for a column in one go.
    pub fn draw_column(&self, canvas: &mut Canvas, x: i32, channel: usize, stat: &ColumnStat) {
        self.draw_peak(canvas, x, channel, stat);
        self.draw_rms(canvas, x, channel, self.rms_extent(stat));
    }
}

/// RMS measurement of one column held back for the normalizing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RmsRecord {
    pub x: i32,
    pub channel: usize,
    /// Unscaled extent in pixels
    pub extent: i32,
}

/// Buffered RMS records for a whole render, scaled against the loudest column.
pub struct DeferredRms {
    records: Vec<RmsRecord>,
}

impl DeferredRms {
    /// Reserves room for `capacity` records up front.
    ///
    /// # Errors
    /// - If the buffer cannot be allocated
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut records = Vec::new();
        records.try_reserve_exact(capacity).map_err(|_| {
            WaveformError::Allocation(format!("RMS buffer of {capacity} columns"))
        })?;
        Ok(Self { records })
    }

    pub fn push(&mut self, record: RmsRecord) {
        self.records.push(record);
    }

    fn max_extent(&self) -> i32 {
        self.records.iter().map(|r| r.extent).max().unwrap_or(0)
    }

    /// Factor that stretches the largest recorded extent to `half_height`.
    ///
    /// Silence everywhere leaves extents unscaled.
    pub fn scale_factor(&self, half_height: i32) -> f32 {
        match self.max_extent() {
            0 => 1.0,
            max => half_height as f32 / max as f32,
        }
    }

    /// Scaled extent of every record, rounded up and capped at `half_height`.
    pub fn scaled(&self, half_height: i32) -> impl Iterator<Item = (RmsRecord, i32)> + '_ {
        let max = i64::from(self.max_extent());
        let half = i64::from(half_height);
        self.records.iter().map(move |&record| {
            let extent = if max == 0 {
                record.extent
            } else {
                // ceil(extent * half / max) without float drift
                let numerator = i64::from(record.extent) * half;
                (numerator + max - 1).div_euclid(max) as i32
            };
            (record, extent.min(half_height))
        })
    }

    /// Draws every buffered RMS line and releases the buffer.
    pub fn draw(self, renderer: &ColumnRenderer, canvas: &mut Canvas) {
        let half_height = renderer.layout().half_height();
        tracing::debug!(
            "Scaling RMS by {:.3} over {} columns",
            self.scale_factor(half_height),
            self.records.len()
        );
        for (record, extent) in self.scaled(half_height) {
            renderer.draw_rms(canvas, record.x, record.channel, extent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rgb;

    fn setup(width: u32, height: u32) -> (Canvas, ColorIndex, ColorIndex) {
        let mut canvas = Canvas::new(width, height).unwrap();
        canvas.allocate_color(Rgb::gray(255)).unwrap();
        let rms = canvas.allocate_color(Rgb::gray(150)).unwrap();
        let peak = canvas.allocate_color(Rgb::gray(80)).unwrap();
        (canvas, rms, peak)
    }

    fn column(canvas: &Canvas, x: i32) -> Vec<ColorIndex> {
        (0..canvas.height() as i32)
            .map(|y| canvas.pixel(x, y).unwrap())
            .collect()
    }

    #[test]
    fn test_layout_splits_height() {
        let layout = ChannelLayout::new(120, 2, 3).unwrap();
        assert_eq!(layout.channel_height, 58);
        assert_eq!(layout.offset(0), 0);
        assert_eq!(layout.offset(1), 61);
        assert_eq!(layout.center(1), 61 + 29);

        let mono = ChannelLayout::new(101, 1, 3).unwrap();
        assert_eq!(mono.channel_height, 101);
        assert_eq!(mono.half_height(), 50);
    }

    #[test]
    fn test_layout_rejects_crowded_bands() {
        assert!(ChannelLayout::new(5, 3, 3).is_err());
        assert!(ChannelLayout::new(10, 0, 3).is_err());
        assert!(ChannelLayout::new(3, 3, 0).is_ok());
    }

    #[test]
    fn test_peak_and_rms_extents() {
        let (mut canvas, rms, peak) = setup(3, 101);
        let layout = ChannelLayout::new(101, 1, 0).unwrap();
        let renderer = ColumnRenderer::new(layout, peak, rms);

        let stat = ColumnStat {
            peak_positive: 0.5,
            peak_negative: -0.2,
            rms: 0.1,
        };
        renderer.draw_column(&mut canvas, 1, 0, &stat);

        let col = column(&canvas, 1);
        // Peak spans 50 - 25 ..= 50 + 10, RMS covers 50 - 5 ..= 50 + 5 on top of it
        assert_eq!(col[24], 0);
        assert_eq!(col[25], peak);
        assert_eq!(col[44], peak);
        assert!((45..=55).all(|y| col[y] == rms));
        assert_eq!(col[56], peak);
        assert_eq!(col[60], peak);
        assert_eq!(col[61], 0);

        assert!(column(&canvas, 0).iter().all(|&c| c == 0));
    }

    #[test]
    fn test_second_channel_is_offset() {
        let (mut canvas, rms, peak) = setup(1, 43);
        let layout = ChannelLayout::new(43, 2, 3).unwrap();
        assert_eq!(layout.channel_height, 20);
        let renderer = ColumnRenderer::new(layout, peak, rms);

        let full = ColumnStat {
            peak_positive: 1.0,
            peak_negative: -1.0,
            rms: 0.0,
        };
        renderer.draw_peak(&mut canvas, 0, 1, &full);

        let col = column(&canvas, 0);
        // Second band starts at 23, center 33, reaching 10px each way (clipped at 42)
        assert_eq!(col[22], 0);
        assert!((23..43).all(|y| col[y] == peak));
        assert!((0..=22).all(|y| col[y] == 0));
    }

    #[test]
    fn test_deferred_scaling_fills_half_height() {
        let mut deferred = DeferredRms::with_capacity(3).unwrap();
        for (x, extent) in [(0, 2), (1, 4), (2, 1)] {
            deferred.push(RmsRecord {
                x,
                channel: 0,
                extent,
            });
        }

        assert_eq!(deferred.scale_factor(40), 10.0);
        let extents: Vec<i32> = deferred.scaled(40).map(|(_, e)| e).collect();
        assert_eq!(extents, vec![20, 40, 10]);
    }

    #[test]
    fn test_deferred_silence_is_unscaled() {
        let mut deferred = DeferredRms::with_capacity(2).unwrap();
        deferred.push(RmsRecord {
            x: 0,
            channel: 0,
            extent: 0,
        });
        assert_eq!(deferred.scale_factor(40), 1.0);
        assert_eq!(deferred.scaled(40).next().map(|(_, e)| e), Some(0));
    }

    #[test]
    fn test_deferred_draw() {
        let (mut canvas, rms, peak) = setup(2, 21);
        let layout = ChannelLayout::new(21, 1, 0).unwrap();
        let renderer = ColumnRenderer::new(layout, peak, rms);

        let mut deferred = DeferredRms::with_capacity(2).unwrap();
        deferred.push(RmsRecord {
            x: 0,
            channel: 0,
            extent: 4,
        });
        deferred.push(RmsRecord {
            x: 1,
            channel: 0,
            extent: 2,
        });
        deferred.draw(&renderer, &mut canvas);

        // Loudest column fills the band, the other one half of it
        assert!(column(&canvas, 0).iter().all(|&c| c == rms));
        let quiet = column(&canvas, 1);
        assert_eq!(quiet[4], 0);
        assert!((5..=15).all(|y| quiet[y] == rms));
        assert_eq!(quiet[16], 0);
    }

    #[test]
    fn test_deferred_scaling_uses_whole_pixel_extents() {
        let layout = ChannelLayout::new(101, 1, 0).unwrap();
        let renderer = ColumnRenderer::new(layout, 2, 1);
        let quiet = ColumnStat {
            rms: 0.046,
            ..ColumnStat::default()
        };
        let loud = ColumnStat {
            rms: 0.2,
            ..ColumnStat::default()
        };
        assert_eq!(renderer.rms_extent(&quiet), 2);
        assert_eq!(renderer.rms_extent(&loud), 10);

        let mut deferred = DeferredRms::with_capacity(2).unwrap();
        for (x, stat) in [(0, &quiet), (1, &loud)] {
            deferred.push(RmsRecord {
                x,
                channel: 0,
                extent: renderer.rms_extent(stat),
            });
        }

        // 2px scaled by 50 / 10, not 2.3px rounded up after scaling
        let extents: Vec<i32> = deferred.scaled(50).map(|(_, e)| e).collect();
        assert_eq!(extents, vec![10, 50]);
    }

    #[test]
    fn test_deferred_scaling_rounds_up() {
        let mut deferred = DeferredRms::with_capacity(2).unwrap();
        for (x, extent) in [(0, 1), (1, 3)] {
            deferred.push(RmsRecord {
                x,
                channel: 0,
                extent,
            });
        }
        let extents: Vec<i32> = deferred.scaled(10).map(|(_, e)| e).collect();
        assert_eq!(extents, vec![4, 10]);
    }
}
