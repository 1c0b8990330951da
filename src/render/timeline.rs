//! Time ruler drawn in a band along the bottom of the image.
//!
//! The band carries start and end labels, edge ticks, optional unlabeled ticks at every
//! whole minute, and labeled marks at a round interval chosen from the image width.

use super::canvas::{Canvas, ColorIndex};
use super::font::{draw_text, format_time, measure};
use super::marks::select_mark_interval;

/// Height of the ruler band in pixels.
pub const TIMELINE_HEIGHT: u32 = 13;

const TICK_LENGTH: i32 = 4;
/// Label top offset from the top of the band
const LABEL_OFFSET: i32 = 5;
/// Marks closer than this to the right edge would run into the end label
const END_LABEL_MARGIN: i32 = 50;

#[derive(Debug, Clone, Copy)]
pub struct TimelineColors {
    pub line: ColorIndex,
    /// Marks that do not fall on a whole minute
    pub odd: ColorIndex,
    pub background: ColorIndex,
}

/// A labeled ruler mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub x: i32,
    pub seconds: u64,
}

impl Mark {
    pub fn on_minute(&self) -> bool {
        self.seconds % 60 == 0
    }
}

fn position(seconds: f64, duration_secs: f64, width: i32) -> i32 {
    (seconds * width as f64 / duration_secs) as i32
}

pub struct TimelineRenderer {
    colors: TimelineColors,
    mark_spacing: u32,
    mark_every_minute: bool,
}

impl TimelineRenderer {
    pub fn new(colors: TimelineColors, mark_spacing: u32, mark_every_minute: bool) -> Self {
        Self {
            colors,
            mark_spacing,
            mark_every_minute,
        }
    }

    /// Labeled marks for an image `width` pixels wide covering `duration_secs`.
    pub fn marks(&self, width: i32, duration_secs: f64) -> Vec<Mark> {
        if duration_secs <= 0.0 {
            return Vec::new();
        }

        let spacing = self.mark_spacing.max(1);
        let max_marks = width.max(0) as u32 / spacing;
        let interval = select_mark_interval(duration_secs, max_marks);
        let count = (duration_secs / f64::from(interval)).floor() as u64;
        let margin = (spacing as i32 / 2).max(END_LABEL_MARGIN);

        tracing::debug!(
            "Timeline: {} marks max, every {}s ({} candidates)",
            max_marks,
            interval,
            count
        );

        (1..=count)
            .map(|k| {
                let seconds = k * u64::from(interval);
                Mark {
                    x: position(seconds as f64, duration_secs, width),
                    seconds,
                }
            })
            .filter(|mark| width - mark.x >= margin)
            .collect()
    }

    /// X positions of the per-minute ticks.
    pub fn minute_ticks(&self, width: i32, duration_secs: f64) -> Vec<i32> {
        if !self.mark_every_minute || duration_secs <= 0.0 {
            return Vec::new();
        }
        let minutes = (duration_secs / 60.0).floor() as u64;
        (1..=minutes)
            .map(|minute| position((minute * 60) as f64, duration_secs, width))
            .collect()
    }

    fn tick(&self, canvas: &mut Canvas, x: i32, top: i32, color: ColorIndex) {
        canvas.vertical_line(x, top, top + TICK_LENGTH - 1, color);
    }

    /// Draws the ruler into the bottom [`TIMELINE_HEIGHT`] rows of `canvas`.
    pub fn draw(&self, canvas: &mut Canvas, duration_secs: f64) {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;
        let top = height - TIMELINE_HEIGHT as i32;
        let label_y = top + LABEL_OFFSET;
        let line = self.colors.line;

        canvas.fill_rect(0, top, width - 1, height - 1, self.colors.background);

        draw_text(canvas, &format_time(0), 1, label_y, line);
        let end_label = format_time(duration_secs.max(0.0) as u64);
        // The advance includes one pixel of trailing space
        let end_x = width + 1 - measure(&end_label);
        draw_text(canvas, &end_label, end_x, label_y, line);

        self.tick(canvas, 0, top, line);
        self.tick(canvas, width - 1, top, line);

        for x in self.minute_ticks(width, duration_secs) {
            self.tick(canvas, x, top, line);
        }

        for mark in self.marks(width, duration_secs) {
            let color = if mark.on_minute() {
                line
            } else {
                self.colors.odd
            };
            let label = format_time(mark.seconds);
            self.tick(canvas, mark.x, top, color);
            draw_text(canvas, &label, mark.x - measure(&label) / 2, label_y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rgb;

    struct Fixture {
        canvas: Canvas,
        colors: TimelineColors,
    }

    fn fixture(width: u32, height: u32) -> Fixture {
        let mut canvas = Canvas::new(width, height).unwrap();
        canvas.allocate_color(Rgb::gray(255)).unwrap();
        let colors = TimelineColors {
            line: canvas.allocate_color(Rgb::gray(20)).unwrap(),
            odd: canvas.allocate_color(Rgb::gray(140)).unwrap(),
            background: canvas.allocate_color(Rgb::gray(230)).unwrap(),
        };
        Fixture { canvas, colors }
    }

    #[test]
    fn test_marks_skip_right_edge() {
        let f = fixture(800, 40);
        let timeline = TimelineRenderer::new(f.colors, 80, false);

        let marks = timeline.marks(800, 125.0);
        let seconds: Vec<u64> = marks.iter().map(|m| m.seconds).collect();
        // 15s spacing; the 120s mark at x = 768 sits inside the end-label margin
        assert_eq!(seconds, vec![15, 30, 45, 60, 75, 90, 105]);
        assert_eq!(marks[0].x, 96);
        assert_eq!(marks[6].x, 672);
        assert!(marks[3].on_minute());
        assert!(!marks[2].on_minute());
    }

    #[test]
    fn test_wide_mark_spacing_widens_margin() {
        let f = fixture(1000, 40);
        let timeline = TimelineRenderer::new(f.colors, 300, false);
        // 3 marks max over 100s picks 60s; x = 600 is 400px from the edge
        let marks = timeline.marks(1000, 100.0);
        assert_eq!(marks, vec![Mark { x: 600, seconds: 60 }]);

        // 62s fits 30s marks; the 60s mark at x = 967 is inside the 150px margin
        let marks = timeline.marks(1000, 62.0);
        assert_eq!(marks, vec![Mark { x: 483, seconds: 30 }]);
    }

    #[test]
    fn test_no_marks_for_empty_duration() {
        let f = fixture(800, 40);
        let timeline = TimelineRenderer::new(f.colors, 80, true);
        assert!(timeline.marks(800, 0.0).is_empty());
        assert!(timeline.minute_ticks(800, 0.0).is_empty());
    }

    #[test]
    fn test_minute_ticks() {
        let f = fixture(300, 40);
        let timeline = TimelineRenderer::new(f.colors, 80, true);
        assert_eq!(timeline.minute_ticks(300, 150.0), vec![120, 240]);

        let off = TimelineRenderer::new(f.colors, 80, false);
        assert!(off.minute_ticks(300, 150.0).is_empty());
    }

    #[test]
    fn test_draw_band_labels_and_ticks() {
        let mut f = fixture(200, 40);
        let colors = f.colors;
        // Wide spacing suppresses adaptive marks so only minute ticks remain
        let timeline = TimelineRenderer::new(colors, 1000, true);
        timeline.draw(&mut f.canvas, 125.0);

        let top = 40 - TIMELINE_HEIGHT as i32;
        assert_eq!(f.canvas.pixel(100, top - 1), Some(0));
        assert_eq!(f.canvas.pixel(100, 39), Some(colors.background));

        // Edge ticks
        assert_eq!(f.canvas.pixel(0, top), Some(colors.line));
        assert_eq!(f.canvas.pixel(199, top + TICK_LENGTH - 1), Some(colors.line));
        assert_eq!(f.canvas.pixel(199, top + TICK_LENGTH), Some(colors.background));

        // Minute ticks at 60/125 and 120/125 of the width
        assert_eq!(f.canvas.pixel(96, top), Some(colors.line));
        assert_eq!(f.canvas.pixel(192, top), Some(colors.line));

        // "0:00" starts at x = 1; the leading zero's left stroke is on glyph row 1
        let label_y = top + LABEL_OFFSET;
        assert_eq!(f.canvas.pixel(1, label_y + 1), Some(colors.line));
        // "2:05" ends flush with the right edge
        assert_eq!(f.canvas.pixel(199, label_y + 4), Some(colors.line));
    }

    #[test]
    fn test_draw_colors_odd_marks() {
        let mut f = fixture(800, 40);
        let colors = f.colors;
        let timeline = TimelineRenderer::new(colors, 80, false);
        timeline.draw(&mut f.canvas, 125.0);

        let top = 40 - TIMELINE_HEIGHT as i32;
        // 15s is an odd mark, 60s is on the minute
        assert_eq!(f.canvas.pixel(96, top), Some(colors.odd));
        assert_eq!(f.canvas.pixel(384, top), Some(colors.line));
        // Suppressed 120s mark leaves the band untouched
        assert_eq!(f.canvas.pixel(768, top), Some(colors.background));
    }
}
