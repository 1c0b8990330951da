//! Tiny 5x7 bitmap font for timeline labels.
//!
//! Only the digits `0`-`9` and `:` exist. Advances are 6px per digit and 4px per colon,
//! with two hand-tuned kerning shifts: a colon pulls the pen 2px left before drawing, and
//! `1` pulls it 1px left.

use super::canvas::{Canvas, ColorIndex};

pub const GLYPH_WIDTH: i32 = 5;
pub const GLYPH_HEIGHT: i32 = 7;

const GLYPH_PIXELS: usize = (GLYPH_WIDTH * GLYPH_HEIGHT) as usize;
const COLON: usize = 10;

const DIGIT_ADVANCE: i32 = 6;
const COLON_ADVANCE: i32 = 4;

#[rustfmt::skip]
static GLYPHS: [u8; GLYPH_PIXELS * 11] = [
    // 0
    0,1,1,1,0,
    1,0,0,0,1,
    1,0,0,0,1,
    1,0,0,0,1,
    1,0,0,0,1,
    1,0,0,0,1,
    0,1,1,1,0,
    // 1
    0,0,0,1,0,
    0,0,1,1,0,
    0,1,0,1,0,
    0,0,0,1,0,
    0,0,0,1,0,
    0,0,0,1,0,
    0,0,0,1,0,
    // 2
    1,1,1,1,0,
    0,0,0,0,1,
    0,0,0,0,1,
    0,1,1,1,0,
    1,0,0,0,0,
    1,0,0,0,0,
    1,1,1,1,1,
    // 3
    1,1,1,1,0,
    0,0,0,0,1,
    0,0,0,0,1,
    0,1,1,1,0,
    0,0,0,0,1,
    0,0,0,0,1,
    1,1,1,1,0,
    // 4
    1,0,0,0,0,
    1,0,0,1,0,
    1,0,0,1,0,
    1,1,1,1,1,
    0,0,0,1,0,
    0,0,0,1,0,
    0,0,0,1,0,
    // 5
    1,1,1,1,1,
    1,0,0,0,0,
    1,0,0,0,0,
    1,1,1,1,0,
    0,0,0,0,1,
    0,0,0,0,1,
    1,1,1,1,0,
    // 6
    0,1,1,1,0,
    1,0,0,0,0,
    1,0,0,0,0,
    1,1,1,1,0,
    1,0,0,0,1,
    1,0,0,0,1,
    0,1,1,1,0,
    // 7
    1,1,1,1,1,
    0,0,0,0,1,
    0,0,0,1,0,
    0,0,1,0,0,
    0,0,1,0,0,
    0,0,1,0,0,
    0,0,1,0,0,
    // 8
    0,1,1,1,0,
    1,0,0,0,1,
    1,0,0,0,1,
    0,1,1,1,0,
    1,0,0,0,1,
    1,0,0,0,1,
    0,1,1,1,0,
    // 9
    0,1,1,1,0,
    1,0,0,0,1,
    1,0,0,0,1,
    0,1,1,1,1,
    0,0,0,0,1,
    0,0,0,0,1,
    0,1,1,1,0,
    // :
    0,0,0,0,0,
    0,0,1,0,0,
    0,0,0,0,0,
    0,0,0,0,0,
    0,0,0,0,0,
    0,0,1,0,0,
    0,0,0,0,0,
];

fn glyph(id: usize) -> &'static [u8] {
    &GLYPHS[id * GLYPH_PIXELS..(id + 1) * GLYPH_PIXELS]
}

/// Formats whole seconds as `M:SS`. Minutes are unbounded and unpadded.
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Lays `text` out from a pen position of 0, calling `plot` for every set pixel.
///
/// Returns the total advance. Characters outside the font are skipped.
fn layout(text: &str, mut plot: impl FnMut(i32, i32)) -> i32 {
    let mut offset = 0;

    for c in text.chars() {
        let (id, advance) = match c {
            '0'..='9' => (c as usize - '0' as usize, DIGIT_ADVANCE),
            ':' => (COLON, COLON_ADVANCE),
            _ => continue,
        };

        match c {
            ':' => offset -= 2,
            '1' => offset -= 1,
            _ => {}
        }

        for (i, &bit) in glyph(id).iter().enumerate() {
            if bit != 0 {
                let i = i as i32;
                plot(offset + i % GLYPH_WIDTH, i / GLYPH_WIDTH);
            }
        }

        offset += advance;
    }

    offset
}

/// Measures the advance of `text` without touching any pixels.
pub fn measure(text: &str) -> i32 {
    layout(text, |_, _| {})
}

/// Draws `text` with its top-left corner at (`x`, `y`) and returns the advance.
pub fn draw_text(canvas: &mut Canvas, text: &str, x: i32, y: i32, color: ColorIndex) -> i32 {
    layout(text, |dx, dy| canvas.set_pixel(x + dx, y + dy, color))
}
