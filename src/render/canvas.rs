//! Palette-indexed raster canvas with PNG output.
//!
//! Pixels hold palette indices and start at index 0, so the first color allocated
//! becomes the background. All drawing operations clip silently to the canvas bounds.

use crate::config::Rgb;
use crate::error::{Result, WaveformError};
use png::{BitDepth, ColorType, Encoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub type ColorIndex = u8;

const MAX_COLORS: usize = 256;

pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<ColorIndex>,
    palette: Vec<Rgb>,
    transparent: Option<ColorIndex>,
}

impl Canvas {
    /// Allocates a `width` x `height` canvas.
    ///
    /// # Errors
    /// - If the pixel buffer cannot be reserved
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| WaveformError::Allocation(format!("image of {width}x{height}")))?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| WaveformError::Allocation(format!("image of {width}x{height}")))?;
        pixels.resize(len, 0);

        Ok(Self {
            width,
            height,
            pixels,
            palette: Vec::new(),
            transparent: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Adds `color` to the palette and returns its index.
    ///
    /// # Errors
    /// - If the palette already holds 256 colors
    pub fn allocate_color(&mut self, color: Rgb) -> Result<ColorIndex> {
        if self.palette.len() >= MAX_COLORS {
            return Err(WaveformError::Allocation(format!(
                "palette entry for {color} (palette full)"
            )));
        }
        self.palette.push(color);
        Ok((self.palette.len() - 1) as ColorIndex)
    }

    /// Marks a palette entry as fully transparent in the encoded image.
    pub fn set_transparent(&mut self, color: ColorIndex) {
        self.transparent = Some(color);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[cfg(test)]
    pub fn pixel(&self, x: i32, y: i32) -> Option<ColorIndex> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: ColorIndex) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Draws the vertical segment from `y1` to `y2` inclusive, in either order.
    pub fn vertical_line(&mut self, x: i32, y1: i32, y2: i32, color: ColorIndex) {
        if x < 0 || x >= self.width as i32 {
            return;
        }
        let top = y1.min(y2).max(0);
        let bottom = y1.max(y2).min(self.height as i32 - 1);
        for y in top..=bottom {
            self.set_pixel(x, y, color);
        }
    }

    /// Fills the rectangle spanned by two inclusive corners.
    pub fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: ColorIndex) {
        let left = x1.min(x2).max(0);
        let right = x1.max(x2).min(self.width as i32 - 1);
        for x in left..=right {
            self.vertical_line(x, y1, y2, color);
        }
    }

    /// Encodes the canvas as an 8-bit indexed PNG.
    ///
    /// # Errors
    /// - If the encoder fails or the writer returns an I/O error
    pub fn write_png<W: Write>(&self, writer: W) -> Result<()> {
        let mut encoder = Encoder::new(writer, self.width, self.height);
        encoder.set_color(ColorType::Indexed);
        encoder.set_depth(BitDepth::Eight);

        // PNG requires at least one palette entry
        let mut palette: Vec<u8> = self
            .palette
            .iter()
            .flat_map(|c| [c.0, c.1, c.2])
            .collect();
        if palette.is_empty() {
            palette.extend_from_slice(&[0, 0, 0]);
        }
        encoder.set_palette(palette);

        if let Some(transparent) = self.transparent {
            let mut trns = vec![255u8; transparent as usize + 1];
            trns[transparent as usize] = 0;
            encoder.set_trns(trns);
        }

        let mut png_writer = encoder.write_header()?;
        png_writer.write_image_data(&self.pixels)?;
        png_writer.finish()?;
        Ok(())
    }

    /// Writes the canvas to `path` as a PNG file.
    ///
    /// # Errors
    /// - If the destination cannot be created
    /// - If encoding fails
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| WaveformError::OutputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_png(BufWriter::new(file))?;
        tracing::debug!("Wrote {}x{} PNG to {}", self.width, self.height, path.display());
        Ok(())
    }
}
