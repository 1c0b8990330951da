//! Render configuration file management for waveformgen.
//!
//! This module handles loading render options from TOML files. Every field has a
//! default, so a config file only needs to list the values it changes. Command-line
//! options are applied on top of whatever is loaded here.

use crate::error::WaveformError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Widths at or below this are rejected before any decoding starts.
pub const MIN_WIDTH: u32 = 10;

/// Largest width or height the pixel coordinates can address.
pub const MAX_DIMENSION: u32 = i32::MAX as u32;

/// An RGB color triple, written as `RRGGBB` in config files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn gray(level: u8) -> Self {
        Rgb(level, level, level)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Invalid color '{s}'. Expected RRGGBB"));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("Invalid color '{s}'. Expected RRGGBB"))
        };

        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Options for one waveform render.
///
/// Immutable once rendering begins; the renderer only ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels, one column per downsampled window
    pub width: u32,
    /// Image height in pixels, including the timeline band when enabled
    pub height: u32,
    /// Mark the background color as transparent in the output image
    pub transparent_background: bool,
    pub background_color: Rgb,
    pub rms_color: Rgb,
    pub peak_color: Rgb,
    /// Mix all channels into a single drawing channel
    pub mix_channels: bool,
    /// Vertical gap between channel bands in pixels
    pub channel_spacing: u32,
    pub draw_timeline: bool,
    pub timeline_color: Rgb,
    /// Color of marks that do not fall on a whole minute
    pub timeline_odd_color: Rgb,
    pub timeline_background_color: Rgb,
    /// Desired horizontal distance between timeline marks in pixels
    pub mark_spacing: u32,
    /// Draw an unlabeled tick at every elapsed minute
    pub draw_mark_every_minute: bool,
    /// Rescale RMS so the loudest column fills the channel's half-height
    pub scale_rms: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 800,
            height: 120,
            transparent_background: false,
            background_color: Rgb::gray(255),
            rms_color: Rgb::gray(150),
            peak_color: Rgb::gray(80),
            mix_channels: false,
            channel_spacing: 3,
            draw_timeline: false,
            timeline_color: Rgb::gray(20),
            timeline_odd_color: Rgb::gray(140),
            timeline_background_color: Rgb::gray(230),
            mark_spacing: 80,
            draw_mark_every_minute: false,
            scale_rms: false,
        }
    }
}

impl RenderConfig {
    /// Loads configuration from an explicit path, the user's config directory, or defaults.
    ///
    /// An explicit path must exist. The default location is optional.
    ///
    /// # Errors
    /// - If the config file cannot be read
    /// - If the TOML is malformed
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match get_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let config = Self::load_from(&path)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses a config file at `path`.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {e}", path.display())
        })?;
        let config: RenderConfig = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Invalid config file '{}': {e}", path.display())
        })?;
        Ok(config)
    }

    /// Rejects configurations that cannot produce an image.
    ///
    /// # Errors
    /// - If the width is not greater than [`MIN_WIDTH`]
    /// - If the height is zero
    /// - If either side exceeds [`MAX_DIMENSION`]
    pub fn validate(&self) -> Result<(), WaveformError> {
        if self.width <= MIN_WIDTH {
            return Err(WaveformError::InvalidConfig(format!(
                "Please specify a width greater than {MIN_WIDTH}!"
            )));
        }
        if self.height == 0 {
            return Err(WaveformError::InvalidConfig(
                "Please specify a height greater than 0!".to_string(),
            ));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(WaveformError::InvalidConfig(format!(
                "Please specify a width and height of at most {MAX_DIMENSION}!"
            )));
        }
        Ok(())
    }
}

/// Retrieves the path of the default config file, if a home directory is known.
pub fn get_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".config")
            .join("waveformgen")
            .join("waveformgen.toml")
    })
}
