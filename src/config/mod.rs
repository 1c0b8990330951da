//! Configuration management for waveformgen.
//!
//! This module handles loading render options from TOML files. Configuration is stored
//! in the user's config directory and is entirely optional: built-in defaults apply to
//! anything the file leaves out.

pub mod file;

pub use file::{get_config_path, RenderConfig, Rgb};
