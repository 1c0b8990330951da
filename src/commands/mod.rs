//! Application command handlers for waveformgen.
//!
//! # Commands
//! - `render`: Render a waveform image from an audio file (default)
//! - `config`: Open configuration file in user's preferred editor
//! - `logs`: Display recent log entries

pub mod config;
pub mod logs;
pub mod render;

pub use config::handle_config;
pub use logs::handle_logs;
pub use render::handle_render;
