//! waveformgen: renders peak and RMS waveform images of audio files.

mod app;
mod audio;
mod commands;
mod config;
mod error;
mod logging;
mod render;

fn main() {
    if let Err(e) = app::run() {
        tracing::error!("{e:#}");
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}
