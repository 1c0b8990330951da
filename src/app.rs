//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::config::{RenderConfig, Rgb};
use crate::logging;
use anyhow::anyhow;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use regex::Regex;
use std::io;
use std::path::PathBuf;

/// Render peak and RMS waveform images from audio files
#[derive(Parser)]
#[command(name = "waveformgen")]
#[command(version, disable_version_flag = true)]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "Render a PNG image of the peak and RMS amplitude envelope of an audio file,\noptionally with a timeline ruler.\n\nDEFAULT COMMAND:\n    If no command is specified, 'render' is used by default.\n\nEXAMPLES:\n    # Render with default options\n    $ waveformgen song.wav song.png\n\n    # 1200x200, mixed channels, timeline with a tick every minute\n    $ waveformgen -d 1200x200 -m -l -e song.wav song.png\n\n    # Transparent background, RMS scaled to the loudest passage\n    $ waveformgen -t -j -i song.wav -o song.png")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/waveformgen/waveformgen.toml\n    Logs:               ~/.local/state/waveformgen/waveformgen.log.*"
)]
struct Cli {
    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,

    #[command(flatten)]
    render: RenderArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a waveform image (default)
    #[command(visible_alias = "r")]
    Render(RenderArgs),

    /// Open configuration file in your preferred editor
    ///
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   waveformgen completions bash > waveformgen.bash
    ///   waveformgen completions zsh > _waveformgen
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Uncompressed audio file to read (.wav or .aif)
    #[arg(value_name = "INFILE")]
    infile: Option<PathBuf>,

    /// Location to write the PNG image to
    #[arg(value_name = "OUTFILE")]
    outfile: Option<PathBuf>,

    /// Input file (alternative to INFILE)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (alternative to OUTFILE)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Read options from this config file instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Image dimension as [width]x[height]
    #[arg(short, long, value_name = "WxH", value_parser = parse_dimension)]
    dimension: Option<(u32, u32)>,

    /// Transparent background
    #[arg(short, long)]
    transparent: bool,

    /// Scale RMS so the loudest passage fills the channel height
    #[arg(short = 'j', long)]
    scale_rms: bool,

    /// Background color
    #[arg(short, long, value_name = "RRGGBB")]
    background: Option<Rgb>,

    /// RMS color
    #[arg(short, long, value_name = "RRGGBB")]
    rms_color: Option<Rgb>,

    /// Peak color
    #[arg(short, long, value_name = "RRGGBB")]
    peak_color: Option<Rgb>,

    /// Space between channels in pixels
    #[arg(short = 's', long, value_name = "SPC", allow_negative_numbers = true)]
    channel_spacing: Option<i64>,

    /// Mix all channels into one
    #[arg(short, long)]
    mix: bool,

    /// Draw a timeline
    #[arg(short = 'l', long)]
    timeline: bool,

    /// Space between timeline marks in pixels
    #[arg(short = 'a', long, value_name = "SPC", allow_negative_numbers = true)]
    mark_spacing: Option<i64>,

    /// Timeline color
    #[arg(short = 'c', long, value_name = "RRGGBB")]
    timeline_color: Option<Rgb>,

    /// Color of marks that are not on a whole minute
    #[arg(short = 'x', long, value_name = "RRGGBB")]
    odd_mark_color: Option<Rgb>,

    /// Timeline background color
    #[arg(short = 'g', long, value_name = "RRGGBB")]
    timeline_background: Option<Rgb>,

    /// Draw a mark for every minute
    #[arg(short, long)]
    every_minute: bool,
}

impl RenderArgs {
    /// Applies command-line overrides on top of `config`.
    ///
    /// Non-positive spacings are ignored and leave the configured value in place.
    fn apply_to(&self, config: &mut RenderConfig) {
        if let Some((width, height)) = self.dimension {
            config.width = width;
            config.height = height;
        }

        config.transparent_background |= self.transparent;
        config.scale_rms |= self.scale_rms;
        config.mix_channels |= self.mix;
        config.draw_timeline |= self.timeline;
        config.draw_mark_every_minute |= self.every_minute;

        if let Some(spacing) = positive(self.channel_spacing) {
            config.channel_spacing = spacing;
        }
        if let Some(spacing) = positive(self.mark_spacing) {
            config.mark_spacing = spacing;
        }

        let colors = [
            (self.background, &mut config.background_color),
            (self.rms_color, &mut config.rms_color),
            (self.peak_color, &mut config.peak_color),
            (self.timeline_color, &mut config.timeline_color),
            (self.odd_mark_color, &mut config.timeline_odd_color),
            (self.timeline_background, &mut config.timeline_background_color),
        ];
        for (value, slot) in colors {
            if let Some(color) = value {
                *slot = color;
            }
        }
    }

    /// Resolves input and output paths; positional arguments win over `-i`/`-o`.
    fn paths(&self) -> anyhow::Result<(PathBuf, PathBuf)> {
        let input = self
            .infile
            .clone()
            .or_else(|| self.input.clone())
            .ok_or_else(|| anyhow!("You have to specify an input file!"))?;
        let output = self
            .outfile
            .clone()
            .or_else(|| self.output.clone())
            .ok_or_else(|| anyhow!("You have to specify an output file!"))?;
        Ok((input, output))
    }
}

fn positive(value: Option<i64>) -> Option<u32> {
    value
        .filter(|&v| v > 0)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}

/// Parses a `WIDTHxHEIGHT` dimension with both sides positive.
fn parse_dimension(s: &str) -> Result<(u32, u32), String> {
    let regex = Regex::new(r"^\s*(\d+)\s*[xX]\s*(\d+)\s*$").map_err(|e| e.to_string())?;

    let invalid = || format!("Could not parse dimension '{s}'. Expected [width]x[height]");
    let caps = regex.captures(s).ok_or_else(invalid)?;
    let width: u32 = caps[1].parse().map_err(|_| invalid())?;
    let height: u32 = caps[2].parse().map_err(|_| invalid())?;

    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

/// Runs the main application based on command-line arguments.
///
/// # Exit Codes
/// - 0: Success
/// - 1: General error
/// - 2: Usage error (invalid arguments)
///
/// # Errors
/// - If the configuration cannot be loaded or is rejected
/// - If rendering or command execution fails
pub fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "waveformgen", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Logs) => return commands::handle_logs(),
        _ => {}
    }

    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: logging disabled: {e}");
    }

    match cli.command {
        None => run_render(&cli.render),
        Some(Commands::Render(args)) => run_render(&args),
        Some(Commands::Config) => commands::handle_config(),
        Some(Commands::Completions { .. }) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }
}

fn run_render(args: &RenderArgs) -> anyhow::Result<()> {
    let (input, output) = args.paths()?;

    let mut config = RenderConfig::load(args.config.as_deref())?;
    args.apply_to(&mut config);

    commands::handle_render(&input, &output, &config)?;
    println!("Saved waveform image to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("800x120"), Ok((800, 120)));
        assert_eq!(parse_dimension(" 64 X 32 "), Ok((64, 32)));
        assert!(parse_dimension("800").is_err());
        assert!(parse_dimension("0x120").is_err());
        assert!(parse_dimension("800x-1").is_err());
        assert!(parse_dimension("axb").is_err());
    }

    #[test]
    fn test_default_command_flags() {
        let cli = Cli::try_parse_from([
            "waveformgen", "-d", "1000x200", "-m", "-l", "-e", "-s", "7", "-a", "-5", "-p",
            "FF0000", "in.wav", "out.png",
        ])
        .unwrap();
        assert!(cli.command.is_none());

        let mut config = RenderConfig::default();
        cli.render.apply_to(&mut config);
        assert_eq!((config.width, config.height), (1000, 200));
        assert!(config.mix_channels && config.draw_timeline && config.draw_mark_every_minute);
        assert_eq!(config.channel_spacing, 7);
        // Negative mark spacing is ignored
        assert_eq!(config.mark_spacing, 80);
        assert_eq!(config.peak_color, Rgb(255, 0, 0));
        assert_eq!(config.rms_color, RenderConfig::default().rms_color);

        let (input, output) = cli.render.paths().unwrap();
        assert_eq!(input, PathBuf::from("in.wav"));
        assert_eq!(output, PathBuf::from("out.png"));
    }

    #[test]
    fn test_input_output_flags() {
        let cli = Cli::try_parse_from(["waveformgen", "-o", "out.png", "-i", "in.wav"]).unwrap();
        let (input, output) = cli.render.paths().unwrap();
        assert_eq!(input, PathBuf::from("in.wav"));
        assert_eq!(output, PathBuf::from("out.png"));

        let cli = Cli::try_parse_from(["waveformgen", "in.wav"]).unwrap();
        assert!(cli.render.paths().is_err());
    }

    #[test]
    fn test_invalid_color_is_usage_error() {
        assert!(Cli::try_parse_from(["waveformgen", "-b", "zzzzzz", "a.wav", "b.png"]).is_err());
    }

    #[test]
    fn test_short_version_flag() {
        let err = Cli::try_parse_from(["waveformgen", "-v"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["waveformgen", "render", "-t", "a.wav", "b.png"]).unwrap();
        match cli.command {
            Some(Commands::Render(args)) => assert!(args.transparent),
            _ => panic!("expected render command"),
        }

        let cli = Cli::try_parse_from(["waveformgen", "logs"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Logs)));
    }
}
