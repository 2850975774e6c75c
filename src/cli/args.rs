//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{PaletteName, ThemeName};

/// Real-time ASCII photobooth for the terminal
#[derive(Parser, Debug)]
#[command(name = "ascii-booth")]
#[command(version, about = "Render images and frame feeds as ASCII art", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

/// Render settings shared by every rendering subcommand.
/// Unset options fall back to the config file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RenderOptions {
    /// Grid density 0-100 (higher is finer)
    #[arg(long, short)]
    pub density: Option<i32>,

    /// Character palette
    #[arg(long, short)]
    pub palette: Option<PaletteName>,

    /// Colour each glyph with its sampled colour
    #[arg(long)]
    pub color: bool,

    /// Surface theme
    #[arg(long)]
    pub theme: Option<ThemeName>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one image as ASCII art
    Render {
        /// Image file (PNG or JPEG)
        image: PathBuf,

        #[command(flatten)]
        render: RenderOptions,

        /// Write the text and PNG exports instead of printing
        #[arg(long)]
        save: bool,

        /// Export directory (default from config)
        #[arg(long, short)]
        out_dir: Option<PathBuf>,
    },
    /// Play an image or a directory of frames as a live feed
    Live {
        /// Image file or directory of frames
        path: PathBuf,

        #[command(flatten)]
        render: RenderOptions,

        /// Frames per second (default from config)
        #[arg(long)]
        fps: Option<u32>,

        /// Start at the target density instead of easing in
        #[arg(long)]
        no_transition: bool,
    },
    /// Run the photo capture sequence against a frame feed
    Strip {
        /// Image file or directory of frames
        path: PathBuf,

        #[command(flatten)]
        render: RenderOptions,

        /// Take a single photo instead of a four-photo strip
        #[arg(long)]
        single: bool,

        /// Print status events as JSON lines
        #[arg(long)]
        json: bool,

        /// Caption printed in the strip footer (default: today's date)
        #[arg(long)]
        caption: Option<String>,

        /// Do not mirror captured photos
        #[arg(long)]
        no_mirror: bool,

        /// Export directory (default from config)
        #[arg(long, short)]
        out_dir: Option<PathBuf>,
    },
    /// List available palettes
    Palettes,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
    /// Print the config file path
    Path,
}
