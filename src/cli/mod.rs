//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction, RenderOptions};
pub use commands::{
    apply_render_options, handle_config_action, list_palettes, run_live, run_render, run_strip,
    StripOptions,
};
pub use enums::{PaletteName, ThemeName};
