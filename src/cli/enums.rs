//! CLI enum types for palette and theme options.

use clap::ValueEnum;

use crate::ascii::{Palette, Theme};

/// Character palette for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PaletteName {
    #[default]
    Standard,
    Minimal,
    Blocks,
    Matrix,
}

impl From<PaletteName> for Palette {
    fn from(p: PaletteName) -> Self {
        match p {
            PaletteName::Standard => Palette::Standard,
            PaletteName::Minimal => Palette::Minimal,
            PaletteName::Blocks => Palette::Blocks,
            PaletteName::Matrix => Palette::Matrix,
        }
    }
}

/// Surface colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ThemeName {
    #[default]
    Dark,
    Retro,
}

impl From<ThemeName> for Theme {
    fn from(t: ThemeName) -> Self {
        match t {
            ThemeName::Dark => Theme::Dark,
            ThemeName::Retro => Theme::Retro,
        }
    }
}
