//! Render configuration and colour themes.

use serde::{Deserialize, Serialize};

use super::grid::{clamp_density, DEFAULT_DENSITY};
use super::mapping::CellColor;
use super::palette::Palette;

/// Per-tick render settings, mutated by the UI layer and read by the mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Grid density, 0-100. Values outside the range are tolerated and
    /// clamped where they are read.
    pub density: i32,
    /// Paint every glyph in the theme's text colour instead of its sampled colour
    pub monochrome: bool,
    /// Registry name of the palette; unknown names render with the default
    pub palette_name: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            monochrome: true,
            palette_name: Palette::default().name().to_string(),
        }
    }
}

impl RenderConfig {
    /// Density clamped into `[0, 100]`.
    pub fn density(&self) -> i32 {
        clamp_density(self.density)
    }

    /// The palette this configuration resolves to. Read every tick, so an
    /// unknown name falls back quietly; [`Palette::from_name`] reports it.
    pub fn palette(&self) -> Palette {
        Palette::lookup(&self.palette_name).unwrap_or_default()
    }
}

/// Colour theme for the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Near-black background, light grey glyphs
    #[default]
    Dark,
    /// Green phosphor terminal look
    Retro,
}

impl Theme {
    /// Fill colour for the surface before glyphs are painted.
    pub fn background(&self) -> CellColor {
        match self {
            Theme::Dark => CellColor::new(10, 10, 10),
            Theme::Retro => CellColor::new(0, 20, 0),
        }
    }

    /// Glyph colour used in monochrome mode.
    pub fn text(&self) -> CellColor {
        match self {
            Theme::Dark => CellColor::new(230, 230, 230),
            Theme::Retro => CellColor::new(51, 255, 102),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Retro => "retro",
        }
    }
}
