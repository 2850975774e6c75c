//! Glyph mapping for converting sampled pixels to ASCII art.
//!
//! This module holds the per-frame mapping pipeline:
//!
//! 1. **Grid** - density (0-100) to cell size in device pixels
//! 2. **Luminance** - RGB to perceptual brightness using BT.601
//! 3. **Palette lookup** - brightness to a glyph from a named palette
//! 4. **Output** - paint commands for a surface, or a plain-text grid
//!
//! # Palettes
//!
//! Four palettes are registered, see [`Palette`]:
//! - `Standard` - 29-glyph density ramp
//! - `Minimal` - 5 shade blocks
//! - `Blocks` - 9 vertical fill blocks
//! - `Matrix` - half-width katakana and digits

mod grid;
mod luminance;
mod mapping;
mod palette;
mod settings;

pub use grid::{cell_size, clamp_density, DEFAULT_DENSITY, MAX_CELL, MIN_CELL};
pub use luminance::{glyph_index, luminance};
pub use mapping::{
    map_grid, map_to_glyphs, map_to_text, CellColor, GlyphCell, GlyphGrid, PaintCommand,
    ALPHA_THRESHOLD,
};
pub use palette::{
    Palette, BLOCKS_PALETTE, MATRIX_PALETTE, MINIMAL_PALETTE, STANDARD_PALETTE,
};
pub use settings::{RenderConfig, Theme};
