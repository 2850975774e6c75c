//! Sampled pixels to glyph grid mapping.

use super::grid::cell_size;
use super::luminance::{glyph_index, luminance};
use super::settings::{RenderConfig, Theme};

/// Cells whose sampled alpha is below this are treated as transparent.
pub const ALPHA_THRESHOLD: u8 = 10;

/// RGB colour of a glyph or surface fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl CellColor {
    pub const BLACK: CellColor = CellColor::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS `rgb(r,g,b)` notation.
    pub fn css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// One cell of a mapped grid.
///
/// Transparent or out-of-buffer cells hold a blank glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphCell {
    pub ch: char,
    pub color: CellColor,
}

impl GlyphCell {
    pub const BLANK: GlyphCell = GlyphCell {
        ch: ' ',
        color: CellColor::BLACK,
    };

    /// Whether painting this cell would draw nothing.
    pub fn is_blank(&self) -> bool {
        self.ch.is_whitespace()
    }
}

/// A single glyph draw for a text-rendering surface.
///
/// `x`/`y` are the top-left corner of the cell in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintCommand {
    pub ch: char,
    pub color: CellColor,
    pub x: u32,
    pub y: u32,
}

/// Glyph grid produced from one sample buffer.
///
/// Cells are stored in row-major order; `cols * rows == cells.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphGrid {
    pub cells: Vec<GlyphCell>,
    pub cols: u32,
    pub rows: u32,
    /// Cell edge in device pixels
    pub cell_size: u32,
}

impl GlyphGrid {
    /// A grid with no cells.
    pub fn empty(cell_size: u32) -> Self {
        Self {
            cells: Vec::new(),
            cols: 0,
            rows: 0,
            cell_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at a grid coordinate.
    pub fn get(&self, col: u32, row: u32) -> Option<&GlyphCell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get((row * self.cols + col) as usize)
    }

    /// Paint commands for every non-blank cell.
    ///
    /// In monochrome mode every glyph uses `foreground`, otherwise each glyph
    /// keeps the colour sampled for its cell.
    pub fn paint_commands(&self, monochrome: bool, foreground: CellColor) -> Vec<PaintCommand> {
        if self.cols == 0 {
            return Vec::new();
        }
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_blank())
            .map(|(i, cell)| {
                let col = i as u32 % self.cols;
                let row = i as u32 / self.cols;
                PaintCommand {
                    ch: cell.ch,
                    color: if monochrome { foreground } else { cell.color },
                    x: col * self.cell_size,
                    y: row * self.cell_size,
                }
            })
            .collect()
    }

    /// Plain-text grid: one character per cell, one `\n`-terminated line per row.
    pub fn to_text(&self) -> String {
        if self.cols == 0 || self.rows == 0 {
            return String::new();
        }

        let mut out = String::with_capacity(self.cells.len() + self.rows as usize);
        for row in self.cells.chunks(self.cols as usize) {
            out.extend(row.iter().map(|c| c.ch));
            out.push('\n');
        }
        out
    }
}

/// Map an RGBA pixel buffer to a glyph grid.
///
/// The grid uses square cells of [`cell_size`]`(config.density)` pixels. Each
/// cell samples the single pixel at its top-left corner (nearest neighbour),
/// skips it when the alpha is below [`ALPHA_THRESHOLD`], and otherwise picks a
/// palette glyph from the pixel's luminance.
///
/// A zero-sized or missing buffer produces an empty grid. Pixels beyond the end
/// of a short buffer are treated as transparent.
pub fn map_grid(pixels: &[u8], width: u32, height: u32, config: &RenderConfig) -> GlyphGrid {
    let cell = cell_size(config.density());
    if width == 0 || height == 0 || pixels.is_empty() {
        return GlyphGrid::empty(cell);
    }

    let chars = config.palette().chars();
    let cols = width.div_ceil(cell);
    let rows = height.div_ceil(cell);
    let mut cells = Vec::with_capacity((cols as usize) * (rows as usize));

    for y in (0..height).step_by(cell as usize) {
        for x in (0..width).step_by(cell as usize) {
            cells.push(sample_cell(pixels, width, x, y, chars));
        }
    }

    GlyphGrid {
        cells,
        cols,
        rows,
        cell_size: cell,
    }
}

/// Map an RGBA pixel buffer straight to paint commands.
pub fn map_to_glyphs(
    pixels: &[u8],
    width: u32,
    height: u32,
    config: &RenderConfig,
    theme: Theme,
) -> Vec<PaintCommand> {
    map_grid(pixels, width, height, config).paint_commands(config.monochrome, theme.text())
}

/// Map an RGBA pixel buffer to the exported character grid.
pub fn map_to_text(pixels: &[u8], width: u32, height: u32, config: &RenderConfig) -> String {
    map_grid(pixels, width, height, config).to_text()
}

fn sample_cell(pixels: &[u8], width: u32, x: u32, y: u32, chars: &[char]) -> GlyphCell {
    if chars.is_empty() {
        return GlyphCell::BLANK;
    }

    let idx = (y as usize * width as usize + x as usize) * 4;
    let Some(px) = pixels.get(idx..idx + 4) else {
        return GlyphCell::BLANK;
    };

    if px[3] < ALPHA_THRESHOLD {
        return GlyphCell::BLANK;
    }

    let l = luminance(px[0], px[1], px[2]);
    GlyphCell {
        ch: chars[glyph_index(l, chars.len())],
        color: CellColor::new(px[0], px[1], px[2]),
    }
}
