//! Terminal surface using ANSI escape sequences.
//!
//! Each glyph cell maps to one terminal character cell. The frame is built
//! into a single string and written at once to reduce flicker.

use std::io::{self, Write};

use super::GlyphSurface;
use crate::ascii::{CellColor, PaintCommand};
use crate::camera::Resolution;

/// Draws glyph frames into a terminal.
pub struct TerminalSurface<W: Write> {
    out: W,
    /// Visible terminal size in character cells (cols, rows)
    bounds: (u16, u16),
    cell_size: u32,
    buffer: String,
    last_color: Option<CellColor>,
    /// Terminal cell right after the last written glyph (0-based col, row)
    cursor: Option<(u16, u16)>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            bounds: (cols, rows),
            cell_size: 1,
            buffer: String::new(),
            last_color: None,
            cursor: None,
        }
    }

    /// Update the visible terminal size after a resize.
    pub fn set_bounds(&mut self, cols: u16, rows: u16) {
        self.bounds = (cols, rows);
    }

    pub fn bounds(&self) -> (u16, u16) {
        self.bounds
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> GlyphSurface for TerminalSurface<W> {
    fn begin(
        &mut self,
        _size: Resolution,
        cell_size: u32,
        background: CellColor,
    ) -> io::Result<()> {
        self.cell_size = cell_size.max(1);
        self.buffer.clear();
        self.last_color = None;
        self.cursor = None;

        // Hide cursor, paint background, clear, home
        self.buffer.push_str("\x1b[?25l");
        self.buffer.push_str(&format!(
            "\x1b[48;2;{};{};{}m",
            background.r, background.g, background.b
        ));
        self.buffer.push_str("\x1b[2J\x1b[H");
        Ok(())
    }

    fn draw_glyph(&mut self, cmd: &PaintCommand) -> io::Result<()> {
        let col = cmd.x / self.cell_size;
        let row = cmd.y / self.cell_size;
        let (cols, rows) = self.bounds;
        if col >= cols as u32 || row >= rows as u32 {
            return Ok(());
        }
        let (col, row) = (col as u16, row as u16);

        if self.cursor != Some((col, row)) {
            // ANSI positions are 1-based
            self.buffer
                .push_str(&format!("\x1b[{};{}H", row + 1, col + 1));
        }
        if self.last_color != Some(cmd.color) {
            self.buffer.push_str(&format!(
                "\x1b[38;2;{};{};{}m",
                cmd.color.r, cmd.color.g, cmd.color.b
            ));
            self.last_color = Some(cmd.color);
        }
        self.buffer.push(cmd.ch);
        self.cursor = Some((col + 1, row));
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.buffer.push_str("\x1b[0m");
        self.out.write_all(self.buffer.as_bytes())?;
        self.out.flush()?;
        self.buffer.clear();
        Ok(())
    }
}
