//! Render surfaces that consume glyph paint commands.
//!
//! The glyph mapper produces [`PaintCommand`]s; a [`GlyphSurface`] turns them
//! into something visible:
//! - [`TerminalSurface`] draws cells with ANSI true-colour escapes
//! - [`RecordingSurface`] keeps painted frames in memory
//! - [`rasterize`] turns a painted frame into an RGBA image for export

mod raster;
mod screen;
mod terminal;

use std::io;

use crate::ascii::{CellColor, PaintCommand};
use crate::camera::Resolution;

pub use raster::{draw_centered_text, rasterize, RasterError, FONT_FAMILY};
pub use screen::{terminal_size, ScreenGuard};
pub use terminal::TerminalSurface;

/// A text-rendering surface.
///
/// A frame is always `begin`, zero or more `draw_glyph`, then `finish`.
pub trait GlyphSurface {
    /// Start a frame of `size` device pixels filled with `background`.
    fn begin(&mut self, size: Resolution, cell_size: u32, background: CellColor)
        -> io::Result<()>;

    /// Draw one glyph with its top-left corner at the command's position.
    fn draw_glyph(&mut self, cmd: &PaintCommand) -> io::Result<()>;

    /// Present the frame.
    fn finish(&mut self) -> io::Result<()>;
}

/// Everything painted by one tick, kept for visual export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintedFrame {
    pub size: Resolution,
    pub cell_size: u32,
    pub background: CellColor,
    pub commands: Vec<PaintCommand>,
}

impl PaintedFrame {
    /// Replay this frame onto a surface.
    pub fn paint_onto<S: GlyphSurface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        surface.begin(self.size, self.cell_size, self.background)?;
        for cmd in &self.commands {
            surface.draw_glyph(cmd)?;
        }
        surface.finish()
    }
}

/// Surface that only records what it was asked to paint.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub frames: Vec<PaintedFrame>,
    current: Option<PaintedFrame>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last completed frame.
    pub fn last(&self) -> Option<&PaintedFrame> {
        self.frames.last()
    }
}

impl GlyphSurface for RecordingSurface {
    fn begin(
        &mut self,
        size: Resolution,
        cell_size: u32,
        background: CellColor,
    ) -> io::Result<()> {
        self.current = Some(PaintedFrame {
            size,
            cell_size,
            background,
            commands: Vec::new(),
        });
        Ok(())
    }

    fn draw_glyph(&mut self, cmd: &PaintCommand) -> io::Result<()> {
        if let Some(frame) = self.current.as_mut() {
            frame.commands.push(*cmd);
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        if let Some(frame) = self.current.take() {
            self.frames.push(frame);
        }
        Ok(())
    }
}
