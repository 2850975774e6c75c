//! Rasterizer: glyph frames to RGBA images via SVG text rendering.

use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};

use image::{imageops, Rgba, RgbaImage};
use resvg::tiny_skia;
use resvg::usvg;

use super::PaintedFrame;
use crate::ascii::CellColor;
use crate::camera::Resolution;

/// Font stack used for glyphs and captions.
pub const FONT_FAMILY: &str = "'IBM Plex Mono', 'DejaVu Sans Mono', monospace";

/// Glyph baseline as a fraction of the cell edge (glyphs hang from the cell top).
const BASELINE: f32 = 0.8;

/// Largest raster edge we agree to allocate.
const MAX_DIM: u32 = 16_384;

/// Errors that can occur while rasterizing.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("Raster size {width}x{height} is empty or exceeds 16384x16384")]
    InvalidSize { width: u32, height: u32 },
    #[error("Failed to build glyph scene: {0}")]
    Svg(#[from] usvg::Error),
}

/// Rasterize a painted frame into an opaque RGBA image of the frame's size.
pub fn rasterize(frame: &PaintedFrame) -> Result<RgbaImage, RasterError> {
    let Resolution { width, height } = frame.size;
    check_size(width, height)?;

    let mut svg = svg_header(width, height);
    let _ = write!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        frame.background.css()
    );
    let _ = write!(
        svg,
        r#"<g font-family="{}" font-size="{}">"#,
        escape(FONT_FAMILY),
        frame.cell_size
    );
    let baseline = frame.cell_size as f32 * BASELINE;
    for cmd in &frame.commands {
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" fill="{}">{}</text>"#,
            cmd.x,
            cmd.y as f32 + baseline,
            cmd.color.css(),
            escape_char(cmd.ch)
        );
    }
    svg.push_str("</g></svg>");

    render_svg(&svg, width, height)
}

/// Draw a line of text centred on `(cx, cy)` on top of `img`.
pub fn draw_centered_text(
    img: &mut RgbaImage,
    text: &str,
    cx: f32,
    cy: f32,
    font_size: f32,
    color: CellColor,
    bold: bool,
) -> Result<(), RasterError> {
    let (width, height) = img.dimensions();
    check_size(width, height)?;

    let mut svg = svg_header(width, height);
    let _ = write!(
        svg,
        r#"<text x="{cx}" y="{}" font-family="{}" font-size="{font_size}" font-weight="{}" text-anchor="middle" fill="{}">{}</text></svg>"#,
        cy + font_size * 0.35,
        escape(FONT_FAMILY),
        if bold { "bold" } else { "normal" },
        color.css(),
        escape(text)
    );

    let layer = render_svg(&svg, width, height)?;
    imageops::overlay(img, &layer, 0, 0);
    Ok(())
}

fn check_size(width: u32, height: u32) -> Result<(), RasterError> {
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return Err(RasterError::InvalidSize { width, height });
    }
    Ok(())
}

fn svg_header(width: u32, height: u32) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    )
}

fn render_svg(svg: &str, width: u32, height: u32) -> Result<RgbaImage, RasterError> {
    let options = usvg::Options {
        fontdb: font_database(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or(RasterError::InvalidSize { width, height })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let mut img = RgbaImage::new(width, height);
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(img)
}

/// System fonts are scanned once per process.
fn font_database() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("Loaded {} font face(s)", db.len());
            Arc::new(db)
        })
        .clone()
}

fn escape(text: &str) -> String {
    text.chars().map(escape_char).collect()
}

fn escape_char(ch: char) -> String {
    match ch {
        '&' => "&amp;".to_string(),
        '<' => "&lt;".to_string(),
        '>' => "&gt;".to_string(),
        '"' => "&quot;".to_string(),
        '\'' => "&apos;".to_string(),
        c => c.to_string(),
    }
}
