//! Frame sampling into the render surface's pixel buffer.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::types::{Frame, Resolution};

/// Fill colour of the letterbox margins.
pub const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// RGBA pixels the mapper reads, sized exactly like the render surface.
pub type SampleBuffer = RgbaImage;

/// Where the source lands on the surface, in (sub-)pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DrawRect {
    /// Integer placement: rounded offset and size, at least one pixel each way.
    pub fn pixel_bounds(&self) -> (i64, i64, u32, u32) {
        (
            self.x.round() as i64,
            self.y.round() as i64,
            (self.width.round() as u32).max(1),
            (self.height.round() as u32).max(1),
        )
    }
}

/// Compute the aspect-preserving "contain" rectangle of `source` inside `surface`.
///
/// A source wider than the surface fills the surface width and is centred
/// vertically; otherwise it fills the height and is centred horizontally.
/// Nothing is cropped. Returns `None` if either size is empty.
///
/// # Example
/// ```
/// use ascii_booth::camera::{contain_rect, Resolution};
/// let rect = contain_rect(Resolution::new(1280, 720), Resolution::new(640, 640)).unwrap();
/// assert_eq!((rect.x, rect.y, rect.width, rect.height), (0.0, 140.0, 640.0, 360.0));
/// ```
pub fn contain_rect(source: Resolution, surface: Resolution) -> Option<DrawRect> {
    let src_aspect = source.aspect()?;
    let surface_aspect = surface.aspect()?;

    let (sw, sh) = (surface.width as f64, surface.height as f64);
    let (src_w, src_h) = (source.width as f64, source.height as f64);

    let rect = if src_aspect > surface_aspect {
        let height = sw * src_h / src_w;
        DrawRect {
            x: 0.0,
            y: (sh - height) / 2.0,
            width: sw,
            height,
        }
    } else {
        let width = sh * src_w / src_h;
        DrawRect {
            x: (sw - width) / 2.0,
            y: 0.0,
            width,
            height: sh,
        }
    };
    Some(rect)
}

/// Draw `frame` letterboxed into `buffer`, which is resized to `surface` if needed.
///
/// The whole buffer is overwritten: margins are filled with [`BACKGROUND`] and
/// the frame is scaled into its contain rectangle. If the frame or the surface
/// has no pixels the buffer is left untouched and `false` is returned.
pub fn sample_into(frame: &Frame, surface: Resolution, buffer: &mut SampleBuffer) -> bool {
    if surface.is_empty() {
        return false;
    }
    let Some(rect) = contain_rect(frame.resolution(), surface) else {
        return false;
    };
    let Some(source) = frame.to_rgba_image() else {
        return false;
    };

    if buffer.dimensions() != (surface.width, surface.height) {
        *buffer = RgbaImage::new(surface.width, surface.height);
    }
    for px in buffer.pixels_mut() {
        *px = BACKGROUND;
    }

    let (x, y, w, h) = rect.pixel_bounds();
    if (w, h) == source.dimensions() {
        imageops::overlay(buffer, &source, x, y);
    } else {
        let scaled = imageops::resize(&source, w, h, FilterType::Triangle);
        imageops::overlay(buffer, &scaled, x, y);
    }
    true
}

/// Sample a frame into a fresh buffer of the given size.
pub fn sample(frame: &Frame, surface: Resolution) -> Option<SampleBuffer> {
    let mut buffer = SampleBuffer::new(0, 0);
    sample_into(frame, surface, &mut buffer).then_some(buffer)
}
