//! Frame types and data structures.

use std::path::PathBuf;
use std::time::Instant;

use image::RgbaImage;

/// Surface or frame size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either edge is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height, or `None` for an empty size.
    pub fn aspect(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }
}

/// Pixel format of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// RGB format (3 bytes per pixel)
    Rgb,
    /// RGBA format (4 bytes per pixel)
    Rgba,
}

/// A decoded frame from a live feed, or a fixed raster.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data, row-major
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel format
    pub format: FrameFormat,
    /// Timestamp when frame was produced
    pub timestamp: Instant,
}

impl Frame {
    /// Wrap an RGBA image.
    pub fn from_rgba_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
            format: FrameFormat::Rgba,
            timestamp: Instant::now(),
        }
    }

    /// Get the number of bytes per pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        match self.format {
            FrameFormat::Rgb => 3,
            FrameFormat::Rgba => 4,
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    /// True when the frame has non-zero size and enough pixel data.
    pub fn is_ready(&self) -> bool {
        let needed = self.width as usize * self.height as usize * self.bytes_per_pixel();
        !self.resolution().is_empty() && self.data.len() >= needed
    }

    /// Copy the frame into an RGBA image. Returns `None` if the frame is not ready.
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        if !self.is_ready() {
            return None;
        }
        let pixels = self.width as usize * self.height as usize;
        let data = match self.format {
            FrameFormat::Rgba => self.data[..pixels * 4].to_vec(),
            FrameFormat::Rgb => {
                let mut out = Vec::with_capacity(pixels * 4);
                for rgb in self.data[..pixels * 3].chunks_exact(3) {
                    out.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
                }
                out
            }
        };
        RgbaImage::from_raw(self.width, self.height, data)
    }
}

/// Errors that can occur when loading a source visual.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode image '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("No decodable frames found in '{}'", .0.display())]
    NoFrames(PathBuf),
    #[error("Image '{}' has zero width or height", .0.display())]
    Empty(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_frame(data: Vec<u8>, width: u32, height: u32) -> Frame {
        Frame {
            data,
            width,
            height,
            format: FrameFormat::Rgb,
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn test_resolution_aspect() {
        assert_eq!(Resolution::new(1280, 720).aspect(), Some(1280.0 / 720.0));
        assert_eq!(Resolution::new(0, 10).aspect(), None);
        assert!(Resolution::new(10, 0).is_empty());
    }

    #[test]
    fn test_frame_bytes_per_pixel() {
        let frame = rgb_frame(vec![0; 6], 2, 1);
        assert_eq!(frame.bytes_per_pixel(), 3);
        let frame = Frame::from_rgba_image(RgbaImage::new(2, 1));
        assert_eq!(frame.bytes_per_pixel(), 4);
    }

    #[test]
    fn test_frame_readiness() {
        assert!(rgb_frame(vec![0; 6], 2, 1).is_ready());
        assert!(!rgb_frame(vec![0; 5], 2, 1).is_ready());
        assert!(!rgb_frame(Vec::new(), 0, 0).is_ready());
    }

    #[test]
    fn test_rgb_to_rgba_image() {
        let frame = rgb_frame(vec![1, 2, 3, 4, 5, 6], 2, 1);
        let img = frame.to_rgba_image().unwrap();
        assert_eq!(img.as_raw(), &vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_unready_frame_has_no_image() {
        assert!(rgb_frame(vec![0; 2], 2, 1).to_rgba_image().is_none());
    }

    #[test]
    fn test_source_error_display() {
        let err = SourceError::NoFrames(PathBuf::from("/tmp/frames"));
        assert_eq!(err.to_string(), "No decodable frames found in '/tmp/frames'");
    }
}
