//! Writing rendered output to files.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{ImageFormat, RgbaImage};

use crate::renderer::RasterError;

/// Errors that can occur while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode '{}': {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Nothing has been rendered yet")]
    NothingRendered,
    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// Kind of exported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Plain-text character grid
    Text,
    /// Rendered ASCII image
    Png,
    /// Composed photo strip
    Strip,
}

impl ExportKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Text => "txt",
            ExportKind::Png | ExportKind::Strip => "png",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            ExportKind::Text | ExportKind::Png => "ascii-photo",
            ExportKind::Strip => "photo-strip",
        }
    }
}

/// Milliseconds since the Unix epoch, for file names.
pub fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Default file name, e.g. `ascii-photo-1700000000000.txt`.
pub fn default_file_name(kind: ExportKind, epoch_ms: u128) -> String {
    format!("{}-{}.{}", kind.prefix(), epoch_ms, kind.extension())
}

/// Write the character grid as UTF-8, byte for byte.
pub fn write_text(path: &Path, text: &str) -> Result<(), ExportError> {
    std::fs::write(path, text.as_bytes()).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::info!("Wrote {} byte(s) of text to {:?}", text.len(), path);
    Ok(())
}

/// Encode an image as PNG.
pub fn write_png(path: &Path, img: &RgbaImage) -> Result<(), ExportError> {
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| ExportError::Image {
            path: path.to_path_buf(),
            source: e,
        })?;
    log::info!("Wrote {}x{} PNG to {:?}", img.width(), img.height(), path);
    Ok(())
}

/// Write `text` into `dir` under its default name and return the path.
pub fn save_text(dir: &Path, text: &str, epoch_ms: u128) -> Result<PathBuf, ExportError> {
    let path = dir.join(default_file_name(ExportKind::Text, epoch_ms));
    write_text(&path, text)?;
    Ok(path)
}

/// Write `img` into `dir` under the default name for `kind` and return the path.
pub fn save_png(
    dir: &Path,
    kind: ExportKind,
    img: &RgbaImage,
    epoch_ms: u128,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(default_file_name(kind, epoch_ms));
    write_png(&path, img)?;
    Ok(path)
}
