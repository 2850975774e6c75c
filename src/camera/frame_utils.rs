//! Frame loading and transformation utilities.

use std::path::{Path, PathBuf};
use std::time::Instant;

use super::types::{Frame, SourceError};

/// File extensions accepted when loading a frame directory.
const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Decode an image file into an RGBA frame.
pub fn load_frame(path: &Path) -> Result<Frame, SourceError> {
    let bytes = std::fs::read(path).map_err(|e| SourceError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let img = image::load_from_memory(&bytes).map_err(|e| SourceError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;

    let frame = Frame::from_rgba_image(img.to_rgba8());
    if frame.resolution().is_empty() {
        return Err(SourceError::Empty(path.to_path_buf()));
    }
    Ok(frame)
}

/// Load a single image, or every image in a directory sorted by file name.
///
/// Directory entries that fail to decode are skipped with a warning; an empty
/// result is an error.
pub fn load_frames(path: &Path) -> Result<Vec<Frame>, SourceError> {
    if !path.is_dir() {
        return Ok(vec![load_frame(path)?]);
    }

    let entries = std::fs::read_dir(path).map_err(|e| SourceError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_frame_extension(p))
        .collect();
    files.sort();

    let mut frames = Vec::with_capacity(files.len());
    for file in &files {
        match load_frame(file) {
            Ok(frame) => frames.push(frame),
            Err(e) => log::warn!("Skipping frame: {}", e),
        }
    }

    if frames.is_empty() {
        return Err(SourceError::NoFrames(path.to_path_buf()));
    }
    log::info!("Loaded {} frame(s) from {:?}", frames.len(), path);
    Ok(frames)
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Mirror a frame horizontally (flip left-right) for selfie mode.
pub fn mirror_horizontal(frame: &mut Frame) {
    let width = frame.width as usize;
    let bpp = frame.bytes_per_pixel();
    let stride = width * bpp;
    if stride == 0 {
        return;
    }

    for row in frame.data.chunks_exact_mut(stride) {
        for x in 0..width / 2 {
            let left = x * bpp;
            let right = (width - 1 - x) * bpp;
            let (head, tail) = row.split_at_mut(right);
            head[left..left + bpp].swap_with_slice(&mut tail[..bpp]);
        }
    }
}

/// Copy a frame into a standalone still, optionally mirrored.
///
/// The captured still shows what the user saw on screen, so selfie-mode feeds
/// are flipped before the copy is returned. Frames without usable pixels yield
/// `None`.
pub fn snapshot(frame: &Frame, mirror: bool) -> Option<Frame> {
    if !frame.is_ready() {
        return None;
    }
    let mut still = frame.clone();
    still.timestamp = Instant::now();
    if mirror {
        mirror_horizontal(&mut still);
    }
    Some(still)
}
