//! Density to grid cell size.

/// Smallest cell edge in device pixels (density 100).
pub const MIN_CELL: u32 = 6;

/// Largest cell edge in device pixels (density 0).
pub const MAX_CELL: u32 = 20;

/// Density used when nothing else is configured.
pub const DEFAULT_DENSITY: i32 = 50;

/// Clamp a density value into `[0, 100]`.
pub fn clamp_density(density: i32) -> i32 {
    density.clamp(0, 100)
}

/// Map a density (0-100) to a square cell edge in device pixels.
///
/// Lower density gives larger cells and coarser output, higher density gives
/// smaller cells. The result is floored to whole pixels and always lies in
/// `[MIN_CELL, MAX_CELL]`; out-of-range densities are clamped first.
///
/// This is the only density mapping in the crate: painting and text export
/// both call it, so the two grids always line up.
///
/// # Example
/// ```
/// use ascii_booth::ascii::cell_size;
/// assert_eq!(cell_size(100), 6);
/// assert_eq!(cell_size(0), 20);
/// assert_eq!(cell_size(50), 13);
/// ```
pub fn cell_size(density: i32) -> u32 {
    let d = clamp_density(density) as f64;
    let span = (MAX_CELL - MIN_CELL) as f64;
    let raw = (MAX_CELL as f64 - (d / 100.0) * span).floor();
    (raw as u32).clamp(MIN_CELL, MAX_CELL)
}
