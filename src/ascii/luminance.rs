//! Luminance and palette index calculation.

/// Perceptual luminance using the ITU-R BT.601 luma weights.
///
/// The formula is: Y = 0.299*R + 0.587*G + 0.114*B, giving a value in
/// `[0.0, 255.0]`.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    let y = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    y.clamp(0.0, 255.0)
}

/// Map a luminance to a palette index.
///
/// Index = floor((1 - L/255) * (len - 1)), so bright pixels pick the first
/// (densest) glyphs, which reads correctly on a dark background. The result is
/// clamped into `[0, len - 1]`; an empty palette yields 0 and callers must not
/// index with it.
#[inline]
pub fn glyph_index(luminance: f32, palette_len: usize) -> usize {
    if palette_len <= 1 {
        return 0;
    }
    let max = palette_len - 1;
    let l = if luminance.is_finite() {
        luminance.clamp(0.0, 255.0)
    } else {
        0.0
    };
    let idx = ((1.0 - l / 255.0) * max as f32).floor();
    (idx.max(0.0) as usize).min(max)
}
