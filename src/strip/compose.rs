//! Photo strip composition.

use chrono::{Local, NaiveDate};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::StripError;
use crate::ascii::CellColor;
use crate::renderer::draw_centered_text;

pub const STRIP_PADDING: u32 = 20;
pub const STRIP_SPACING: u32 = 15;
pub const STRIP_FOOTER: u32 = 60;

/// Off-white photo paper.
pub const STRIP_BACKGROUND: Rgba<u8> = Rgba([0xf0, 0xf0, 0xf0, 255]);

const CAPTION_COLOR: CellColor = CellColor::new(0x33, 0x33, 0x33);
const CAPTION_SIZE: f32 = 24.0;

/// Footer caption for a strip printed on `date`, e.g. `1/5/2026`.
pub fn format_caption(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Footer caption with today's local date.
pub fn date_caption() -> String {
    format_caption(Local::now().date_naive())
}

/// Stack photos vertically on a paper background with a footer.
///
/// Every photo is drawn at the size of the first one. The caption, if any,
/// is centred in the footer. Returns `None` for an empty photo list.
pub fn compose_strip(
    photos: &[RgbaImage],
    caption: Option<&str>,
) -> Result<Option<RgbaImage>, StripError> {
    let Some(first) = photos.first() else {
        return Ok(None);
    };
    let (photo_w, photo_h) = first.dimensions();
    let count = photos.len() as u32;

    let width = photo_w + STRIP_PADDING * 2;
    let height =
        photo_h * count + STRIP_SPACING * (count - 1) + STRIP_PADDING * 2 + STRIP_FOOTER;
    let mut strip = RgbaImage::from_pixel(width, height, STRIP_BACKGROUND);

    let mut y = STRIP_PADDING;
    for photo in photos {
        if photo.dimensions() == (photo_w, photo_h) {
            imageops::overlay(&mut strip, photo, STRIP_PADDING as i64, y as i64);
        } else {
            let scaled = imageops::resize(photo, photo_w, photo_h, FilterType::Triangle);
            imageops::overlay(&mut strip, &scaled, STRIP_PADDING as i64, y as i64);
        }
        y += photo_h + STRIP_SPACING;
    }

    if let Some(text) = caption.filter(|t| !t.trim().is_empty()) {
        let cx = width as f32 / 2.0;
        let cy = height as f32 - STRIP_FOOTER as f32 / 2.0 - STRIP_PADDING as f32 / 2.0;
        draw_centered_text(&mut strip, text, cx, cy, CAPTION_SIZE, CAPTION_COLOR, true)?;
    }

    log::debug!("Composed strip of {} photo(s), {}x{}", count, width, height);
    Ok(Some(strip))
}
