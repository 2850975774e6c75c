//! End-to-end tests for the render loop and the capture flows.
//!
//! These run the public API the way the CLI driver does: a render context
//! fed by a frame sequence, the capture sequence against it, strip
//! composition, and file export.

use std::sync::Arc;
use std::time::Duration;

use ascii_booth::ascii::{RenderConfig, Theme};
use ascii_booth::camera::{Frame, FrameSequence, FrameSlot, Resolution, SourceVisual};
use ascii_booth::context::{RenderContext, TickOutcome};
use ascii_booth::event_loop::{run_frames, RenderSession};
use ascii_booth::export;
use ascii_booth::renderer::{RecordingSurface, TerminalSurface};
use ascii_booth::strip::{
    compose_strip, date_caption, run_sequence, CaptureSequence, SequencePlan, StripEvent, STRIP_FOOTER,
    STRIP_PADDING, STRIP_SPACING,
};
use image::{Rgba, RgbaImage};

fn gradient(width: u32, height: u32, shift: u8) -> Frame {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let v = ((x * 255 / width.max(1)) as u8).wrapping_add(shift);
        Rgba([v, (y * 255 / height.max(1)) as u8, 128, 255])
    });
    Frame::from_rgba_image(img)
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn test_live_loop_renders_every_frame() {
    let feed = FrameSequence::new(vec![gradient(64, 36, 0), gradient(64, 36, 90)]);
    let mut ctx = RenderContext::new(RenderConfig::default(), Resolution::new(128, 128));
    ctx.set_source(SourceVisual::live(feed));

    let mut session = RenderSession::new(ctx, RecordingSurface::new());
    let outcomes = run_frames(&mut session, (0..6).map(|i| ms(i * 16)));
    assert!(outcomes.iter().all(TickOutcome::is_rendered));
    assert_eq!(session.surface.frames.len(), 6);
    // Alternating frames produce different glyph layouts
    assert_ne!(session.surface.frames[0], session.surface.frames[1]);
    assert_eq!(session.surface.frames[0], session.surface.frames[2]);
}

#[test]
fn test_source_swap_between_ticks_keeps_loop_alive() {
    let slot = FrameSlot::new();
    let mut ctx = RenderContext::new(RenderConfig::default(), Resolution::new(96, 54));
    ctx.set_source(SourceVisual::live(slot.clone()));
    let mut surface = RecordingSurface::new();

    assert_eq!(ctx.tick(&mut surface), TickOutcome::SourceNotReady);
    slot.publish(gradient(32, 18, 0));
    assert!(ctx.tick(&mut surface).is_rendered());

    let live = ctx.set_source(SourceVisual::raster(gradient(40, 40, 7))).unwrap();
    assert!(ctx.tick(&mut surface).is_rendered());
    assert_eq!(surface.last().unwrap().size, Resolution::new(40, 40));

    ctx.reset_to_live(live);
    assert!(ctx.tick(&mut surface).is_rendered());
    assert_eq!(surface.last().unwrap().size, Resolution::new(96, 54));
}

#[test]
fn test_single_shot_flow() {
    let slot = FrameSlot::new();
    slot.publish(gradient(48, 27, 0));
    let mut ctx = RenderContext::new(RenderConfig::default(), Resolution::new(96, 54));
    ctx.set_source(SourceVisual::live(slot));

    let mut seq = CaptureSequence::new(SequencePlan::single());
    let mut events = vec![seq.start(ms(0)).unwrap()];
    let mut surface = RecordingSurface::new();
    let mut t = 0;
    while !seq.is_done() {
        t += 16;
        ctx.frame(ms(t), &mut surface);
        events.extend(seq.advance(ms(t), || ctx.capture_frame(true)));
    }
    let steps: Vec<&str> = events.iter().map(StripEvent::step).collect();
    assert_eq!(steps, ["countdown", "countdown", "countdown", "flash", "preview"]);

    let photo = seq.take_photos().pop().unwrap();
    ctx.freeze();
    ctx.set_source(SourceVisual::raster(Arc::unwrap_or_clone(photo)));
    ctx.unfreeze();
    ctx.animate_density_to(80);

    let start = t;
    for step in 0..=70 {
        ctx.frame(ms(start + step * 16), &mut surface);
    }
    assert_eq!(ctx.config().density, 80);
    assert!(!ctx.is_transitioning());
    assert_eq!(ctx.surface_size(), Resolution::new(48, 27));
    assert!(!ctx.export_text().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_strip_flow_exports_files() {
    let feed = FrameSequence::new((0..4).map(|i| gradient(32, 24, i * 60)).collect());
    let mut ctx = RenderContext::new(RenderConfig::default(), Resolution::new(64, 48));
    ctx.set_source(SourceVisual::live(feed));
    ctx.set_theme(Theme::Retro);

    let mut json = Vec::new();
    let photos = run_sequence(
        SequencePlan::strip(),
        || ctx.capture_frame(false),
        |e| json.push(serde_json::to_value(e).unwrap()),
    )
    .await
    .unwrap();

    assert_eq!(json.len(), 20);
    assert_eq!(json[0], serde_json::json!({"step": "countdown", "count": 3, "photoNum": 1}));
    assert_eq!(json[19], serde_json::json!({"step": "preview", "photoNum": 4}));

    let images: Vec<RgbaImage> = photos.iter().filter_map(|p| p.to_rgba_image()).collect();
    let strip = compose_strip(&images, Some(date_caption().as_str())).unwrap().unwrap();
    let expected_h = 24 * 4 + STRIP_SPACING * 3 + STRIP_PADDING * 2 + STRIP_FOOTER;
    assert_eq!(strip.dimensions(), (32 + STRIP_PADDING * 2, expected_h));

    ctx.set_source(SourceVisual::raster(Frame::from_rgba_image(strip.clone())));
    let mut surface = RecordingSurface::new();
    assert!(ctx.tick(&mut surface).is_rendered());
    assert_eq!(ctx.surface_size(), Resolution::new(strip.width(), strip.height()));

    let dir = tempfile::tempdir().unwrap();
    let text = ctx.export_text();
    let text_path = export::save_text(dir.path(), &text, 1).unwrap();
    assert_eq!(std::fs::read_to_string(text_path).unwrap(), text);

    let visual = ctx.export_visual().unwrap().unwrap();
    assert_eq!(visual.dimensions(), strip.dimensions());
    let bg = Theme::Retro.background();
    let bg = Rgba([bg.r, bg.g, bg.b, 255]);
    let background_px = visual.pixels().filter(|p| **p == bg).count() as u32;
    assert!(background_px > visual.width() * visual.height() / 4);
}

#[test]
fn test_terminal_surface_receives_frames() {
    let mut ctx = RenderContext::new(RenderConfig::default(), Resolution::new(60, 60));
    ctx.set_source(SourceVisual::raster(gradient(60, 60, 0)));
    let mut surface = TerminalSurface::new(Vec::new(), 80, 24);
    assert!(ctx.tick(&mut surface).is_rendered());
    let out = String::from_utf8(surface.into_inner()).unwrap();
    assert!(out.starts_with("\x1b[?25l"));
    assert!(out.ends_with("\x1b[0m"));
}
