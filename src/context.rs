//! Render context: the state one render loop works on.
//!
//! A [`RenderContext`] owns the active source, the render configuration, the
//! surface size and the sample buffer. The driver calls [`RenderContext::frame`]
//! (or [`RenderContext::tick`]) once per host frame; UI code calls the setters
//! between frames. Nothing here blocks or spawns.

use std::io;
use std::time::Duration;

use image::RgbaImage;

use crate::ascii::{clamp_density, map_grid, map_to_text, Palette, RenderConfig, Theme};
use crate::camera::{sample_into, snapshot, Frame, Resolution, SampleBuffer, SourceVisual};
use crate::renderer::{rasterize, GlyphSurface, PaintedFrame, RasterError};
use crate::transition::DensityTransition;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The loop is frozen; nothing was sampled or painted
    Frozen,
    /// No source, or the source has no pixels yet; the surface keeps its last frame
    SourceNotReady,
    /// A frame was sampled and painted
    Rendered { glyphs: usize },
    /// A frame was sampled but the surface rejected the paint
    SurfaceFailed,
}

impl TickOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, TickOutcome::Rendered { .. })
    }
}

/// State of one render loop.
pub struct RenderContext {
    source: Option<SourceVisual>,
    container: Resolution,
    surface: Resolution,
    /// Applied at the start of the next tick, never mid-tick
    pending_resize: Option<Resolution>,
    config: RenderConfig,
    theme: Theme,
    frozen: bool,
    buffer: SampleBuffer,
    painted: Option<PaintedFrame>,
    transition: Option<DensityTransition>,
}

impl RenderContext {
    /// Create a context whose live sources render into a `container`-sized surface.
    pub fn new(mut config: RenderConfig, container: Resolution) -> Self {
        config.palette_name = Palette::from_name(&config.palette_name).name().to_string();
        Self {
            source: None,
            container,
            surface: Resolution::default(),
            pending_resize: Some(container),
            config,
            theme: Theme::default(),
            frozen: false,
            buffer: SampleBuffer::new(0, 0),
            painted: None,
            transition: None,
        }
    }

    /// Swap the active source and return the previous one.
    ///
    /// A fixed raster resizes the surface to its exact pixel size; a live
    /// feed resizes it to the container. The resize lands before the next tick.
    pub fn set_source(&mut self, visual: SourceVisual) -> Option<SourceVisual> {
        let size = visual.raster_size().unwrap_or(self.container);
        log::debug!(
            "Source set to {:?}, surface {}x{}",
            visual,
            size.width,
            size.height
        );
        self.pending_resize = Some(size);
        self.source.replace(visual)
    }

    /// Return to a live feed and resume rendering (retake / reset).
    pub fn reset_to_live(&mut self, visual: SourceVisual) -> Option<SourceVisual> {
        self.transition = None;
        let previous = self.set_source(visual);
        self.unfreeze();
        previous
    }

    /// Update the container layout box. Only live sources follow it.
    pub fn set_container_size(&mut self, size: Resolution) {
        self.container = size;
        let follows_container = self.source.as_ref().map_or(true, SourceVisual::is_live);
        if follows_container {
            self.pending_resize = Some(size);
        }
    }

    pub fn set_density(&mut self, value: i32) {
        self.config.density = clamp_density(value);
    }

    /// Select a palette by registry name. Unknown names render with the default.
    pub fn set_palette(&mut self, name: &str) {
        self.config.palette_name = Palette::from_name(name).name().to_string();
    }

    pub fn set_monochrome(&mut self, monochrome: bool) {
        self.config.monochrome = monochrome;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Stop sampling and painting; the surface keeps showing the last frame.
    pub fn freeze(&mut self) {
        if !self.frozen {
            log::info!("Render loop frozen");
            self.frozen = true;
        }
    }

    /// Resume rendering with a fresh tick.
    pub fn unfreeze(&mut self) {
        if self.frozen {
            log::info!("Render loop resumed");
            self.frozen = false;
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Ease the density from its start value to `target` over the next second
    /// of host frames. A new call replaces a running transition.
    pub fn animate_density_to(&mut self, target: i32) {
        let target = clamp_density(target);
        if self.transition.is_some() {
            log::debug!("Replacing running density transition");
        }
        log::debug!("Density transition to {}", target);
        self.transition = Some(DensityTransition::new(target));
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Handle one host frame at time `now`: step the density transition, then
    /// render a tick unless frozen.
    pub fn frame<S: GlyphSurface + ?Sized>(&mut self, now: Duration, surface: &mut S) -> TickOutcome {
        if let Some(transition) = self.transition.as_mut() {
            if let Some(step) = transition.advance(now) {
                self.config.density = step.density();
                if step.is_finished() {
                    log::debug!("Density transition finished at {}", step.density());
                    self.transition = None;
                }
            }
        }
        self.tick(surface)
    }

    /// Sample the source and paint one frame onto `surface`.
    ///
    /// Never fails: a missing source skips the tick, a surface write error
    /// is logged and reported in the outcome.
    pub fn tick<S: GlyphSurface + ?Sized>(&mut self, surface: &mut S) -> TickOutcome {
        if self.frozen {
            return TickOutcome::Frozen;
        }

        if let Some(size) = self.pending_resize.take() {
            if size != self.surface {
                log::debug!(
                    "Surface resized {}x{} -> {}x{}",
                    self.surface.width,
                    self.surface.height,
                    size.width,
                    size.height
                );
                self.surface = size;
            }
        }

        let Some(source) = self.source.as_mut() else {
            return TickOutcome::SourceNotReady;
        };
        let Some(frame) = source.frame() else {
            log::debug!("Source not ready, skipping tick");
            return TickOutcome::SourceNotReady;
        };
        if !sample_into(&frame, self.surface, &mut self.buffer) {
            log::debug!("Source has no pixels, skipping tick");
            return TickOutcome::SourceNotReady;
        }

        let (width, height) = self.buffer.dimensions();
        let grid = map_grid(self.buffer.as_raw(), width, height, &self.config);
        let painted = PaintedFrame {
            size: self.surface,
            cell_size: grid.cell_size,
            background: self.theme.background(),
            commands: grid.paint_commands(self.config.monochrome, self.theme.text()),
        };
        let glyphs = painted.commands.len();
        let result = painted.paint_onto(surface);
        self.painted = Some(painted);

        match result {
            Ok(()) => TickOutcome::Rendered { glyphs },
            Err(e) => {
                log::warn!("Surface write failed: {}", e);
                TickOutcome::SurfaceFailed
            }
        }
    }

    /// Character grid of the current sample buffer under the current settings.
    ///
    /// Empty until a tick has sampled a frame.
    pub fn export_text(&self) -> String {
        let (width, height) = self.buffer.dimensions();
        map_to_text(self.buffer.as_raw(), width, height, &self.config)
    }

    /// The last painted frame as an image, or `None` before the first paint.
    pub fn export_visual(&self) -> Result<Option<RgbaImage>, RasterError> {
        self.painted.as_ref().map(rasterize).transpose()
    }

    /// Repaint the last frame, e.g. after the surface was cleared.
    pub fn repaint<S: GlyphSurface + ?Sized>(&self, surface: &mut S) -> io::Result<bool> {
        match &self.painted {
            Some(painted) => painted.paint_onto(surface).map(|()| true),
            None => Ok(false),
        }
    }

    /// Copy the current source frame as a still, mirrored when asked.
    pub fn capture_frame(&mut self, mirror: bool) -> Option<Frame> {
        let frame = self.source.as_mut()?.frame()?;
        snapshot(&frame, mirror)
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn palette(&self) -> Palette {
        self.config.palette()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn source(&self) -> Option<&SourceVisual> {
        self.source.as_ref()
    }

    /// Surface size used by the last tick.
    pub fn surface_size(&self) -> Resolution {
        self.surface
    }

    /// Surface size the next tick will use.
    pub fn next_surface_size(&self) -> Resolution {
        self.pending_resize.unwrap_or(self.surface)
    }

    pub fn container_size(&self) -> Resolution {
        self.container
    }

    pub fn sample_buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn last_frame(&self) -> Option<&PaintedFrame> {
        self.painted.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{FrameSlot, FrameFormat};
    use crate::renderer::RecordingSurface;
    use std::time::Instant;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        Frame {
            data: rgb
                .iter()
                .copied()
                .cycle()
                .take((width * height * 3) as usize)
                .collect(),
            width,
            height,
            format: FrameFormat::Rgb,
            timestamp: Instant::now(),
        }
    }

    fn context() -> RenderContext {
        let config = RenderConfig {
            density: 100,
            ..RenderConfig::default()
        };
        RenderContext::new(config, Resolution::new(60, 30))
    }

    #[test]
    fn test_tick_without_source_is_skipped() {
        let mut ctx = context();
        let mut surface = RecordingSurface::new();
        assert_eq!(ctx.tick(&mut surface), TickOutcome::SourceNotReady);
        assert!(surface.frames.is_empty());
        assert_eq!(ctx.export_text(), "");
    }

    #[test]
    fn test_raster_source_sets_exact_surface_size() {
        let mut ctx = context();
        ctx.set_source(SourceVisual::raster(solid(36, 18, [255, 255, 255])));
        assert_eq!(ctx.next_surface_size(), Resolution::new(36, 18));

        let mut surface = RecordingSurface::new();
        assert!(ctx.tick(&mut surface).is_rendered());
        assert_eq!(ctx.surface_size(), Resolution::new(36, 18));
        assert_eq!(ctx.sample_buffer().dimensions(), (36, 18));
        assert_eq!(surface.last().unwrap().size, Resolution::new(36, 18));
    }

    #[test]
    fn test_live_source_follows_container() {
        let slot = FrameSlot::new();
        slot.publish(solid(64, 48, [128, 128, 128]));
        let mut ctx = context();
        ctx.set_source(SourceVisual::live(slot));
        let mut surface = RecordingSurface::new();
        ctx.tick(&mut surface);
        assert_eq!(ctx.surface_size(), Resolution::new(60, 30));

        ctx.set_container_size(Resolution::new(90, 40));
        assert_eq!(ctx.surface_size(), Resolution::new(60, 30));
        ctx.tick(&mut surface);
        assert_eq!(ctx.surface_size(), Resolution::new(90, 40));
        assert_eq!(ctx.sample_buffer().dimensions(), (90, 40));
    }

    #[test]
    fn test_container_resize_ignored_for_raster() {
        let mut ctx = context();
        ctx.set_source(SourceVisual::raster(solid(12, 12, [0, 0, 0])));
        ctx.set_container_size(Resolution::new(500, 500));
        ctx.tick(&mut RecordingSurface::new());
        assert_eq!(ctx.surface_size(), Resolution::new(12, 12));
    }

    #[test]
    fn test_unready_live_feed_skips_tick() {
        let slot = FrameSlot::new();
        let mut ctx = context();
        ctx.set_source(SourceVisual::live(slot.clone()));
        let mut surface = RecordingSurface::new();
        assert_eq!(ctx.tick(&mut surface), TickOutcome::SourceNotReady);

        slot.publish(solid(0, 0, [0, 0, 0]));
        assert_eq!(ctx.tick(&mut surface), TickOutcome::SourceNotReady);

        slot.publish(solid(10, 10, [255, 255, 255]));
        assert!(ctx.tick(&mut surface).is_rendered());
        assert_eq!(surface.frames.len(), 1);
    }

    #[test]
    fn test_frozen_context_paints_nothing() {
        let mut ctx = context();
        ctx.set_source(SourceVisual::raster(solid(12, 12, [255, 255, 255])));
        let mut surface = RecordingSurface::new();
        ctx.tick(&mut surface);
        let text = ctx.export_text();

        ctx.freeze();
        assert!(ctx.is_frozen());
        ctx.set_source(SourceVisual::raster(solid(30, 30, [0, 0, 0])));
        assert_eq!(ctx.tick(&mut surface), TickOutcome::Frozen);
        assert_eq!(surface.frames.len(), 1);
        assert_eq!(ctx.export_text(), text);

        ctx.unfreeze();
        assert!(ctx.tick(&mut surface).is_rendered());
        assert_eq!(ctx.surface_size(), Resolution::new(30, 30));
    }

    #[test]
    fn test_export_text_matches_painted_glyphs() {
        let mut ctx = context();
        ctx.set_monochrome(false);
        ctx.set_palette("blocks");
        let mut img = RgbaImage::new(30, 12);
        for (x, _, px) in img.enumerate_pixels_mut() {
            let v = (x * 8) as u8;
            *px = image::Rgba([v, v, v, 255]);
        }
        ctx.set_source(SourceVisual::raster(Frame::from_rgba_image(img)));

        let mut surface = RecordingSurface::new();
        ctx.tick(&mut surface);
        let text = ctx.export_text();
        let lines: Vec<Vec<char>> = text.lines().map(|l| l.chars().collect()).collect();
        let frame = surface.last().unwrap();
        for cmd in &frame.commands {
            assert_eq!(lines[(cmd.y / 6) as usize][(cmd.x / 6) as usize], cmd.ch);
        }
        assert_eq!(
            frame.commands.len(),
            text.chars().filter(|c| !c.is_whitespace()).count()
        );
    }

    #[test]
    fn test_settings_apply_on_next_tick() {
        let mut ctx = context();
        ctx.set_source(SourceVisual::raster(solid(40, 40, [255, 255, 255])));
        let mut surface = RecordingSurface::new();
        ctx.tick(&mut surface);
        assert_eq!(surface.last().unwrap().cell_size, 6);

        ctx.set_density(0);
        ctx.set_theme(Theme::Retro);
        ctx.tick(&mut surface);
        let frame = surface.last().unwrap();
        assert_eq!(frame.cell_size, 20);
        assert_eq!(frame.background, Theme::Retro.background());
        assert!(frame.commands.iter().all(|c| c.color == Theme::Retro.text()));
    }

    #[test]
    fn test_density_setter_clamps() {
        let mut ctx = context();
        ctx.set_density(250);
        assert_eq!(ctx.config().density, 100);
        ctx.set_density(-1);
        assert_eq!(ctx.config().density, 0);
    }

    #[test]
    fn test_unknown_palette_falls_back() {
        let mut ctx = context();
        ctx.set_palette("comic-sans");
        assert_eq!(ctx.palette(), Palette::Standard);
        // Resolved once here, so per-tick reads see a registry name
        assert_eq!(ctx.config().palette_name, "standard");

        ctx.set_palette("MATRIX");
        assert_eq!(ctx.config().palette_name, "matrix");

        let config = RenderConfig {
            palette_name: "nope".to_string(),
            ..RenderConfig::default()
        };
        let ctx = RenderContext::new(config, Resolution::new(10, 10));
        assert_eq!(ctx.config().palette_name, "standard");
    }

    #[test]
    fn test_transition_drives_density() {
        let mut ctx = context();
        ctx.set_source(SourceVisual::raster(solid(40, 40, [255, 255, 255])));
        ctx.animate_density_to(100);
        let mut surface = RecordingSurface::new();

        ctx.frame(Duration::from_millis(100), &mut surface);
        assert_eq!(ctx.config().density, 5);
        assert_eq!(surface.last().unwrap().cell_size, 19);

        ctx.frame(Duration::from_millis(600), &mut surface);
        assert_eq!(ctx.config().density, 76);
        assert!(ctx.is_transitioning());

        ctx.frame(Duration::from_millis(1100), &mut surface);
        assert_eq!(ctx.config().density, 100);
        assert!(!ctx.is_transitioning());
        assert_eq!(surface.last().unwrap().cell_size, 6);
    }

    #[test]
    fn test_second_transition_replaces_first() {
        let mut ctx = context();
        ctx.animate_density_to(100);
        ctx.frame(Duration::from_millis(0), &mut RecordingSurface::new());
        ctx.animate_density_to(20);
        ctx.frame(Duration::from_millis(500), &mut RecordingSurface::new());
        assert_eq!(ctx.config().density, 5);
        ctx.frame(Duration::from_millis(1500), &mut RecordingSurface::new());
        assert_eq!(ctx.config().density, 20);
    }

    #[test]
    fn test_transition_runs_while_frozen() {
        let mut ctx = context();
        ctx.freeze();
        ctx.animate_density_to(60);
        let mut surface = RecordingSurface::new();
        assert_eq!(ctx.frame(Duration::ZERO, &mut surface), TickOutcome::Frozen);
        ctx.frame(Duration::from_secs(1), &mut surface);
        assert_eq!(ctx.config().density, 60);
        assert!(surface.frames.is_empty());
    }

    #[test]
    fn test_export_visual_matches_surface_size() {
        let mut ctx = context();
        assert!(ctx.export_visual().unwrap().is_none());
        ctx.set_source(SourceVisual::raster(solid(24, 12, [0, 0, 0])));
        ctx.tick(&mut RecordingSurface::new());
        let img = ctx.export_visual().unwrap().unwrap();
        assert_eq!(img.dimensions(), (24, 12));
    }

    #[test]
    fn test_export_visual_paints_glyphs() {
        let mut ctx = context();
        ctx.set_source(SourceVisual::raster(solid(60, 30, [255, 255, 255])));
        assert!(ctx.tick(&mut RecordingSurface::new()).is_rendered());
        assert!(ctx.export_text().chars().any(|c| !c.is_whitespace() && c != '\n'));

        let img = ctx.export_visual().unwrap().unwrap();
        let bg = ctx.theme().background();
        let lit = img
            .pixels()
            .filter(|p| p.0[..3] != [bg.r, bg.g, bg.b])
            .count();
        assert!(lit > 0, "exported image has no glyph pixels");
    }

    #[test]
    fn test_capture_and_reset_to_live() {
        let slot = FrameSlot::new();
        slot.publish(solid(2, 1, [10, 20, 30]));
        let mut ctx = context();
        ctx.set_source(SourceVisual::live(slot));

        let still = ctx.capture_frame(true).unwrap();
        ctx.freeze();
        let live = ctx.set_source(SourceVisual::raster(still)).unwrap();
        assert!(live.is_live());
        assert!(!ctx.source().unwrap().is_live());

        let previous = ctx.reset_to_live(live).unwrap();
        assert!(!previous.is_live());
        assert!(!ctx.is_frozen());
        assert_eq!(ctx.next_surface_size(), ctx.container_size());
    }
}
