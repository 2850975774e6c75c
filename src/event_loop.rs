//! Frame scheduling for the render loop.
//!
//! The render core never owns a timer. Anything that wants frames implements
//! [`FrameTick`]; a driver calls it once per host frame with a monotonically
//! increasing timestamp. [`run`] is the real-time driver (a tokio interval),
//! [`run_frames`] replays explicit timestamps for tests and offline rendering.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::context::{RenderContext, TickOutcome};
use crate::renderer::GlyphSurface;

/// Something driven once per host animation frame.
pub trait FrameTick {
    /// Handle the frame at `now`, measured from the start of the driver.
    fn on_frame(&mut self, now: Duration) -> TickOutcome;
}

/// A render context bound to the surface it paints.
pub struct RenderSession<S: GlyphSurface> {
    pub context: RenderContext,
    pub surface: S,
}

impl<S: GlyphSurface> RenderSession<S> {
    pub fn new(context: RenderContext, surface: S) -> Self {
        Self { context, surface }
    }

    pub fn into_parts(self) -> (RenderContext, S) {
        (self.context, self.surface)
    }
}

impl<S: GlyphSurface> FrameTick for RenderSession<S> {
    fn on_frame(&mut self, now: Duration) -> TickOutcome {
        self.context.frame(now, &mut self.surface)
    }
}

/// Counters collected by a driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: u64,
    pub rendered: u64,
    pub skipped: u64,
    pub frozen: u64,
    pub failed: u64,
}

impl LoopStats {
    fn record(&mut self, outcome: TickOutcome) {
        self.frames += 1;
        match outcome {
            TickOutcome::Rendered { .. } => self.rendered += 1,
            TickOutcome::SourceNotReady => self.skipped += 1,
            TickOutcome::Frozen => self.frozen += 1,
            TickOutcome::SurfaceFailed => self.failed += 1,
        }
    }
}

/// Frame period for a target rate, at least one millisecond.
pub fn frame_interval(fps: u32) -> Duration {
    let fps = fps.max(1) as u64;
    Duration::from_millis((1000 / fps).max(1))
}

/// Drive `target` at `fps` until `running` is cleared.
///
/// The flag is checked once per frame boundary. Frames that would fire late
/// are skipped rather than bunched up, so a slow tick never builds a backlog.
pub async fn run<T: FrameTick + ?Sized>(
    target: &mut T,
    fps: u32,
    running: Arc<AtomicBool>,
) -> LoopStats {
    let mut interval = tokio::time::interval(frame_interval(fps));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let start = tokio::time::Instant::now();
    let mut stats = LoopStats::default();

    while running.load(Ordering::SeqCst) {
        interval.tick().await;
        if !running.load(Ordering::SeqCst) {
            break;
        }
        stats.record(target.on_frame(start.elapsed()));
    }

    log::debug!("Render loop stopped: {:?}", stats);
    stats
}

/// Drive `target` through explicit frame timestamps.
pub fn run_frames<T, I>(target: &mut T, timestamps: I) -> Vec<TickOutcome>
where
    T: FrameTick + ?Sized,
    I: IntoIterator<Item = Duration>,
{
    timestamps.into_iter().map(|now| target.on_frame(now)).collect()
}
