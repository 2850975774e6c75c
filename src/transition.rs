//! Density transition: ease the grid density in after a source change.
//!
//! The transition is a pure function of elapsed time ([`density_at`]) plus a
//! small stateful wrapper ([`DensityTransition`]) that the host advances once
//! per animation frame. It only writes a density value; rendering picks it up
//! on the next tick.

use std::time::Duration;

/// Density every transition starts from.
pub const START_DENSITY: i32 = 5;

/// Length of a transition.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(1000);

/// Quadratic ease-out on `[0, 1]`. Inputs outside the range are clamped.
pub fn ease_out_quad(t: f64) -> f64 {
    let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Density `elapsed` into a transition towards `target`.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use ascii_booth::transition::density_at;
/// assert_eq!(density_at(80, Duration::ZERO), 5);
/// assert_eq!(density_at(80, Duration::from_millis(500)), 61);
/// assert_eq!(density_at(80, Duration::from_secs(2)), 80);
/// ```
pub fn density_at(target: i32, elapsed: Duration) -> i32 {
    let progress = (elapsed.as_secs_f64() / TRANSITION_DURATION.as_secs_f64()).min(1.0);
    let ease = ease_out_quad(progress);
    (START_DENSITY as f64 + (target - START_DENSITY) as f64 * ease).floor() as i32
}

/// Result of advancing a transition by one host frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStep {
    /// Intermediate density; the transition wants another frame
    Running(i32),
    /// Final density; the transition is over
    Finished(i32),
}

impl TransitionStep {
    pub fn density(&self) -> i32 {
        match *self {
            TransitionStep::Running(d) | TransitionStep::Finished(d) => d,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TransitionStep::Finished(_))
    }
}

/// A running density transition.
///
/// The start time latches on the first frame the host delivers, like a
/// frame callback registered when the transition is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityTransition {
    target: i32,
    started: Option<Duration>,
    last_frame: Option<Duration>,
    finished: bool,
}

impl DensityTransition {
    pub fn new(target: i32) -> Self {
        Self {
            target,
            started: None,
            last_frame: None,
            finished: false,
        }
    }

    pub fn target(&self) -> i32 {
        self.target
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance to the host frame at `now`.
    ///
    /// Returns `None` once finished, or when `now` is not later than the
    /// frame already handled (at most one step per host frame).
    pub fn advance(&mut self, now: Duration) -> Option<TransitionStep> {
        if self.finished || self.last_frame.is_some_and(|last| now <= last) {
            return None;
        }
        self.last_frame = Some(now);

        let start = *self.started.get_or_insert(now);
        let elapsed = now.saturating_sub(start);
        let density = density_at(self.target, elapsed);

        if elapsed >= TRANSITION_DURATION {
            self.finished = true;
            Some(TransitionStep::Finished(density))
        } else {
            Some(TransitionStep::Running(density))
        }
    }
}
