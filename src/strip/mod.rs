//! Photo strip capture.
//!
//! - [`CaptureSequence`] is the countdown → flash → preview state machine
//! - [`run_sequence`] drives it with tokio sleeps
//! - [`compose_strip`] stacks the captured photos into one image

mod compose;
mod runner;
mod sequence;

pub use compose::{
    compose_strip, date_caption, format_caption, STRIP_BACKGROUND, STRIP_FOOTER, STRIP_PADDING, STRIP_SPACING,
};
pub use runner::run_sequence;
pub use sequence::{CaptureSequence, SequencePlan, SequenceState, StripEvent};

use crate::renderer::RasterError;

/// Errors from the capture flow.
#[derive(Debug, thiserror::Error)]
pub enum StripError {
    #[error("A capture sequence is already running")]
    AlreadyRunning,
    #[error("Failed to draw strip caption: {0}")]
    Caption(#[from] RasterError),
}
