//! Source visuals and frame sampling.
//!
//! This module covers everything upstream of the glyph mapper:
//! - Frames and sizes via [`Frame`] and [`Resolution`]
//! - Live feeds ([`LiveFeed`], [`FrameSlot`], [`FrameSequence`]) and fixed
//!   rasters, unified as [`SourceVisual`]
//! - Stills for the capture flow via [`snapshot`]
//! - The frame sampler: [`contain_rect`] and [`sample_into`]

mod frame_utils;
mod sampler;
mod source;
mod types;

pub use frame_utils::{load_frame, load_frames, mirror_horizontal, snapshot};
pub use sampler::{contain_rect, sample, sample_into, DrawRect, SampleBuffer, BACKGROUND};
pub use source::{FrameRef, FrameSequence, FrameSlot, LiveFeed, SourceVisual};
pub use types::{Frame, FrameFormat, Resolution, SourceError};
