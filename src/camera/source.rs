//! Source visuals: live frame providers and fixed rasters.

use std::fmt;
use std::sync::{Arc, Mutex};

use super::types::{Frame, Resolution};

/// A continuous provider of decoded frames.
///
/// Implementations may change frame size from one call to the next. Returning
/// `None` means the feed is not ready yet (no frame decoded).
pub trait LiveFeed: Send {
    /// The most recent decoded frame.
    fn current_frame(&mut self) -> Option<Frame>;

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        "live"
    }
}

/// The active visual the sampler draws from.
///
/// Exactly one source is active at a time; switching is always an explicit
/// call on the render context.
pub enum SourceVisual {
    /// Continuous feed whose intrinsic size is that of its current frame
    Live(Box<dyn LiveFeed>),
    /// Immutable still; the render surface copies its exact size
    Raster(Arc<Frame>),
}

impl fmt::Debug for SourceVisual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceVisual::Live(feed) => f.debug_tuple("Live").field(&feed.name()).finish(),
            SourceVisual::Raster(frame) => f
                .debug_tuple("Raster")
                .field(&format_args!("{}x{}", frame.width, frame.height))
                .finish(),
        }
    }
}

impl SourceVisual {
    pub fn live(feed: impl LiveFeed + 'static) -> Self {
        SourceVisual::Live(Box::new(feed))
    }

    pub fn raster(frame: Frame) -> Self {
        SourceVisual::Raster(Arc::new(frame))
    }

    pub fn is_live(&self) -> bool {
        matches!(self, SourceVisual::Live(_))
    }

    /// Size of a fixed raster. Live feeds have no fixed size.
    pub fn raster_size(&self) -> Option<Resolution> {
        match self {
            SourceVisual::Raster(frame) => Some(frame.resolution()),
            SourceVisual::Live(_) => None,
        }
    }

    /// The frame to sample this tick.
    pub fn frame(&mut self) -> Option<FrameRef<'_>> {
        match self {
            SourceVisual::Live(feed) => feed.current_frame().map(FrameRef::Owned),
            SourceVisual::Raster(frame) => Some(FrameRef::Shared(&**frame)),
        }
    }
}

/// A frame borrowed from a raster or taken from a live feed.
pub enum FrameRef<'a> {
    Owned(Frame),
    Shared(&'a Frame),
}

impl std::ops::Deref for FrameRef<'_> {
    type Target = Frame;

    fn deref(&self) -> &Frame {
        match self {
            FrameRef::Owned(frame) => frame,
            FrameRef::Shared(frame) => frame,
        }
    }
}

/// Latest-frame slot shared between a capture thread and the render loop.
///
/// A capture thread calls [`FrameSlot::publish`] whenever it decodes a frame;
/// the render loop reads the newest one each tick.
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    latest: Arc<Mutex<Option<Frame>>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored frame.
    pub fn publish(&self, frame: Frame) {
        if let Ok(mut slot) = self.latest.lock() {
            *slot = Some(frame);
        }
    }

    /// Drop the stored frame, e.g. when the camera stops.
    pub fn clear(&self) {
        if let Ok(mut slot) = self.latest.lock() {
            *slot = None;
        }
    }

    /// Clone of the newest frame, if any.
    pub fn latest(&self) -> Option<Frame> {
        self.latest.lock().ok().and_then(|slot| slot.clone())
    }
}

impl LiveFeed for FrameSlot {
    fn current_frame(&mut self) -> Option<Frame> {
        self.latest()
    }

    fn name(&self) -> &str {
        "frame-slot"
    }
}

/// Live feed that plays a fixed list of frames in a loop, one per tick.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    frames: Vec<Frame>,
    position: usize,
}

impl FrameSequence {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl LiveFeed for FrameSequence {
    fn current_frame(&mut self) -> Option<Frame> {
        let frame = self.frames.get(self.position)?.clone();
        self.position = (self.position + 1) % self.frames.len();
        Some(frame)
    }

    fn name(&self) -> &str {
        "frame-sequence"
    }
}
