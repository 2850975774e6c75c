//! Capture sequence as an explicit state machine.
//!
//! The machine has no clock of its own. The driver calls
//! [`CaptureSequence::advance`] with the current time and the machine emits
//! every status event whose deadline has passed, in order. Tests drive it
//! with made-up timestamps; the async runner drives it with real sleeps.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::StripError;
use crate::camera::Frame;

/// Timings and photo count of one capture flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencePlan {
    pub photos: u32,
    /// First number shown by the countdown; it counts down to 1
    pub countdown_from: u32,
    pub countdown_tick: Duration,
    pub flash: Duration,
    pub preview: Duration,
}

impl SequencePlan {
    /// Four-photo strip: 3-2-1 countdown at one second a step, a 150 ms
    /// flash and a one second preview per photo.
    pub fn strip() -> Self {
        Self {
            photos: 4,
            countdown_from: 3,
            countdown_tick: Duration::from_millis(1000),
            flash: Duration::from_millis(150),
            preview: Duration::from_millis(1000),
        }
    }

    /// Single photo: 3-2-1 countdown, then the captured still is held for
    /// 1.5 s in total before the flow completes.
    pub fn single() -> Self {
        Self {
            photos: 1,
            countdown_from: 3,
            countdown_tick: Duration::from_millis(1000),
            flash: Duration::from_millis(150),
            preview: Duration::from_millis(1350),
        }
    }

    /// Wall time from start to `Done`.
    pub fn total_duration(&self) -> Duration {
        let per_photo =
            self.countdown_tick * self.countdown_from.max(1) + self.flash + self.preview;
        per_photo * self.photos.max(1)
    }
}

impl Default for SequencePlan {
    fn default() -> Self {
        Self::strip()
    }
}

/// Where the sequence is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceState {
    #[default]
    Idle,
    Countdown { photo: u32, count: u32 },
    Flash { photo: u32 },
    Preview { photo: u32 },
    Done,
}

/// Status event delivered to the capture UI.
///
/// Serialises as `{"step": "countdown", "count": 3, "photoNum": 1}`; the
/// preview image is not serialised.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "step", rename_all = "lowercase")]
pub enum StripEvent {
    Countdown {
        count: u32,
        #[serde(rename = "photoNum")]
        photo_num: u32,
    },
    Flash {
        #[serde(rename = "photoNum")]
        photo_num: u32,
    },
    Preview {
        #[serde(rename = "photoNum")]
        photo_num: u32,
        #[serde(skip)]
        image: Option<Arc<Frame>>,
    },
}

impl StripEvent {
    pub fn step(&self) -> &'static str {
        match self {
            StripEvent::Countdown { .. } => "countdown",
            StripEvent::Flash { .. } => "flash",
            StripEvent::Preview { .. } => "preview",
        }
    }

    pub fn photo_num(&self) -> u32 {
        match *self {
            StripEvent::Countdown { photo_num, .. }
            | StripEvent::Flash { photo_num }
            | StripEvent::Preview { photo_num, .. } => photo_num,
        }
    }
}

/// The capture sequence state machine.
#[derive(Debug, Clone)]
pub struct CaptureSequence {
    plan: SequencePlan,
    state: SequenceState,
    /// Time at which the current state ends
    deadline: Duration,
    photos: Vec<Arc<Frame>>,
    /// Photo taken at the end of the current countdown, shown by its preview
    captured: Option<Arc<Frame>>,
}

impl CaptureSequence {
    pub fn new(plan: SequencePlan) -> Self {
        let plan = SequencePlan {
            photos: plan.photos.max(1),
            countdown_from: plan.countdown_from.max(1),
            ..plan
        };
        Self {
            plan,
            state: SequenceState::Idle,
            deadline: Duration::ZERO,
            photos: Vec::new(),
            captured: None,
        }
    }

    pub fn plan(&self) -> &SequencePlan {
        &self.plan
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// True between `start` and `Done`.
    pub fn is_running(&self) -> bool {
        !matches!(self.state, SequenceState::Idle | SequenceState::Done)
    }

    pub fn is_done(&self) -> bool {
        self.state == SequenceState::Done
    }

    /// When the current state ends, if running.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.is_running().then_some(self.deadline)
    }

    /// Begin the first countdown at `now`.
    ///
    /// A sequence that is already running is not restarted. A finished one
    /// starts over with no photos.
    pub fn start(&mut self, now: Duration) -> Result<StripEvent, StripError> {
        if self.is_running() {
            return Err(StripError::AlreadyRunning);
        }
        self.photos.clear();
        self.captured = None;
        log::info!("Capture sequence started ({} photo(s))", self.plan.photos);
        Ok(self.begin_countdown(1, now))
    }

    /// Emit every event due at `now`.
    ///
    /// `capture` is called once per photo when its countdown expires. A
    /// capture that yields nothing is logged and that photo is left out.
    pub fn advance<C>(&mut self, now: Duration, mut capture: C) -> Vec<StripEvent>
    where
        C: FnMut() -> Option<Frame>,
    {
        let mut events = Vec::new();
        while self.is_running() && now >= self.deadline {
            let at = self.deadline;
            match self.state {
                SequenceState::Countdown { photo, count } if count > 1 => {
                    self.state = SequenceState::Countdown {
                        photo,
                        count: count - 1,
                    };
                    self.deadline = at + self.plan.countdown_tick;
                    events.push(StripEvent::Countdown {
                        count: count - 1,
                        photo_num: photo,
                    });
                }
                SequenceState::Countdown { photo, .. } => {
                    self.captured = capture().map(Arc::new);
                    match &self.captured {
                        Some(frame) => self.photos.push(frame.clone()),
                        None => log::warn!("Photo {} could not be captured", photo),
                    }
                    self.state = SequenceState::Flash { photo };
                    self.deadline = at + self.plan.flash;
                    events.push(StripEvent::Flash { photo_num: photo });
                }
                SequenceState::Flash { photo } => {
                    self.state = SequenceState::Preview { photo };
                    self.deadline = at + self.plan.preview;
                    events.push(StripEvent::Preview {
                        photo_num: photo,
                        image: self.captured.take(),
                    });
                }
                SequenceState::Preview { photo } if photo < self.plan.photos => {
                    events.push(self.begin_countdown(photo + 1, at));
                }
                SequenceState::Preview { .. } => {
                    log::info!("Capture sequence done ({} photo(s))", self.photos.len());
                    self.state = SequenceState::Done;
                }
                SequenceState::Idle | SequenceState::Done => break,
            }
        }
        events
    }

    /// Photos captured so far, in order.
    pub fn photos(&self) -> &[Arc<Frame>] {
        &self.photos
    }

    /// Take the captured photos, leaving the sequence empty.
    pub fn take_photos(&mut self) -> Vec<Arc<Frame>> {
        std::mem::take(&mut self.photos)
    }

    fn begin_countdown(&mut self, photo: u32, at: Duration) -> StripEvent {
        let count = self.plan.countdown_from;
        self.state = SequenceState::Countdown { photo, count };
        self.deadline = at + self.plan.countdown_tick;
        StripEvent::Countdown {
            count,
            photo_num: photo,
        }
    }
}
