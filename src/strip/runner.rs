//! Async driver for the capture sequence.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};

use super::sequence::{CaptureSequence, SequencePlan, StripEvent};
use super::StripError;
use crate::camera::Frame;

/// Run a capture flow with real delays.
///
/// `capture` is called when each countdown reaches zero; `on_event` sees
/// every status event in order. Returns the captured photos.
pub async fn run_sequence<C, F>(
    plan: SequencePlan,
    mut capture: C,
    mut on_event: F,
) -> Result<Vec<Arc<Frame>>, StripError>
where
    C: FnMut() -> Option<Frame>,
    F: FnMut(&StripEvent),
{
    let mut sequence = CaptureSequence::new(plan);
    let start = Instant::now();

    on_event(&sequence.start(Duration::ZERO)?);
    while let Some(deadline) = sequence.next_deadline() {
        sleep_until(start + deadline).await;
        for event in sequence.advance(start.elapsed(), &mut capture) {
            log::debug!("Strip step: {} (photo {})", event.step(), event.photo_num());
            on_event(&event);
        }
    }

    Ok(sequence.take_photos())
}
