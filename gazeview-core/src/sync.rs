//! Playback-clock synchronization
//!
//! Pure lookups from a playback time into the time-indexed streams. Interval
//! lookup is a binary search over sorted starts, so per-tick resolution stays
//! logarithmic no matter how many annotations a session carries; the gaze
//! lookup is a constant-time frame-index computation.

use crate::model::{Cue, PhaseRow, QuickPreviewSegment};
use crate::segments::{Interval, StandingSegment};

/// A time span on the playback axis, half-open: `[start, end)`.
pub trait Timed {
    fn start(&self) -> f64;
    fn end(&self) -> f64;
}

impl Timed for Cue {
    fn start(&self) -> f64 {
        self.start
    }
    fn end(&self) -> f64 {
        self.end
    }
}

impl Timed for Interval {
    fn start(&self) -> f64 {
        self.start
    }
    fn end(&self) -> f64 {
        self.end
    }
}

impl Timed for PhaseRow {
    fn start(&self) -> f64 {
        self.start
    }
    fn end(&self) -> f64 {
        self.end
    }
}

impl Timed for StandingSegment {
    fn start(&self) -> f64 {
        self.start
    }
    fn end(&self) -> f64 {
        self.end
    }
}

impl Timed for QuickPreviewSegment {
    fn start(&self) -> f64 {
        self.start
    }
    fn end(&self) -> f64 {
        self.end
    }
}

/// Index of the first span active at time `t`, or `None` when `t` falls
/// before the first span, after the last, or in a gap.
///
/// `spans` must be sorted ascending by start; they may overlap, in which
/// case the earliest covering span wins. Boundaries are half-open: at
/// exactly `end` the span has already released, and when a following span
/// starts there it takes over in the same instant.
pub fn active_interval<T: Timed>(t: f64, spans: &[T]) -> Option<usize> {
    if spans.is_empty() || !t.is_finite() {
        return None;
    }
    // Binary search bounds the candidates; spans past this point have not
    // started yet.
    let after = spans.partition_point(|s| s.start() <= t);
    spans[..after].iter().position(|s| t < s.end())
}

/// Frame index into a gaze track at time `t`: `floor(t * fps)` clamped to
/// the track bounds. `None` only when the track is empty or `t` is not a
/// finite time.
pub fn gaze_index(t: f64, fps: f64, len: usize) -> Option<usize> {
    if len == 0 || !t.is_finite() || !fps.is_finite() {
        return None;
    }
    let raw = (t * fps).floor();
    let clamped = raw.clamp(0.0, (len - 1) as f64);
    Some(clamped as usize)
}
