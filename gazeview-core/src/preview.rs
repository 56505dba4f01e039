//! Quick-preview playback control
//!
//! A small state machine that walks playback across a curated list of
//! segments at an elevated rate. It never touches a clock or a player
//! itself: every transition returns the commands the host should apply, so
//! the controller stays testable and host-agnostic.

use crate::config::ViewerConfig;
use crate::model::QuickPreviewSegment;

/// Instruction for the hosting player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviewCommand {
    /// Jump the playback clock to the given time
    Seek(f64),
    /// Change the playback rate
    SetRate(f64),
    /// Stop advancing the clock
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    /// Currently traversing the segment at this index
    Playing(usize),
}

/// Drives playback across preview segments.
///
/// Segments must be sorted ascending and non-overlapping. The host feeds
/// every playback-clock tick to [`on_tick`](Self::on_tick); ticks arriving
/// while idle are ignored, so a stale tick after the run finishes cannot
/// restart it.
#[derive(Debug)]
pub struct QuickPreviewController {
    segments: Vec<QuickPreviewSegment>,
    state: State,
    rate: f64,
    seek_epsilon: f64,
    end_epsilon: f64,
}

impl QuickPreviewController {
    pub fn new(segments: Vec<QuickPreviewSegment>, config: &ViewerConfig) -> Self {
        Self {
            segments,
            state: State::Idle,
            rate: config.preview_rate,
            seek_epsilon: config.seek_epsilon_secs,
            end_epsilon: config.end_epsilon_secs,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, State::Playing(_))
    }

    /// Index of the segment currently being traversed.
    pub fn current_segment(&self) -> Option<usize> {
        match self.state {
            State::Playing(idx) => Some(idx),
            State::Idle => None,
        }
    }

    /// Begin a preview run from the first segment. With no segments the
    /// controller stays idle and emits nothing.
    pub fn start(&mut self) -> Vec<PreviewCommand> {
        let first = match self.segments.first() {
            Some(seg) => *seg,
            None => return Vec::new(),
        };
        self.state = State::Playing(0);
        vec![
            PreviewCommand::SetRate(self.rate),
            PreviewCommand::Seek(first.start.max(0.0)),
        ]
    }

    /// Abort the run, restoring normal playback rate. Playback continues
    /// from wherever the clock is.
    pub fn stop(&mut self) -> Vec<PreviewCommand> {
        if !self.is_playing() {
            return Vec::new();
        }
        self.state = State::Idle;
        vec![PreviewCommand::SetRate(1.0)]
    }

    /// Advance the state machine for a playback-clock tick at time `t`.
    ///
    /// Behind the current segment (beyond the seek tolerance) the clock is
    /// pushed forward to the segment start. At the segment's effective end
    /// (within the end tolerance, so a coarse tick cannot overshoot into the
    /// gap) the run moves to the next segment, or finishes: rate restored,
    /// playback paused, state idle.
    pub fn on_tick(&mut self, t: f64) -> Vec<PreviewCommand> {
        let idx = match self.state {
            State::Playing(idx) => idx.min(self.segments.len().saturating_sub(1)),
            State::Idle => return Vec::new(),
        };
        if self.segments.is_empty() {
            self.state = State::Idle;
            return Vec::new();
        }

        let seg = self.segments[idx];
        if t < seg.start - self.seek_epsilon {
            return vec![PreviewCommand::Seek(seg.start)];
        }
        if t >= seg.end - self.end_epsilon {
            let next = idx + 1;
            if next >= self.segments.len() {
                self.state = State::Idle;
                return vec![PreviewCommand::SetRate(1.0), PreviewCommand::Pause];
            }
            self.state = State::Playing(next);
            return vec![PreviewCommand::Seek(self.segments[next].start.max(0.0))];
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(pairs: &[(f64, f64)]) -> Vec<QuickPreviewSegment> {
        pairs
            .iter()
            .map(|&(start, end)| QuickPreviewSegment { start, end })
            .collect()
    }

    fn controller(pairs: &[(f64, f64)]) -> QuickPreviewController {
        QuickPreviewController::new(segments(pairs), &ViewerConfig::default())
    }

    #[test]
    fn test_start_seeks_first_segment_at_rate() {
        let mut c = controller(&[(3.0, 5.0)]);
        let commands = c.start();
        assert_eq!(
            commands,
            vec![PreviewCommand::SetRate(6.0), PreviewCommand::Seek(3.0)]
        );
        assert!(c.is_playing());
        assert_eq!(c.current_segment(), Some(0));
    }

    #[test]
    fn test_empty_segments_never_start() {
        let mut c = controller(&[]);
        assert!(c.start().is_empty());
        assert!(!c.is_playing());
        assert!(c.on_tick(1.0).is_empty());
    }

    #[test]
    fn test_full_run_visits_each_segment_once() {
        let mut c = controller(&[(0.0, 2.0), (10.0, 12.0)]);
        c.start();

        // Inside the first segment: nothing to do
        assert!(c.on_tick(0.5).is_empty());
        assert!(c.on_tick(1.5).is_empty());

        // Reaching the effective end jumps to the second segment
        assert_eq!(c.on_tick(1.99), vec![PreviewCommand::Seek(10.0)]);
        assert_eq!(c.current_segment(), Some(1));

        assert!(c.on_tick(10.5).is_empty());

        // End of the last segment finishes the run
        assert_eq!(
            c.on_tick(11.99),
            vec![PreviewCommand::SetRate(1.0), PreviewCommand::Pause]
        );
        assert!(!c.is_playing());

        // Stale ticks after the run are ignored
        assert!(c.on_tick(12.5).is_empty());
    }

    #[test]
    fn test_clock_behind_segment_is_pushed_forward() {
        let mut c = controller(&[(10.0, 12.0)]);
        c.start();
        assert_eq!(c.on_tick(3.0), vec![PreviewCommand::Seek(10.0)]);
        // Within the seek tolerance no correction is issued
        assert!(c.on_tick(9.96).is_empty());
    }

    #[test]
    fn test_end_tolerance_fires_before_exact_end() {
        let mut c = controller(&[(0.0, 2.0), (10.0, 12.0)]);
        c.start();
        assert!(c.on_tick(1.97).is_empty());
        assert_eq!(c.on_tick(1.98), vec![PreviewCommand::Seek(10.0)]);
    }

    #[test]
    fn test_stop_restores_rate_without_pausing() {
        let mut c = controller(&[(0.0, 2.0)]);
        c.start();
        assert_eq!(c.stop(), vec![PreviewCommand::SetRate(1.0)]);
        assert!(!c.is_playing());
        assert!(c.stop().is_empty());
    }
}
