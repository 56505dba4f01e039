//! Session aggregation and per-tick resolution
//!
//! A `SessionModel` is the canonical bundle consumers receive: every
//! annotation stream parsed, normalized, and segment-built, plus the gaze
//! track and known duration. Streams are independent; a source that is
//! absent or fails to decode degrades to an empty view and the rest of the
//! model is unaffected.

use tracing::{debug, warn};

use crate::config::ViewerConfig;
use crate::gaze::coerce_gaze;
use crate::labels::canonical_mode;
use crate::model::{AnnotationRow, Cue, GazeTrack, PhaseRow, QuickPreviewSegment};
use crate::schema::{
    normalize_phase_rows, normalize_preview_rows, normalize_standing_rows,
    normalize_summary_rows,
};
use crate::segments::{
    build_category_segments, build_segments, build_standing_segments, ColorCache, Interval,
    StandingSegment,
};
use crate::subtitle::parse_subtitles;
use crate::sync::{active_interval, gaze_index};
use crate::table::parse_rows;
use crate::tensor;

/// Everything active at one playback instant. Indices refer into the
/// corresponding `SessionModel` lists; `None` means nothing is active there.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActiveState {
    pub cue: Option<usize>,
    pub mode_segment: Option<usize>,
    pub category_segment: Option<usize>,
    pub phase: Option<usize>,
    pub standing: Option<usize>,
    /// Gaze point at this instant; `(-1.0, -1.0)` samples mean off-screen
    pub gaze_point: Option<[f64; 2]>,
}

/// Collects raw sources, all optional, then builds the model in one pass.
#[derive(Debug, Default)]
pub struct SessionBuilder {
    config: ViewerConfig,
    duration: f64,
    summary_text: Option<String>,
    category_text: Option<String>,
    phase_text: Option<String>,
    standing_text: Option<String>,
    preview_text: Option<String>,
    subtitle_text: Option<String>,
    gaze_bytes: Option<Vec<u8>>,
}

impl SessionBuilder {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Known media duration in seconds; 0 means unknown (segment ends then
    /// go unclamped).
    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    pub fn summary_csv(mut self, text: impl Into<String>) -> Self {
        self.summary_text = Some(text.into());
        self
    }

    pub fn category_csv(mut self, text: impl Into<String>) -> Self {
        self.category_text = Some(text.into());
        self
    }

    pub fn phases_csv(mut self, text: impl Into<String>) -> Self {
        self.phase_text = Some(text.into());
        self
    }

    pub fn standing_csv(mut self, text: impl Into<String>) -> Self {
        self.standing_text = Some(text.into());
        self
    }

    pub fn preview_csv(mut self, text: impl Into<String>) -> Self {
        self.preview_text = Some(text.into());
        self
    }

    pub fn subtitles(mut self, text: impl Into<String>) -> Self {
        self.subtitle_text = Some(text.into());
        self
    }

    pub fn gaze_npy(mut self, bytes: Vec<u8>) -> Self {
        self.gaze_bytes = Some(bytes);
        self
    }

    pub fn build(self) -> SessionModel {
        let mut colors = ColorCache::new();

        let mut cues = self
            .subtitle_text
            .as_deref()
            .map(parse_subtitles)
            .unwrap_or_default();
        cues.sort_by(|a, b| a.start.total_cmp(&b.start));

        let annotations = self
            .summary_text
            .as_deref()
            .map(|t| normalize_summary_rows(&parse_rows(t)))
            .unwrap_or_default();

        // Instruction-mode timeline from the summary stream
        let mode_segments = build_segments(
            &annotations,
            self.duration,
            &self.config,
            &mut colors,
            |item| {
                item.mode
                    .as_deref()
                    .map(canonical_mode)
                    .filter(|m| !m.is_empty())
            },
        );

        let category_rows = self
            .category_text
            .as_deref()
            .map(|t| normalize_summary_rows(&parse_rows(t)))
            .unwrap_or_default();
        let category_segments = build_category_segments(&category_rows, &mut colors);

        let mut phases = self
            .phase_text
            .as_deref()
            .map(|t| normalize_phase_rows(&parse_rows(t)))
            .unwrap_or_default();
        phases.sort_by(|a, b| a.start.total_cmp(&b.start));

        let standing = self
            .standing_text
            .as_deref()
            .map(|t| build_standing_segments(&normalize_standing_rows(&parse_rows(t))))
            .unwrap_or_default();

        let preview_segments = self
            .preview_text
            .as_deref()
            .map(|t| normalize_preview_rows(&parse_rows(t)))
            .unwrap_or_default();

        let gaze = match self.gaze_bytes.as_deref() {
            Some(bytes) => match tensor::decode(bytes) {
                Ok(t) => coerce_gaze(&t),
                Err(err) => {
                    warn!(%err, "gaze tensor rejected; continuing without gaze");
                    GazeTrack::empty()
                }
            },
            None => GazeTrack::empty(),
        };

        debug!(
            cues = cues.len(),
            annotations = annotations.len(),
            mode_segments = mode_segments.len(),
            category_segments = category_segments.len(),
            phases = phases.len(),
            standing = standing.len(),
            preview_segments = preview_segments.len(),
            gaze_points = gaze.len(),
            "session model built"
        );

        SessionModel {
            config: self.config,
            duration: self.duration,
            cues,
            annotations,
            mode_segments,
            category_segments,
            phases,
            standing,
            preview_segments,
            gaze,
        }
    }
}

/// The built, immutable session. Rebuilt wholesale when a source changes.
#[derive(Debug)]
pub struct SessionModel {
    pub config: ViewerConfig,
    pub duration: f64,
    pub cues: Vec<Cue>,
    pub annotations: Vec<AnnotationRow>,
    /// Instruction-mode timeline, gap-filled and merged
    pub mode_segments: Vec<Interval>,
    pub category_segments: Vec<Interval>,
    pub phases: Vec<PhaseRow>,
    pub standing: Vec<StandingSegment>,
    pub preview_segments: Vec<QuickPreviewSegment>,
    pub gaze: GazeTrack,
}

impl SessionModel {
    /// Resolve every stream at playback time `t`. Pure: same `t`, same
    /// answer, no state carried between ticks.
    pub fn tick(&self, t: f64) -> ActiveState {
        let gaze_point = gaze_index(t, self.config.gaze_fps, self.gaze.len())
            .map(|idx| self.gaze.points[idx]);
        ActiveState {
            cue: active_interval(t, &self.cues),
            mode_segment: active_interval(t, &self.mode_segments),
            category_segment: active_interval(t, &self.category_segments),
            phase: active_interval(t, &self.phases),
            standing: active_interval(t, &self.standing),
            gaze_point,
        }
    }
}
