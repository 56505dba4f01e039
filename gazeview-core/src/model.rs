//! Canonical record types
//!
//! These are the immutable snapshots the ingestion pipeline produces and the
//! synchronization layer consumes. They are rebuilt wholesale whenever a
//! source text or byte stream changes; nothing mutates them in place.

use serde::{Deserialize, Serialize};

/// One subtitle entry with a start/end time and text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Source index, or 1-based emission order when the source omits it
    pub index: i64,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds (exclusive)
    pub end: f64,
    /// Cue text with inline markup tags stripped
    pub text: String,
}

/// A normalized annotation row from a summary-style table.
///
/// `row_index` is the stable identity used for later edits: it is the row's
/// 0-based position within the data-row sequence, independent of whether the
/// time fields parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRow {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub text: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    /// Instruction mode label, as written in the source
    pub mode: Option<String>,
    /// Review/example classification, as written in the source
    pub review: Option<String>,
    pub comment: Option<String>,
    pub row_index: usize,
}

/// A surgical phase: a labeled interval that always has both bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRow {
    pub start: f64,
    pub end: f64,
    pub label: String,
}

/// A standing-position log row. Bounds are optional at this stage; segment
/// building drops rows missing either one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub label: Option<String>,
    /// Reference image filename, when the source provides one
    pub image: Option<String>,
}

/// One curated quick-preview segment. Sequences are sorted ascending and
/// assumed non-overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuickPreviewSegment {
    pub start: f64,
    pub end: f64,
}

/// A gaze sample sequence at a uniform frame rate.
///
/// Coordinates are either normalized to `[0, 1]` or pixel-space; the
/// `normalized` flag applies to the whole sequence, not per sample.
/// Off-screen/unknown samples carry −1.0 coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazeTrack {
    pub points: Vec<[f64; 2]>,
    pub normalized: bool,
}

impl GazeTrack {
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            normalized: true,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_serde_round_trip() {
        let cue = Cue {
            index: 3,
            start: 1.5,
            end: 4.0,
            text: "hello".to_string(),
        };
        let json = serde_json::to_string(&cue).unwrap();
        let back: Cue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cue);
    }

    #[test]
    fn test_empty_gaze_track() {
        let track = GazeTrack::empty();
        assert!(track.is_empty());
        assert_eq!(track.len(), 0);
        assert!(track.normalized);
    }
}
