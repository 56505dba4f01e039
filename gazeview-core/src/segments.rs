//! Timeline segment building
//!
//! Turns normalized annotation rows into renderable, gap-filled, merged
//! interval lists. Coloring is deterministic: a label hashes into a fixed
//! palette, so the same label gets the same color in every view and every
//! session.

use serde::Serialize;

use crate::config::ViewerConfig;
use crate::model::{AnnotationRow, StandingRow};
use std::collections::HashMap;

/// A renderable timeline interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
    pub label: String,
    pub color: &'static str,
}

/// A standing-position interval; label and image pass through as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingSegment {
    pub start: f64,
    pub end: f64,
    pub label: Option<String>,
    pub image: Option<String>,
}

const PALETTE: [&str; 10] = [
    "#4f8cff", "#7bde8a", "#f2c94c", "#f2994a", "#eb5757", "#bb6bd9", "#2dd4bf", "#a3e635",
    "#f472b6", "#60a5fa",
];

/// Deterministic label-to-color assignment, cached per lower-cased label.
#[derive(Debug, Default)]
pub struct ColorCache {
    assigned: HashMap<String, &'static str>,
}

impl ColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&mut self, label: &str) -> &'static str {
        let key = label.to_lowercase();
        if let Some(color) = self.assigned.get(&key) {
            return color;
        }
        let color = PALETTE[label_hash(&key) % PALETTE.len()];
        self.assigned.insert(key, color);
        color
    }
}

/// 32-bit shift-accumulate string hash over UTF-16 code units. The shift
/// wraps at 32 bits while the accumulator itself stays wide.
fn label_hash(key: &str) -> usize {
    let mut acc: i64 = 0;
    for unit in key.encode_utf16() {
        let shifted = (acc as i32).wrapping_shl(5) as i64;
        acc = shifted - acc + unit as i64;
    }
    acc.unsigned_abs() as usize
}

/// Build gap-filled, merged segments from annotation rows.
///
/// `pick_label` chooses the grouping label per row; rows yielding `None` are
/// skipped, as are rows without a start time. A missing end time extends the
/// segment by `default_gap_secs`; ends clamp to `total_duration` when it is
/// known (> 0), and a non-positive width collapses to a minimal sliver so the
/// segment stays visible. After sorting by (start, end), adjacent segments
/// with the same label merge when the gap between them is within
/// `merge_epsilon_secs`.
pub fn build_segments<F>(
    items: &[AnnotationRow],
    total_duration: f64,
    config: &ViewerConfig,
    cache: &mut ColorCache,
    pick_label: F,
) -> Vec<Interval>
where
    F: Fn(&AnnotationRow) -> Option<String>,
{
    struct Raw {
        start: f64,
        end: f64,
        label: String,
    }

    let mut raw: Vec<Raw> = Vec::new();
    for item in items {
        let start = match item.start {
            Some(s) if s.is_finite() => s,
            _ => continue,
        };
        let label = match pick_label(item) {
            Some(l) => l,
            None => continue,
        };
        let s = start.max(0.0);
        let mut e = match item.end {
            Some(e) if e.is_finite() => e,
            _ => s + config.default_gap_secs,
        };
        if total_duration > 0.0 {
            e = e.min(total_duration);
        }
        if e <= s {
            let sliver = s + 0.001;
            e = if total_duration > 0.0 {
                total_duration.min(sliver)
            } else {
                sliver
            };
        }
        raw.push(Raw { start: s, end: e, label });
    }

    raw.sort_by(|a, b| {
        a.start
            .total_cmp(&b.start)
            .then(a.end.total_cmp(&b.end))
    });

    let mut merged: Vec<Raw> = Vec::new();
    for seg in raw {
        match merged.last_mut() {
            Some(last)
                if last.label == seg.label
                    && seg.start <= last.end + config.merge_epsilon_secs =>
            {
                last.end = last.end.max(seg.end);
            }
            _ => merged.push(seg),
        }
    }

    merged
        .into_iter()
        .map(|seg| {
            let color = cache.color_for(&seg.label);
            Interval {
                start: seg.start,
                end: seg.end,
                label: seg.label,
                color,
            }
        })
        .collect()
}

/// Build category segments: no gap filling, rows missing either bound are
/// dropped. The label prefers the subcategory, then the category, then a
/// generic placeholder.
pub fn build_category_segments(items: &[AnnotationRow], cache: &mut ColorCache) -> Vec<Interval> {
    let mut segments: Vec<Interval> = Vec::new();
    for item in items {
        let (start, end) = match (item.start, item.end) {
            (Some(s), Some(e)) if s.is_finite() && e.is_finite() => (s, e),
            _ => continue,
        };
        let label = item
            .subcategory
            .as_deref()
            .filter(|l| !l.is_empty())
            .or(item.category.as_deref().filter(|l| !l.is_empty()))
            .unwrap_or("Segment")
            .to_string();
        let color = cache.color_for(&label);
        segments.push(Interval { start, end, label, color });
    }
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    segments
}

/// Build standing segments: rows missing either bound are dropped, the rest
/// sort by start.
pub fn build_standing_segments(rows: &[StandingRow]) -> Vec<StandingSegment> {
    let mut segments: Vec<StandingSegment> = rows
        .iter()
        .filter_map(|r| match (r.start, r.end) {
            (Some(start), Some(end)) if start.is_finite() && end.is_finite() => {
                Some(StandingSegment {
                    start,
                    end,
                    label: r.label.clone(),
                    image: r.image.clone(),
                })
            }
            _ => None,
        })
        .collect();
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(start: Option<f64>, end: Option<f64>, label: &str) -> AnnotationRow {
        AnnotationRow {
            start,
            end,
            text: String::new(),
            category: Some(label.to_string()),
            subcategory: None,
            mode: None,
            review: None,
            comment: None,
            row_index: 0,
        }
    }

    fn by_category(it: &AnnotationRow) -> Option<String> {
        it.category.clone()
    }

    #[test]
    fn test_gap_fill_and_clamp() {
        let config = ViewerConfig::default();
        let mut cache = ColorCache::new();
        let items = vec![item(Some(10.0), None, "A"), item(Some(98.0), None, "B")];
        let segments = build_segments(&items, 100.0, &config, &mut cache, by_category);
        assert_eq!(segments.len(), 2);
        // Missing end extends by the default gap
        assert_eq!(segments[0].start, 10.0);
        assert_eq!(segments[0].end, 15.0);
        // Clamped to the known duration
        assert_eq!(segments[1].end, 100.0);
    }

    #[test]
    fn test_touching_same_label_segments_merge() {
        let config = ViewerConfig::default();
        let mut cache = ColorCache::new();
        let items = vec![
            item(Some(0.0), Some(5.0), "A"),
            item(Some(5.0005), Some(9.0), "A"),
            item(Some(9.0), Some(12.0), "B"),
        ];
        let segments = build_segments(&items, 0.0, &config, &mut cache, by_category);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].label, "A");
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[0].end, 9.0);
        assert_eq!(segments[1].label, "B");
    }

    #[test]
    fn test_gap_beyond_epsilon_stays_split() {
        let config = ViewerConfig::default();
        let mut cache = ColorCache::new();
        let items = vec![
            item(Some(0.0), Some(5.0), "A"),
            item(Some(5.1), Some(9.0), "A"),
        ];
        let segments = build_segments(&items, 0.0, &config, &mut cache, by_category);
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_inverted_interval_collapses_to_sliver() {
        let config = ViewerConfig::default();
        let mut cache = ColorCache::new();
        let items = vec![item(Some(10.0), Some(4.0), "A")];
        let segments = build_segments(&items, 100.0, &config, &mut cache, by_category);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].end > segments[0].start);
        assert!(segments[0].end - segments[0].start < 0.01);
    }

    #[test]
    fn test_rows_without_start_or_label_are_skipped() {
        let config = ViewerConfig::default();
        let mut cache = ColorCache::new();
        let mut unlabeled = item(Some(3.0), Some(4.0), "A");
        unlabeled.category = None;
        let items = vec![item(None, Some(4.0), "A"), unlabeled];
        let segments = build_segments(&items, 0.0, &config, &mut cache, by_category);
        assert!(segments.is_empty());
    }

    #[test]
    fn test_color_is_stable_and_case_insensitive() {
        let mut cache = ColorCache::new();
        let a = cache.color_for("Suturing");
        let b = cache.color_for("suturing");
        let c = cache.color_for("SUTURING");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert!(PALETTE.contains(&a));
    }

    #[test]
    fn test_category_segments_prefer_subcategory() {
        let mut cache = ColorCache::new();
        let mut it = item(Some(1.0), Some(2.0), "Cat");
        it.subcategory = Some("Sub".to_string());
        let segments = build_category_segments(&[it, item(Some(0.0), Some(1.0), "Cat")], &mut cache);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].label, "Cat");
        assert_eq!(segments[1].label, "Sub");
    }

    #[test]
    fn test_standing_segments_drop_incomplete_and_sort() {
        let rows = vec![
            StandingRow {
                start: Some(30.0),
                end: Some(60.0),
                label: Some("right".to_string()),
                image: None,
            },
            StandingRow {
                start: Some(0.0),
                end: None,
                label: None,
                image: None,
            },
            StandingRow {
                start: Some(0.0),
                end: Some(30.0),
                label: Some("left".to_string()),
                image: Some("a.png".to_string()),
            },
        ];
        let segments = build_standing_segments(&rows);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].label.as_deref(), Some("left"));
        assert_eq!(segments[1].label.as_deref(), Some("right"));
    }
}
