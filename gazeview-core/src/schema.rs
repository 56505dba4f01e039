//! Schema normalization for loosely-structured annotation tables
//!
//! Each record family (summary, phase, standing, quick-preview) maps raw
//! string rows onto a canonical shape through an ordered keyword precedence
//! list per logical field. Header detection is a single pass over row 0:
//! trim, lower-case, and if any cell matches any recognized keyword the
//! table is in header mode; otherwise every row is data and fields bind
//! positionally.
//!
//! Column resolution happens once per parse into a `ColumnMap`; the row loop
//! only indexes.

use crate::model::{AnnotationRow, PhaseRow, QuickPreviewSegment, StandingRow};
use crate::time::parse_clock;

// ---------------------------------------------------------------------------
// Keyword precedence tables
// ---------------------------------------------------------------------------

const START_KEYS: &[&str] = &[
    "start",
    "starttime",
    "start_time",
    "time",
    "timestamp",
    "start_sec",
    "startseconds",
];
const END_KEYS: &[&str] = &["end", "endtime", "end_time", "end_sec", "endseconds"];
const TEXT_KEYS: &[&str] = &["summary", "text", "description"];
const CATEGORY_KEYS: &[&str] = &["category", "label", "tag"];
const SUBCATEGORY_KEYS: &[&str] = &["sub_category", "subcategory"];
const MODE_KEYS: &[&str] = &["instruction mode", "instruction_mode", "instruction", "mode"];
const REVIEW_KEYS: &[&str] = &["review", "example", "quality"];
const COMMENT_KEYS: &[&str] = &["comments", "comment"];

const PHASE_START_KEYS: &[&str] = &["start", "starttime", "start_time"];
const PHASE_END_KEYS: &[&str] = &["end", "endtime", "end_time"];
const PHASE_LABEL_KEYS: &[&str] = &["phase", "label", "name"];

const STANDING_LABEL_KEYS: &[&str] = &["label", "position", "standing"];
const STANDING_IMAGE_KEYS: &[&str] = &["image", "img", "file", "filename"];

/// Cells that flip a summary table into header mode.
const SUMMARY_HEADER_KEYWORDS: &[&str] = &[
    "start",
    "starttime",
    "start_time",
    "time",
    "timestamp",
    "end",
    "endtime",
    "end_time",
    "summary",
    "text",
    "description",
    "category",
    "sub_category",
    "subcategory",
    "label",
    "tag",
    "instruction mode",
    "instruction_mode",
    "instruction",
    "mode",
    "review",
    "example",
    "quality",
    "importance",
    "comments",
    "comment",
];

const PHASE_HEADER_KEYWORDS: &[&str] =
    &["start", "starttime", "start_time", "end", "phase", "label", "name"];

const STANDING_HEADER_KEYWORDS: &[&str] = &[
    "start", "end", "label", "position", "standing", "image", "img", "file", "filename",
];

const PREVIEW_HEADER_KEYWORDS: &[&str] =
    &["start", "starttime", "start_time", "end", "endtime", "end_time"];

// ---------------------------------------------------------------------------
// Shared machinery
// ---------------------------------------------------------------------------

/// Row 0 after trim + lower-case, used for detection and column lookup.
fn header_cells(rows: &[Vec<String>]) -> Vec<String> {
    rows.first()
        .map(|row| row.iter().map(|c| c.trim().to_lowercase()).collect())
        .unwrap_or_default()
}

fn is_header(header: &[String], keywords: &[&str]) -> bool {
    header.iter().any(|cell| keywords.contains(&cell.as_str()))
}

/// First header cell matching any key, in key-precedence order.
fn find_column(header: &[String], keys: &[&str]) -> Option<usize> {
    keys.iter()
        .find_map(|key| header.iter().position(|cell| cell == key))
}

fn cell(row: &[String], idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| row.get(i)).map(|s| s.as_str())
}

fn cell_time(row: &[String], idx: Option<usize>) -> Option<f64> {
    cell(row, idx).and_then(parse_clock)
}

/// Trimmed cell as an owned string, with empty collapsed to `None`.
fn cell_text(row: &[String], idx: Option<usize>) -> Option<String> {
    cell(row, idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Summary family
// ---------------------------------------------------------------------------

/// Resolved column bindings for a summary-style table.
struct ColumnMap {
    start: Option<usize>,
    end: Option<usize>,
    text: Option<usize>,
    category: Option<usize>,
    subcategory: Option<usize>,
    mode: Option<usize>,
    review: Option<usize>,
    comment: Option<usize>,
}

impl ColumnMap {
    fn resolve(header: &[String]) -> Self {
        Self {
            start: find_column(header, START_KEYS),
            end: find_column(header, END_KEYS),
            text: find_column(header, TEXT_KEYS),
            category: find_column(header, CATEGORY_KEYS),
            subcategory: find_column(header, SUBCATEGORY_KEYS),
            mode: find_column(header, MODE_KEYS),
            review: find_column(header, REVIEW_KEYS),
            comment: find_column(header, COMMENT_KEYS),
        }
    }
}

/// Normalize a summary/category table into annotation rows.
///
/// Every data row is kept, including rows whose start time fails to parse:
/// free-text summaries stand alone without a time. `row_index` is the row's
/// 0-based position among data rows and is stable across re-parses, so later
/// edits can address rows by it.
///
/// Positional fallback (no recognized header): column 0 is the start time,
/// the last column is the text, and column 1 is the end time when the row has
/// more than two columns.
pub fn normalize_summary_rows(rows: &[Vec<String>]) -> Vec<AnnotationRow> {
    if rows.is_empty() {
        return Vec::new();
    }
    let header = header_cells(rows);
    let has_header = is_header(&header, SUMMARY_HEADER_KEYWORDS);
    let data_rows = if has_header { &rows[1..] } else { rows };
    let map = ColumnMap::resolve(&header);

    let mut out = Vec::with_capacity(data_rows.len());
    for (row_index, row) in data_rows.iter().enumerate() {
        if row.is_empty() {
            continue;
        }
        let item = if has_header {
            let text = match map.text {
                Some(idx) => row
                    .get(idx)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
                // No text column at all: join the non-empty cells
                None => row
                    .iter()
                    .filter(|f| !f.is_empty())
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" ")
                    .trim()
                    .to_string(),
            };
            AnnotationRow {
                start: cell_time(row, map.start),
                end: cell_time(row, map.end),
                text,
                category: cell_text(row, map.category),
                subcategory: cell_text(row, map.subcategory),
                mode: cell_text(row, map.mode),
                review: cell_text(row, map.review),
                comment: cell_text(row, map.comment),
                row_index,
            }
        } else {
            AnnotationRow {
                start: row.first().map(String::as_str).and_then(parse_clock),
                end: if row.len() > 2 {
                    row.get(1).map(String::as_str).and_then(parse_clock)
                } else {
                    None
                },
                text: row.last().map(|s| s.trim().to_string()).unwrap_or_default(),
                category: None,
                subcategory: None,
                mode: None,
                review: None,
                comment: None,
                row_index,
            }
        };
        out.push(item);
    }
    out
}

// ---------------------------------------------------------------------------
// Phase family
// ---------------------------------------------------------------------------

/// Normalize a phase table. Rows missing either bound are dropped; a missing
/// label falls back to `"Phase"`. Positional order: start, end, label.
pub fn normalize_phase_rows(rows: &[Vec<String>]) -> Vec<PhaseRow> {
    if rows.is_empty() {
        return Vec::new();
    }
    let header = header_cells(rows);
    let has_header = is_header(&header, PHASE_HEADER_KEYWORDS);
    let data_rows = if has_header { &rows[1..] } else { rows };
    let idx_start = find_column(&header, PHASE_START_KEYS);
    let idx_end = find_column(&header, PHASE_END_KEYS);
    let idx_label = find_column(&header, PHASE_LABEL_KEYS);

    let mut out = Vec::new();
    for row in data_rows {
        if row.is_empty() {
            continue;
        }
        let (start, end, label) = if has_header {
            (
                cell_time(row, idx_start),
                cell_time(row, idx_end),
                cell_text(row, idx_label),
            )
        } else {
            (
                row.first().map(String::as_str).and_then(parse_clock),
                row.get(1).map(String::as_str).and_then(parse_clock),
                row.get(2).map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            )
        };
        if let (Some(start), Some(end)) = (start, end) {
            out.push(PhaseRow {
                start,
                end,
                label: label.unwrap_or_else(|| "Phase".to_string()),
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Standing family
// ---------------------------------------------------------------------------

/// Normalize a standing-position table. All rows are kept at this stage
/// (segment building later drops the incomplete ones). When a row has no
/// image cell but its label reads like an image filename, the label is
/// promoted to the image field. Positional order: start, end, label, image.
pub fn normalize_standing_rows(rows: &[Vec<String>]) -> Vec<StandingRow> {
    if rows.is_empty() {
        return Vec::new();
    }
    let header = header_cells(rows);
    let has_header = is_header(&header, STANDING_HEADER_KEYWORDS);
    let data_rows = if has_header { &rows[1..] } else { rows };
    let idx_start = find_column(&header, &["start"]);
    let idx_end = find_column(&header, &["end"]);
    let idx_label = find_column(&header, STANDING_LABEL_KEYS);
    let idx_image = find_column(&header, STANDING_IMAGE_KEYS);

    let mut out = Vec::new();
    for row in data_rows {
        if row.is_empty() {
            continue;
        }
        if has_header {
            let label = cell_text(row, idx_label);
            let mut image = cell_text(row, idx_image);
            if image.is_none() {
                if let Some(l) = &label {
                    if crate::labels::is_likely_filename(l) {
                        image = Some(l.clone());
                    }
                }
            }
            out.push(StandingRow {
                start: cell_time(row, idx_start),
                end: cell_time(row, idx_end),
                label,
                image,
            });
        } else {
            out.push(StandingRow {
                start: row.first().map(String::as_str).and_then(parse_clock),
                end: row.get(1).map(String::as_str).and_then(parse_clock),
                label: row.get(2).map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
                image: row.get(3).map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Quick-preview family
// ---------------------------------------------------------------------------

/// Normalize a quick-preview table into sorted segments.
///
/// A row survives only when both times parse and `end > start`; the result
/// is sorted ascending by start. Positional order: start, end.
pub fn normalize_preview_rows(rows: &[Vec<String>]) -> Vec<QuickPreviewSegment> {
    if rows.is_empty() {
        return Vec::new();
    }
    let header = header_cells(rows);
    let has_header = is_header(&header, PREVIEW_HEADER_KEYWORDS);
    let data_rows = if has_header { &rows[1..] } else { rows };
    let idx_start = find_column(&header, PHASE_START_KEYS);
    let idx_end = find_column(&header, PHASE_END_KEYS);

    let mut segments = Vec::new();
    for row in data_rows {
        if row.is_empty() {
            continue;
        }
        let (start, end) = if has_header {
            (cell_time(row, idx_start), cell_time(row, idx_end))
        } else {
            (
                row.first().map(String::as_str).and_then(parse_clock),
                row.get(1).map(String::as_str).and_then(parse_clock),
            )
        };
        if let (Some(start), Some(end)) = (start, end) {
            if end > start {
                segments.push(QuickPreviewSegment { start, end });
            }
        }
    }
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    segments
}
