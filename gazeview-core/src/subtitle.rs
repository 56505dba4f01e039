//! Subtitle (SRT-style) block parsing
//!
//! Grammar: zero or more blocks separated by blank lines. Each block is an
//! optional integer index line, a `<time> --> <time>` range line, then text
//! lines until a blank line or end of input.
//!
//! Resilience rule: a block whose time-range line does not match is
//! discarded alone — the parser scans forward to the next blank line and
//! resumes — so one corrupt block never aborts the stream.

use crate::model::Cue;
use crate::time::parse_timestamp;

/// Parse subtitle text into cues.
///
/// A cue is emitted only when both timestamps parse; its index defaults to
/// `1 + cues emitted so far` when the index line is absent or non-numeric.
/// Inline `<...>` markup is stripped from the accumulated text.
///
/// # Examples
///
/// ```
/// use gazeview_core::subtitle::parse_subtitles;
///
/// let cues = parse_subtitles("1\n00:00:01,000 --> 00:00:04,000\nHello\n");
/// assert_eq!(cues.len(), 1);
/// assert_eq!(cues[0].start, 1.0);
/// assert_eq!(cues[0].text, "Hello");
/// ```
pub fn parse_subtitles(text: &str) -> Vec<Cue> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let mut cues: Vec<Cue> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        // Skip blank separators
        while i < lines.len() && lines[i].trim().is_empty() {
            i += 1;
        }
        if i >= lines.len() {
            break;
        }

        // Optional index line
        let mut index: Option<i64> = None;
        let first = lines[i].trim();
        if !first.is_empty() && first.chars().all(|c| c.is_ascii_digit()) {
            index = first.parse().ok();
            i += 1;
        }

        // Time-range line
        let time_line = if i < lines.len() { lines[i] } else { "" };
        i += 1;
        let range = match parse_range_line(time_line) {
            Some(range) => range,
            None => {
                // Malformed block: skip to the next blank line and resume
                while i < lines.len() && !lines[i].trim().is_empty() {
                    i += 1;
                }
                continue;
            }
        };

        // Accumulate text lines
        let mut text_lines: Vec<&str> = Vec::new();
        while i < lines.len() && !lines[i].trim().is_empty() {
            text_lines.push(lines[i]);
            i += 1;
        }
        let cue_text = strip_tags(&text_lines.join("\n")).trim().to_string();

        let (start, end) = range;
        if start.is_finite() && end.is_finite() {
            cues.push(Cue {
                index: index.unwrap_or(cues.len() as i64 + 1),
                start,
                end,
                text: cue_text,
            });
        }
    }

    cues
}

/// Parse a `<time> --> <time>` line into (start, end) seconds.
fn parse_range_line(line: &str) -> Option<(f64, f64)> {
    let (left, right) = line.split_once("-->")?;
    let start = parse_timestamp(left.trim())?;
    let end = parse_timestamp(right.trim())?;
    Some((start, end))
}

/// Remove inline `<...>` markup tags.
///
/// An unclosed `<` swallows the remainder of the text, matching the
/// greedy-tag behavior subtitle renderers exhibit.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}
