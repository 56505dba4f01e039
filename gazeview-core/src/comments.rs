//! Comment and importance edit staging
//!
//! Edits address annotation rows by `row_index`, the stable 0-based data-row
//! position the normalizer assigns, so they survive re-parses of the source
//! table. Applying edits works on the raw row grid rather than the
//! normalized model: the source table is the record of authority and every
//! cell the edit does not touch must survive the round-trip byte-for-byte
//! (modulo quoting).

use crate::{Error, Result};
use std::collections::HashMap;

/// Canonical header for the comment column when it has to be created.
pub const COMMENTS_COLUMN: &str = "Comments";
/// Canonical header for the importance column when it has to be created.
pub const IMPORTANCE_COLUMN: &str = "importance";

/// Pending edits for one column, keyed by `row_index`. Staging the same row
/// twice keeps the later value.
#[derive(Debug, Default)]
pub struct CommentStore {
    pending: HashMap<usize, String>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, row_index: usize, value: impl Into<String>) {
        self.pending.insert(row_index, value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Drain all staged edits, sorted by row index for deterministic apply
    /// order.
    pub fn drain(&mut self) -> Vec<(usize, String)> {
        let mut updates: Vec<(usize, String)> = self.pending.drain().collect();
        updates.sort_by_key(|(row_index, _)| *row_index);
        updates
    }
}

/// Write staged values into `column` of a raw row grid.
///
/// Row 0 is the header. When no header cell matches `column`
/// (case-insensitively, trimmed), the column is appended. Each update lands
/// at data row `row_index`; rows shorter than the header are padded with
/// empty cells first, and out-of-range indices are skipped. On return every
/// row has at least header width. The number of updates applied is returned.
///
/// # Errors
///
/// Fails when the grid has no header row to anchor the column in.
pub fn apply_updates(
    rows: &mut Vec<Vec<String>>,
    column: &str,
    updates: &[(usize, String)],
) -> Result<usize> {
    if rows.is_empty() {
        return Err(Error::Internal("cannot update an empty table".to_string()));
    }

    let wanted = column.trim().to_lowercase();
    let column_idx = match rows[0]
        .iter()
        .position(|h| h.trim().to_lowercase() == wanted)
    {
        Some(idx) => idx,
        None => {
            rows[0].push(column.to_string());
            rows[0].len() - 1
        }
    };
    let width = rows[0].len();

    let mut applied = 0;
    for (row_index, value) in updates {
        let row_pos = row_index + 1;
        if row_pos >= rows.len() {
            continue;
        }
        let row = &mut rows[row_pos];
        if row.len() < width {
            row.resize(width, String::new());
        }
        row[column_idx] = value.clone();
        applied += 1;
    }

    // Uniform width on the way out
    for row in rows.iter_mut().skip(1) {
        if row.len() < width {
            row.resize(width, String::new());
        }
    }

    Ok(applied)
}

/// [`apply_updates`] against the comment column.
pub fn apply_comment_updates(
    rows: &mut Vec<Vec<String>>,
    updates: &[(usize, String)],
) -> Result<usize> {
    apply_updates(rows, COMMENTS_COLUMN, updates)
}

/// [`apply_updates`] against the importance column.
pub fn apply_importance_updates(
    rows: &mut Vec<Vec<String>>,
    updates: &[(usize, String)],
) -> Result<usize> {
    apply_updates(rows, IMPORTANCE_COLUMN, updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{parse_rows, write_rows};

    fn grid(text: &str) -> Vec<Vec<String>> {
        parse_rows(text)
    }

    #[test]
    fn test_update_existing_column() {
        let mut rows = grid("start,summary,Comments\n1,first,\n2,second,old\n");
        let applied =
            apply_comment_updates(&mut rows, &[(1, "revised".to_string())]).unwrap();
        assert_eq!(applied, 1);
        assert_eq!(rows[2][2], "revised");
        assert_eq!(rows[1][2], "");
    }

    #[test]
    fn test_column_header_match_is_case_insensitive() {
        let mut rows = grid("start,comments\n1,old\n");
        apply_comment_updates(&mut rows, &[(0, "new".to_string())]).unwrap();
        assert_eq!(rows[0], vec!["start".to_string(), "comments".to_string()]);
        assert_eq!(rows[1][1], "new");
    }

    #[test]
    fn test_missing_column_is_appended_and_rows_padded() {
        let mut rows = grid("start,summary\n1,first\n2,second\n");
        let applied = apply_comment_updates(&mut rows, &[(0, "note".to_string())]).unwrap();
        assert_eq!(applied, 1);
        assert_eq!(rows[0], vec!["start", "summary", "Comments"]);
        assert_eq!(rows[1], vec!["1", "first", "note"]);
        // Untouched row still padded to header width
        assert_eq!(rows[2], vec!["2", "second", ""]);
    }

    #[test]
    fn test_out_of_range_index_is_skipped() {
        let mut rows = grid("start,Comments\n1,\n");
        let applied = apply_comment_updates(&mut rows, &[(5, "nope".to_string())]).unwrap();
        assert_eq!(applied, 0);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let mut rows: Vec<Vec<String>> = Vec::new();
        assert!(apply_comment_updates(&mut rows, &[(0, "x".to_string())]).is_err());
    }

    #[test]
    fn test_other_cells_survive_round_trip() {
        let source = "start,summary,Comments\n1,\"said \"\"stop\"\"\",\n2,plain,\n";
        let mut rows = grid(source);
        apply_comment_updates(&mut rows, &[(1, "ok".to_string())]).unwrap();
        let rewritten = write_rows(&rows);
        let back = parse_rows(&rewritten);
        assert_eq!(back[1][1], "said \"stop\"");
        assert_eq!(back[2][2], "ok");
    }

    #[test]
    fn test_importance_column() {
        let mut rows = grid("start,summary\n1,first\n");
        apply_importance_updates(&mut rows, &[(0, "3".to_string())]).unwrap();
        assert_eq!(rows[0][2], IMPORTANCE_COLUMN);
        assert_eq!(rows[1][2], "3");
    }

    #[test]
    fn test_store_keeps_latest_and_drains_sorted() {
        let mut store = CommentStore::new();
        assert!(store.is_empty());
        store.stage(3, "c");
        store.stage(1, "a");
        store.stage(3, "c2");
        assert_eq!(store.len(), 2);
        let updates = store.drain();
        assert_eq!(
            updates,
            vec![(1, "a".to_string()), (3, "c2".to_string())]
        );
        assert!(store.is_empty());
    }
}
