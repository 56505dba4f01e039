//! Delimited-text table parsing and writing
//!
//! A streaming character-level CSV reader: double-quote delimited fields,
//! `""` as an escaped quote, commas and newlines permitted inside quoted
//! fields, bare `\r` stripped, `\r\n` and `\n` both row terminators. No type
//! coercion happens here; every field comes out as a `String` for the schema
//! layer to interpret.

/// Parse delimited text into rows of string fields.
///
/// A trailing row consisting of a single empty field is dropped, so a file
/// ending in a newline does not grow a phantom row.
///
/// # Examples
///
/// ```
/// use gazeview_core::table::parse_rows;
///
/// let rows = parse_rows("a,\"b,c\"\"d\",e\nf,g,h\n");
/// assert_eq!(rows, vec![
///     vec!["a".to_string(), "b,c\"d".to_string(), "e".to_string()],
///     vec!["f".to_string(), "g".to_string(), "h".to_string()],
/// ]);
/// ```
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(ch),
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' => row.push(std::mem::take(&mut field)),
                '\n' => {
                    row.push(std::mem::take(&mut field));
                    push_row(&mut rows, &mut row);
                }
                '\r' => {}
                _ => field.push(ch),
            }
        }
    }

    // Flush the last field and row
    row.push(field);
    push_row(&mut rows, &mut row);

    rows
}

/// Append a completed row, dropping a lone empty trailing field.
fn push_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>) {
    let finished = std::mem::take(row);
    if finished.len() == 1 && finished[0].trim().is_empty() {
        return;
    }
    rows.push(finished);
}

/// Serialize rows back to delimited text.
///
/// Fields containing a quote, comma, or line break are quoted, with inner
/// quotes doubled. Output rows end in `\n`; round-trips through
/// [`parse_rows`] preserve content.
pub fn write_rows(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        for (i, field) in row.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            if field.contains(['"', ',', '\n', '\r']) {
                out.push('"');
                out.push_str(&field.replace('"', "\"\""));
                out.push('"');
            } else {
                out.push_str(field);
            }
        }
        out.push('\n');
    }
    out
}
