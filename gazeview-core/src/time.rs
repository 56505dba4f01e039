//! Clock-time parsing and display formatting
//!
//! Annotation sources write times in several shapes: subtitle-style
//! `HH:MM:SS,mmm` (comma or dot fractional separator), `MM:SS`, or bare
//! decimal seconds. [`parse_clock`] accepts all of them and never fails —
//! unparsable input yields `None`, which downstream normalizers treat as
//! "this row has no usable time".

/// Parse a subtitle-style timestamp: `HH:MM:SS` with an optional `.fff` or
/// `,fff` fractional part (1–3 digits).
///
/// Returns `None` when the string does not match the pattern.
///
/// # Examples
///
/// ```
/// use gazeview_core::time::parse_timestamp;
///
/// assert_eq!(parse_timestamp("00:01:02,500"), Some(62.5));
/// assert_eq!(parse_timestamp("00:01:02.500"), Some(62.5));
/// assert_eq!(parse_timestamp("1:00:00"), Some(3600.0));
/// assert_eq!(parse_timestamp("garbage"), None);
/// ```
pub fn parse_timestamp(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', ".");

    let (hms, frac) = match cleaned.split_once('.') {
        Some((left, right)) => (left, Some(right)),
        None => (cleaned.as_str(), None),
    };

    let parts: Vec<&str> = hms.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    if parts[0].is_empty() || parts[0].len() > 2 || parts[1].len() != 2 || parts[2].len() != 2 {
        return None;
    }

    let hours: f64 = parse_digits(parts[0])?;
    let minutes: f64 = parse_digits(parts[1])?;
    let seconds: f64 = parse_digits(parts[2])?;

    let millis = match frac {
        Some(f) if !f.is_empty() && f.len() <= 3 => {
            let value: f64 = parse_digits(f)?;
            // Scale by digit count: "5" is 500 ms, "50" is 500 ms, "500" is 500 ms
            value * 10f64.powi(3 - f.len() as i32)
        }
        Some(_) => return None,
        None => 0.0,
    };

    Some(hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0)
}

/// Parse any accepted time representation into seconds.
///
/// Forms are tried in order: bare decimal seconds, `MM:SS[.fff]`,
/// `HH:MM:SS[.,fff]`. The first matching form wins; anything else is `None`.
///
/// # Examples
///
/// ```
/// use gazeview_core::time::parse_clock;
///
/// assert_eq!(parse_clock("62.5"), Some(62.5));
/// assert_eq!(parse_clock("01:30"), Some(90.0));
/// assert_eq!(parse_clock("00:01:02,500"), Some(62.5));
/// assert_eq!(parse_clock(""), None);
/// assert_eq!(parse_clock("n/a"), None);
/// ```
pub fn parse_clock(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Bare decimal seconds: digits with an optional single fractional part,
    // both sides of the dot non-empty
    let is_bare_decimal = match trimmed.split_once('.') {
        None => trimmed.chars().all(|c| c.is_ascii_digit()),
        Some((int, frac)) => {
            !int.is_empty()
                && !frac.is_empty()
                && int.chars().all(|c| c.is_ascii_digit())
                && frac.chars().all(|c| c.is_ascii_digit())
        }
    };
    if is_bare_decimal {
        return trimmed.parse::<f64>().ok();
    }

    let cleaned = trimmed.replace(',', ".");
    let parts: Vec<&str> = cleaned.split(':').collect();
    match parts.len() {
        2 => {
            let minutes: f64 = parts[0].trim().parse().ok()?;
            let seconds: f64 = parts[1].trim().parse().ok()?;
            Some(minutes * 60.0 + seconds)
        }
        3 => {
            // Whole-second HH:MM:SS first; fall back to the subtitle form
            // so fractional parts still land here.
            let colon_whole = (|| {
                let hours: f64 = parts[0].trim().parse::<u32>().ok()? as f64;
                let minutes: f64 = parts[1].trim().parse::<u32>().ok()? as f64;
                let seconds: f64 = parts[2].trim().parse::<u32>().ok()? as f64;
                Some(hours * 3600.0 + minutes * 60.0 + seconds)
            })();
            colon_whole.or_else(|| parse_timestamp(trimmed))
        }
        _ => None,
    }
}

/// Format seconds for display: `MM:SS`, or `HH:MM:SS` at one hour and up.
///
/// Negative and non-finite inputs clamp to zero.
///
/// # Examples
///
/// ```
/// use gazeview_core::time::format_clock;
///
/// assert_eq!(format_clock(62.5), "01:02");
/// assert_eq!(format_clock(3661.0), "01:01:01");
/// assert_eq!(format_clock(-3.0), "00:00");
/// ```
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Parse a run of ASCII digits as f64, rejecting signs and whitespace.
fn parse_digits(s: &str) -> Option<f64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
