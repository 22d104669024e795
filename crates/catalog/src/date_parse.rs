// ABOUTME: Flexible date parsing for playlist air dates.
// ABOUTME: Tries RFC 3339, the site's explicit formats, RFC 2822, then a lenient fallback.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Date-and-time formats the playlist endpoint has been seen serving.
const DATETIME_PATTERNS: &[&str] = &[
    "%d-%m-%Y %H:%M",    // 14-07-2025 21:30
    "%Y-%m-%d %H:%M:%S", // 2025-07-14 21:30:00
];

/// Date-only formats, resolved to midnight UTC.
const DATE_PATTERNS: &[&str] = &[
    "%d-%m-%Y", // 14-07-2025
    "%Y-%m-%d", // 2025-07-14
];

/// Parses a date string into a UTC timestamp.
///
/// RFC 3339 is tried first as a fast path, then the explicit site formats,
/// then RFC 2822, and finally dateparser for natural/loose formats.
/// Returns None when every attempt fails.
pub fn parse_flexible_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for pat in DATETIME_PATTERNS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pat) {
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    for pat in DATE_PATTERNS {
        if let Ok(date) = NaiveDate::parse_from_str(s, pat) {
            let dt = date.and_hms_opt(0, 0, 0)?;
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = dateparser::parse(s) {
        return Some(dt.with_timezone(&Utc));
    }

    None
}
