//! Best-effort date parsing.
//!
//! Sales exports come from spreadsheets, POS systems and BI tools, so the date
//! column shows up in many shapes. We try a fixed list of formats in order and
//! give up (returning `None`) rather than guess further. The loader drops rows
//! whose date does not parse.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Datetime layouts tried before the date-only ones.
const DATETIME_FMTS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts. Slash dates are read month-first, then day-first.
const DATE_FMTS: [&str; 9] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%b %d %Y",
];

/// Parse a raw cell into a naive datetime (midnight for date-only values).
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    None
}
