use chrono::NaiveDate;

use crate::text::fold_accents;

// ── Date-shaped tokens ───────────────────────────────────────────────────────

re!(re_date_iso,
    r"\b(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:\b|T)");
re!(re_date_numeric,
    r"\b(\d{1,2})[-/. ](\d{1,2})[-/. ](\d{2,4})\b");
re!(re_date_day_month_name,
    r"(?i)\b(\d{1,2})(?:er|st|nd|rd|th)?\s+(\p{L}{3,10})\.?,?\s+(\d{4})\b");
re!(re_date_month_name_day,
    r"(?i)\b(\p{L}{3,10})\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b");

/// Parse the first date found in `text`.
///
/// Numeric dates are read day-first (`01/02/2024` is 1 February); month-first
/// is only tried when day-first is not a valid calendar date. Month names are
/// accepted in English and French, full or abbreviated. Returns `None` when
/// nothing date-shaped parses.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    [
        try_date_iso(text),
        try_date_numeric(text),
        try_date_day_month_name(text),
        try_date_month_name_day(text),
    ]
    .into_iter()
    .flatten()
    .min_by_key(|(start, _)| *start)
    .map(|(_, date)| date)
}

fn try_date_iso(text: &str) -> Option<(usize, NaiveDate)> {
    re_date_iso().captures_iter(text).find_map(|c| {
        let y: i32 = c.get(1)?.as_str().parse().ok()?;
        let m: u32 = c.get(2)?.as_str().parse().ok()?;
        let d: u32 = c.get(3)?.as_str().parse().ok()?;
        Some((c.get(0)?.start(), NaiveDate::from_ymd_opt(y, m, d)?))
    })
}

fn try_date_numeric(text: &str) -> Option<(usize, NaiveDate)> {
    re_date_numeric().captures_iter(text).find_map(|c| {
        let p1: u32 = c.get(1)?.as_str().parse().ok()?;
        let p2: u32 = c.get(2)?.as_str().parse().ok()?;
        let year = expand_year(c.get(3)?.as_str().parse().ok()?);
        let date = NaiveDate::from_ymd_opt(year, p2, p1)
            .or_else(|| NaiveDate::from_ymd_opt(year, p1, p2))?;
        Some((c.get(0)?.start(), date))
    })
}

fn try_date_day_month_name(text: &str) -> Option<(usize, NaiveDate)> {
    re_date_day_month_name().captures_iter(text).find_map(|c| {
        let day: u32 = c.get(1)?.as_str().parse().ok()?;
        let month = month_from_name(c.get(2)?.as_str())?;
        let year: i32 = c.get(3)?.as_str().parse().ok()?;
        Some((c.get(0)?.start(), NaiveDate::from_ymd_opt(year, month, day)?))
    })
}

fn try_date_month_name_day(text: &str) -> Option<(usize, NaiveDate)> {
    re_date_month_name_day().captures_iter(text).find_map(|c| {
        let month = month_from_name(c.get(1)?.as_str())?;
        let day: u32 = c.get(2)?.as_str().parse().ok()?;
        let year: i32 = c.get(3)?.as_str().parse().ok()?;
        Some((c.get(0)?.start(), NaiveDate::from_ymd_opt(year, month, day)?))
    })
}

fn expand_year(y: i32) -> i32 {
    if y < 100 { 2000 + y } else { y }
}

// ── Month names ──────────────────────────────────────────────────────────────

const MONTH_NAMES: &[(&str, u32)] = &[
    ("january", 1), ("janvier", 1),
    ("february", 2), ("fevrier", 2),
    ("march", 3), ("mars", 3),
    ("april", 4), ("avril", 4),
    ("may", 5), ("mai", 5),
    ("june", 6), ("juin", 6),
    ("july", 7), ("juillet", 7),
    ("august", 8), ("aout", 8),
    ("september", 9), ("septembre", 9),
    ("october", 10), ("octobre", 10),
    ("november", 11), ("novembre", 11),
    ("december", 12), ("decembre", 12),
];

/// Resolve a full or abbreviated (3+ letters) month name.
fn month_from_name(name: &str) -> Option<u32> {
    let folded = fold_accents(name);
    let token = folded.trim_end_matches('.');
    if token.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .find(|(full, _)| *full == token || full.starts_with(token))
        .map(|(_, n)| *n)
}
