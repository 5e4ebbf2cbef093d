//! Date formatting with the pattern language of the remote API client
//! (`Y-m-d H:i:s` style, a backslash escapes the next character).

use crate::error::{AppError, AppResult};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike,
};
use std::fmt::Write;

/// Pattern used for date filters unless a caller provides one
pub const DEFAULT_DATE_FORMAT: &str = "Y-m-d H:i:s";

/// Anything that can be rendered into a date filter.
/// Naive dates are treated as UTC.
pub trait FilterDate {
    fn to_fixed_offset(&self) -> DateTime<FixedOffset>;
}

impl FilterDate for NaiveDateTime {
    fn to_fixed_offset(&self) -> DateTime<FixedOffset> {
        self.and_utc().fixed_offset()
    }
}

impl<Tz: TimeZone> FilterDate for DateTime<Tz> {
    fn to_fixed_offset(&self) -> DateTime<FixedOffset> {
        self.fixed_offset()
    }
}

/// Format `date` according to `pattern`.
///
/// Supported tokens: `d D j l N S w z W F m M n t L o Y y a A g G h H i s u v
/// e T P p O c r U`. Any other character is copied verbatim.
pub fn format_date<D: FilterDate + ?Sized>(date: &D, pattern: &str) -> String {
    let date = date.to_fixed_offset();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
            continue;
        }

        let _ = match c {
            'd' => write!(out, "{}", date.format("%d")),
            'D' => write!(out, "{}", date.format("%a")),
            'j' => write!(out, "{}", date.day()),
            'l' => write!(out, "{}", date.format("%A")),
            'N' => write!(out, "{}", date.weekday().number_from_monday()),
            'S' => write!(out, "{}", ordinal_suffix(date.day())),
            'w' => write!(out, "{}", date.weekday().num_days_from_sunday()),
            'z' => write!(out, "{}", date.ordinal0()),
            'W' => write!(out, "{:02}", date.iso_week().week()),
            'F' => write!(out, "{}", date.format("%B")),
            'm' => write!(out, "{:02}", date.month()),
            'M' => write!(out, "{}", date.format("%b")),
            'n' => write!(out, "{}", date.month()),
            't' => write!(out, "{}", days_in_month(date.year(), date.month())),
            'L' => write!(out, "{}", u8::from(is_leap_year(date.year()))),
            'o' => write!(out, "{}", date.iso_week().year()),
            'Y' => write!(out, "{}", date.format("%Y")),
            'y' => write!(out, "{}", date.format("%y")),
            'a' => write!(out, "{}", date.format("%P")),
            'A' => write!(out, "{}", date.format("%p")),
            'g' => write!(out, "{}", date.hour12().1),
            'G' => write!(out, "{}", date.hour()),
            'h' => write!(out, "{:02}", date.hour12().1),
            'H' => write!(out, "{:02}", date.hour()),
            'i' => write!(out, "{:02}", date.minute()),
            's' => write!(out, "{:02}", date.second()),
            'u' => write!(out, "{:06}", (date.nanosecond() % 1_000_000_000) / 1_000),
            'v' => write!(out, "{:03}", (date.nanosecond() % 1_000_000_000) / 1_000_000),
            'e' | 'T' => write!(out, "{}", zone_name(&date)),
            'P' => write!(out, "{}", date.format("%:z")),
            'p' => {
                if date.offset().local_minus_utc() == 0 {
                    write!(out, "Z")
                } else {
                    write!(out, "{}", date.format("%:z"))
                }
            }
            'O' => write!(out, "{}", date.format("%z")),
            'c' => write!(out, "{}", date.format("%Y-%m-%dT%H:%M:%S%:z")),
            'r' => write!(out, "{}", date.format("%a, %d %b %Y %H:%M:%S %z")),
            'U' => write!(out, "{}", date.timestamp()),
            other => write!(out, "{}", other),
        };
    }

    out
}

/// Parse a date given on the command line or in configuration.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and a bare
/// `YYYY-MM-DD` (midnight).
pub fn parse_date(input: &str) -> AppResult<DateTime<FixedOffset>> {
    let input = input.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Ok(date);
    }

    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, pattern) {
            return Ok(naive.to_fixed_offset());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.to_fixed_offset())
        .ok_or_else(|| AppError::DateFormat(format!("Unrecognised date: {}", input)))
}

fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

fn zone_name(date: &DateTime<FixedOffset>) -> String {
    if date.offset().local_minus_utc() == 0 {
        "UTC".to_string()
    } else {
        date.format("%:z").to_string()
    }
}
