//! Stamp dates and the clock abstraction.
//!
//! Stamps carry a UTC date with a two-digit year. Minting always writes the
//! 12-digit `yyMMddHHmmss` form; parsing also accepts the older 10-digit
//! `yyMMddHHmm` form. Two-digit years map to 2000..=2099.

use chrono::{DateTime, NaiveDate, Utc};

/// One accepted textual date layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateFormat {
    /// `yyMMddHHmmss`
    Seconds,
    /// `yyMMddHHmm`
    Minutes,
}

/// Formats tried by the parser, in order. The first one that parses wins.
pub const DATE_FORMATS: [DateFormat; 2] = [DateFormat::Seconds, DateFormat::Minutes];

impl DateFormat {
    /// Number of digits in this layout.
    pub fn width(self) -> usize {
        match self {
            DateFormat::Seconds => 12,
            DateFormat::Minutes => 10,
        }
    }

    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::Seconds => "yyMMddHHmmss",
            DateFormat::Minutes => "yyMMddHHmm",
        }
    }

    /// Parse `s` in this layout, `None` if it does not match exactly.
    pub fn parse(self, s: &str) -> Option<DateTime<Utc>> {
        if s.len() != self.width() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let pair = |i: usize| s[i..i + 2].parse::<u32>().ok();

        let year = 2000 + pair(0)? as i32;
        let date = clamped_date(year, pair(2)?, pair(4)?)?;
        let second = match self {
            DateFormat::Seconds => pair(10)?,
            DateFormat::Minutes => 0,
        };
        let (hour, minute) = (pair(6)?, pair(8)?);
        if hour == 24 {
            // 24:00 is midnight at the end of the day.
            if minute != 0 || second != 0 {
                return None;
            }
            return Some(date.succ_opt()?.and_hms_opt(0, 0, 0)?.and_utc());
        }
        let naive = date.and_hms_opt(hour, minute, second)?;
        Some(naive.and_utc())
    }
}

/// A day past the end of its month (`0230`, `0431`) resolves to the month's
/// last day. Days outside 1..=31 and months outside 1..=12 are refused.
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    (1..=day).rev().find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
}

/// Parse a stamp date, trying each of [`DATE_FORMATS`] in turn.
pub fn parse_stamp_date(s: &str) -> Option<DateTime<Utc>> {
    DATE_FORMATS.iter().find_map(|format| format.parse(s))
}

/// Render a date in the primary (12-digit) stamp layout.
pub fn format_stamp_date(at: &DateTime<Utc>) -> String {
    at.format("%y%m%d%H%M%S").to_string()
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
