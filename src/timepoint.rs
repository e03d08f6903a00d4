// =============================================================================
// Time keys
// =============================================================================
//
// Every series is indexed by a `TimePoint`: a calendar day for daily bars or
// a minute timestamp for intraday data. The key is totally ordered and is the
// join key for cross-series alignment.
//
// Calendar parsing is an injected strategy (`TimeParser`) rather than a fixed
// format string, so upstream feeds with different date renderings only need a
// different parser, not a different engine.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Ordered time key for a series row.
///
/// A single series is homogeneous: all `Day` or all `Minute`. Mixing
/// granularities in one series is an upstream defect, not something the
/// engine needs to order across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimePoint {
    Day(NaiveDate),
    Minute(NaiveDateTime),
}

impl TimePoint {
    /// Canonical day-level rendering (`YYYY-MM-DD`) used in output records.
    pub fn day_string(&self) -> String {
        match self {
            Self::Day(d) => d.format("%Y-%m-%d").to_string(),
            Self::Minute(dt) => dt.format("%Y-%m-%d").to_string(),
        }
    }

    /// Full rendering: day-level for daily keys, minute-level for intraday.
    pub fn render(&self) -> String {
        match self {
            Self::Day(d) => d.format("%Y-%m-%d").to_string(),
            Self::Minute(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    /// Hour bucket for intraday aggregation.
    ///
    /// The 15:00 closing-auction print is folded into the 14:00 bucket so the
    /// final session hour carries the auction volume, matching exchange
    /// convention. Daily keys have no hour bucket.
    pub fn hour_bucket(&self) -> Option<u32> {
        match self {
            Self::Day(_) => None,
            Self::Minute(dt) => {
                let hour = dt.hour();
                Some(if hour == 15 { 14 } else { hour })
            }
        }
    }
}

impl std::fmt::Display for TimePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

// ---------------------------------------------------------------------------
// Parsing strategies
// ---------------------------------------------------------------------------

/// Injected timestamp-parsing strategy.
///
/// Returns `None` for an unparsable timestamp; the series normalizer drops
/// such rows (a row without a key cannot be ordered or joined).
pub trait TimeParser {
    fn parse(&self, raw: &str) -> Option<TimePoint>;
}

/// Daily keys: `YYYY-MM-DD` or compact `YYYYMMDD`.
pub struct DayParser;

impl TimeParser for DayParser {
    fn parse(&self, raw: &str) -> Option<TimePoint> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y%m%d"))
            .ok()
            .map(TimePoint::Day)
    }
}

/// Intraday minute keys: `YYYY-MM-DD HH:MM` with an optional seconds field.
pub struct MinuteParser;

impl TimeParser for MinuteParser {
    fn parse(&self, raw: &str) -> Option<TimePoint> {
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
            .ok()
            .map(TimePoint::Minute)
    }
}
