//! Date-only ranges used by analytics filters and exports.

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::DateRangeError;

/// Days covered by an export when the caller gives no range.
pub const DEFAULT_EXPORT_LOOKBACK_DAYS: i64 = 14;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar dates.
///
/// Serializes as `{"from": "YYYY-MM-DD", "to": "YYYY-MM-DD"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Start date (inclusive).
    pub from: NaiveDate,
    /// End date (inclusive).
    pub to: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that from <= to.
    ///
    /// # Errors
    ///
    /// Returns an error if from > to.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DateRangeError> {
        if from > to {
            return Err(DateRangeError::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Creates the range ending on `end` and starting `days` before it.
    #[must_use]
    pub fn trailing_days(end: NaiveDate, days: i64) -> Self {
        Self {
            from: end - TimeDelta::days(days),
            to: end,
        }
    }

    /// The default export window: the last [`DEFAULT_EXPORT_LOOKBACK_DAYS`] days up to `today`.
    #[must_use]
    pub fn default_export(today: NaiveDate) -> Self {
        Self::trailing_days(today, DEFAULT_EXPORT_LOOKBACK_DAYS)
    }

    /// Builds a range from optional caller input.
    ///
    /// Each side is truncated to its date portion. Blank input counts as absent.
    /// Returns `Ok(None)` when both sides are absent.
    ///
    /// # Errors
    ///
    /// Returns an error if only one side is present, a side is not a date, or
    /// from is after to.
    pub fn from_inputs(
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Option<Self>, DateRangeError> {
        match (from.and_then(date_only), to.and_then(date_only)) {
            (None, None) => Ok(None),
            (Some(from), Some(to)) => Self::new(parse_date(from)?, parse_date(to)?).map(Some),
            _ => Err(DateRangeError::Incomplete),
        }
    }

    /// Returns the range as bracketed query pairs (`dateRange[from]`, `dateRange[to]`).
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("dateRange[from]", self.from.format(DATE_FORMAT).to_string()),
            ("dateRange[to]", self.to.format(DATE_FORMAT).to_string()),
        ]
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}

/// Returns the date portion of an ISO-like timestamp, or `None` if blank.
///
/// `"2024-01-10T08:30:00Z"` and `"2024-01-10 08:30:00"` both become `"2024-01-10"`.
#[must_use]
pub fn date_only(value: &str) -> Option<&str> {
    let date = value
        .trim()
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()?;
    (!date.is_empty()).then_some(date)
}

fn parse_date(value: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DateRangeError::Unparseable {
        value: value.to_string(),
    })
}
