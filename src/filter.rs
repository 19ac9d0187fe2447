//! Date range filtering for log entries.
//!
//! This module provides [`RangeFilter`] for deciding whether an entry's date
//! falls inside the requested window, and [`parse_date_bound`] for turning
//! user input into bounds.
//!
//! # Filter Bounds
//!
//! | Bound | Verdict when violated | Effect on the run |
//! |-------|-----------------------|-------------------|
//! | `not_before` | [`Verdict::BeforeStart`] | entry is skipped, scanning continues |
//! | `not_after` | [`Verdict::AfterEnd`] | scanning stops for good |
//!
//! Both bounds are inclusive and compared as 8-digit integers (`20230908`).
//!
//! ```
//! use chainsaw::filter::{RangeFilter, Verdict};
//!
//! let filter = RangeFilter::new()
//!     .with_not_before(20230901)
//!     .with_not_after(20230930);
//!
//! assert_eq!(filter.evaluate(20230901), Verdict::Keep);
//! assert_eq!(filter.evaluate(20230831), Verdict::BeforeStart);
//! assert_eq!(filter.evaluate(20231001), Verdict::AfterEnd);
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date::DateKey;
use crate::error::ChainsawError;

/// Outcome of checking one entry date against the configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Inside both bounds (or bounds unset).
    Keep,
    /// Earlier than `not_before`.
    BeforeStart,
    /// Later than `not_after`.
    AfterEnd,
}

/// Inclusive date window applied to entry lines.
///
/// Unset bounds never reject anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFilter {
    /// Entries dated strictly earlier than this are skipped.
    pub not_before: Option<u32>,

    /// Scanning stops at the first entry dated strictly later than this.
    pub not_after: Option<u32>,
}

impl RangeFilter {
    /// Creates a filter with no bounds; every date is kept.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inclusive lower bound.
    #[must_use]
    pub fn with_not_before(mut self, date: u32) -> Self {
        self.not_before = Some(date);
        self
    }

    /// Sets the inclusive upper bound.
    #[must_use]
    pub fn with_not_after(mut self, date: u32) -> Self {
        self.not_after = Some(date);
        self
    }

    /// Returns `true` if any bound is set.
    pub fn is_active(&self) -> bool {
        self.not_before.is_some() || self.not_after.is_some()
    }

    /// Checks an integer date (`YYYYMMDD`) against the bounds.
    ///
    /// The lower bound is checked first, so a misconfigured window
    /// (`not_before > not_after`) skips rather than stops.
    pub fn evaluate(&self, date: u32) -> Verdict {
        if self.not_before.is_some_and(|bound| date < bound) {
            Verdict::BeforeStart
        } else if self.not_after.is_some_and(|bound| date > bound) {
            Verdict::AfterEnd
        } else {
            Verdict::Keep
        }
    }

    /// Checks an entry's date key against the bounds.
    ///
    /// A key without an integer form cannot be compared and is kept.
    pub fn check(&self, key: &DateKey) -> Verdict {
        if !self.is_active() {
            return Verdict::Keep;
        }
        match key.as_int() {
            Some(date) => self.evaluate(date),
            None => {
                tracing::warn!(key = %key, "date prefix has no numeric form, keeping entry");
                Verdict::Keep
            }
        }
    }
}

/// Parses a date bound given as `YYYYMMDD` or `YYYY-MM-DD`.
///
/// Returns `Ok(None)` for `0`, which means "no bound". Anything else must be a
/// real calendar date.
///
/// # Errors
///
/// Returns [`ChainsawError::InvalidDate`] if the input is not a valid date.
///
/// ```
/// use chainsaw::filter::parse_date_bound;
///
/// assert_eq!(parse_date_bound("20230908").unwrap(), Some(20230908));
/// assert_eq!(parse_date_bound("2023-09-08").unwrap(), Some(20230908));
/// assert_eq!(parse_date_bound("0").unwrap(), None);
/// assert!(parse_date_bound("20230231").is_err());
/// ```
pub fn parse_date_bound(input: &str) -> Result<Option<u32>, ChainsawError> {
    let trimmed = input.trim();
    if trimmed == "0" {
        return Ok(None);
    }

    let format = if trimmed.contains('-') { "%Y-%m-%d" } else { "%Y%m%d" };
    let date = NaiveDate::parse_from_str(trimmed, format)
        .map_err(|_| ChainsawError::invalid_date(input))?;

    // %Y accepts short or signed years; the bound must be a plain 8-digit date.
    if !(1000..=9999).contains(&date.year()) || trimmed.len() != format_width(format) {
        return Err(ChainsawError::invalid_date(input));
    }

    Ok(Some(date_to_int(date)))
}

/// Converts a calendar date to its `YYYYMMDD` integer form.
pub fn date_to_int(date: NaiveDate) -> u32 {
    date.year().unsigned_abs() * 10000 + date.month() * 100 + date.day()
}

fn format_width(format: &str) -> usize {
    if format.contains('-') { 10 } else { 8 }
}
