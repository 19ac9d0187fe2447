//! Date prefix detection for log lines.
//!
//! A log entry starts with a calendar date such as `2023-06-16 16:26:45.495  INFO ...`.
//! Lines without that prefix (stack traces, wrapped messages) are continuations
//! of the previous entry.
//!
//! Lines are inspected as raw bytes, since log files are not guaranteed to be
//! valid UTF-8. Only ASCII digits form a date prefix.
//!
//! ```rust
//! use chainsaw::date::{LineKind, classify_line};
//!
//! match classify_line("2023-09-08 12:00:00 INFO started") {
//!     LineKind::Entry(key) => assert_eq!(key.as_str(), "2023-09-08"),
//!     LineKind::Continuation => unreachable!(),
//! }
//! assert_eq!(classify_line("    at com.example.Main"), LineKind::Continuation);
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::bytes::Regex;
use serde::{Deserialize, Serialize};

/// Separator between year, month and day in a date prefix.
pub const DATE_SEPARATOR: char = '-';

// Only the date part is needed; time of day is not part of the key.
static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("date prefix pattern is valid")
    });

/// The date portion of an entry line, e.g. `2023-09-08`.
///
/// Used as the output group identifier (keeping its separators, so it can be
/// used verbatim in file names) and, through [`DateKey::as_int`], for range
/// comparisons.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Wraps an already extracted date string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key exactly as it appeared in the log.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the key to its 8-digit integer form (`2023-09-08` -> `20230908`).
    ///
    /// Returns `None` for a key that is not eight ASCII digits plus
    /// separators. [`match_entry`] never produces such a key, but
    /// [`DateKey::new`] accepts any string.
    pub fn as_int(&self) -> Option<u32> {
        let digits: String = self.0.chars().filter(|c| *c != DATE_SEPARATOR).collect();
        if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a single line relates to log entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// The line starts a new entry dated with the given key.
    Entry(DateKey),
    /// The line belongs to the entry before it.
    Continuation,
}

impl LineKind {
    /// Returns `true` for [`LineKind::Entry`].
    pub fn is_entry(&self) -> bool {
        matches!(self, LineKind::Entry(_))
    }
}

/// Extracts the date key if the line starts with a date prefix.
pub fn match_entry(line: impl AsRef<[u8]>) -> Option<DateKey> {
    let m = DATE_PREFIX.find(line.as_ref())?;
    // The pattern matches ASCII only, so the prefix is always valid UTF-8.
    std::str::from_utf8(m.as_bytes()).ok().map(DateKey::new)
}

/// Classifies a line as an entry or a continuation.
pub fn classify_line(line: impl AsRef<[u8]>) -> LineKind {
    match match_entry(line) {
        Some(key) => LineKind::Entry(key),
        None => LineKind::Continuation,
    }
}
