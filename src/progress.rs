//! Per-flush progress notifications.
//!
//! Each completed flush produces a [`FlushReport`]. Callers who want to show
//! progress while a run is still going register a [`FlushCallback`]; it is
//! invoked from the flush worker as soon as that flush finishes, so calls
//! arrive in completion order, not input order.
//!
//! # Example
//!
//! ```rust
//! use chainsaw::progress::{FlushCallback, print_saved};
//! use chainsaw::sink::FlushReport;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let lines = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&lines);
//! let callback: FlushCallback = Arc::new(move |report: &FlushReport| {
//!     counter.fetch_add(report.lines, Ordering::Relaxed);
//! });
//!
//! // Plain console output, one line per file:
//! let console: FlushCallback = Arc::new(print_saved);
//! ```

use std::sync::Arc;

use crate::sink::FlushReport;

/// Callback type for receiving flush notifications.
///
/// Must be thread-safe: flushes complete on worker threads.
pub type FlushCallback = Arc<dyn Fn(&FlushReport) + Send + Sync>;

/// Creates a no-op callback.
pub fn no_progress() -> FlushCallback {
    Arc::new(|_: &FlushReport| {})
}

/// Formats the console line for a completed flush.
///
/// ```
/// use chainsaw::progress::saved_line;
/// use chainsaw::sink::FlushReport;
/// use chainsaw::chunker::Chunk;
/// use chainsaw::date::DateKey;
///
/// let chunk = Chunk { date_key: DateKey::new("2023-09-08"), index: None, lines: vec!["x".into()] };
/// let report = FlushReport::new("cut/2023-09-08.log", &chunk);
/// assert_eq!(saved_line(&report), "cut/2023-09-08.log saved (1 lines)");
/// ```
pub fn saved_line(report: &FlushReport) -> String {
    match &report.error {
        None => format!("{} saved ({} lines)", report.target, report.lines),
        Some(err) => format!(
            "{} not saved ({} lines)\n  warning: could not write file: {}",
            report.target, report.lines, err
        ),
    }
}

/// Prints [`saved_line`] to stdout.
pub fn print_saved(report: &FlushReport) {
    println!("{}", saved_line(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::Chunk;
    use crate::date::DateKey;

    fn report() -> FlushReport {
        let chunk = Chunk {
            date_key: DateKey::new("2023-09-08"),
            index: Some(2),
            lines: vec!["a".into(), "b".into()],
        };
        FlushReport::new("out/2023-09-08.2.log", &chunk)
    }

    #[test]
    fn test_saved_line_success() {
        assert_eq!(saved_line(&report()), "out/2023-09-08.2.log saved (2 lines)");
    }

    #[test]
    fn test_saved_line_with_warning() {
        let line = saved_line(&report().with_error("permission denied"));
        assert!(line.starts_with("out/2023-09-08.2.log not saved (2 lines)"));
        assert!(line.contains("warning"));
        assert!(line.contains("permission denied"));
    }

    #[test]
    fn test_no_progress_is_callable() {
        let callback = no_progress();
        callback(&report());
    }
}
