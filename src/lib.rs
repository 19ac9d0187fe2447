//! # Chainsaw
//!
//! Cut a large, date-stamped log file into one file per day.
//!
//! ## Overview
//!
//! Chainsaw reads a log line by line. A line that starts with a date
//! (`2023-09-08 ...`) begins a new entry; any other line (stack traces,
//! wrapped text) belongs to the entry before it. Entries are grouped by
//! date and each group is written to `<date>.log`. Groups larger than the
//! chunk size are split into `<date>.0.log`, `<date>.1.log`, ... without
//! ever separating an entry from its continuation lines.
//!
//! An optional date window drops entries before a start date and stops
//! reading at the first entry after an end date.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chainsaw::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = SplitConfig::new()
//!         .with_not_before_str("2023-09-01")?
//!         .with_output_dir("cut/");
//!
//!     let report = split_file("app.log", config, no_progress())?;
//!     println!("{} lines saved", report.processed);
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Destinations
//!
//! Anything implementing [`FlushSink`](sink::FlushSink) can receive chunks:
//!
//! ```rust
//! use chainsaw::prelude::*;
//!
//! # fn main() -> chainsaw::Result<()> {
//! let sink = MemorySink::new();
//! let report = Splitter::new(SplitConfig::new())?
//!     .run("2023-09-08 a\n2023-09-09 b\n".as_bytes(), &sink)?;
//!
//! assert_eq!(report.flushes.len(), 2);
//! assert_eq!(sink.into_chunks()[1].file_name(), "2023-09-09.log");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - [`date`] - Date prefix detection ([`DateKey`](date::DateKey), [`classify_line`](date::classify_line))
//! - [`filter`] - Date window ([`RangeFilter`](filter::RangeFilter), [`Verdict`](filter::Verdict))
//! - [`classifier`] - Per-line state machine ([`Classifier`](classifier::Classifier))
//! - [`chunker`] - Per-date buffering ([`ChunkBuffer`](chunker::ChunkBuffer), [`Chunk`](chunker::Chunk))
//! - [`sink`] - Flush destinations ([`FlushSink`](sink::FlushSink), [`FileSink`](sink::FileSink))
//! - [`splitter`] - The run itself ([`Splitter`](splitter::Splitter), [`RunReport`](splitter::RunReport))
//! - [`config`] - Run options ([`SplitConfig`](config::SplitConfig))
//! - [`progress`] - Per-flush notifications
//! - [`error`] - Error types ([`ChainsawError`], [`Result`])
//! - [`cli`] - CLI arguments (requires the `cli` feature)

pub mod chunker;
pub mod classifier;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod date;
pub mod error;
pub mod filter;
pub mod progress;
pub mod sink;
pub mod splitter;

// Re-export the main types at the crate root for convenience
pub use error::{ChainsawError, Result};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chainsaw::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ChainsawError, Result};

    pub use crate::config::SplitConfig;
    pub use crate::date::{DateKey, LineKind, classify_line};
    pub use crate::filter::{RangeFilter, Verdict};

    pub use crate::chunker::{Chunk, ChunkBuffer};
    pub use crate::classifier::{Action, Classifier, ClassifierState};

    pub use crate::progress::{FlushCallback, no_progress};
    pub use crate::sink::{FileSink, FlushReport, FlushSink, MemorySink};
    pub use crate::splitter::{RunCounters, RunReport, Splitter, split_file};
}
