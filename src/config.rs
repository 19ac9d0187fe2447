//! Configuration for a split run.
//!
//! [`SplitConfig`] holds everything the core needs, with no CLI framework
//! dependency, so library users can build it directly.
//!
//! # Example
//!
//! ```rust
//! use chainsaw::config::SplitConfig;
//!
//! # fn main() -> chainsaw::Result<()> {
//! let config = SplitConfig::new()
//!     .with_not_before_str("2023-09-01")?
//!     .with_not_after_str("20230930")?
//!     .with_chunk_size(20_000)?
//!     .with_output_dir("cut/september")
//!     .with_dry_run(true);
//!
//! assert_eq!(config.range_filter().not_before, Some(20230901));
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::chunker::DEFAULT_CHUNK_SIZE;
use crate::error::ChainsawError;
use crate::filter::{RangeFilter, parse_date_bound};

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "cut/";

/// Options for splitting one log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Skip entries dated before this `YYYYMMDD` date (inclusive bound).
    pub not_before: Option<u32>,

    /// Stop at the first entry dated after this `YYYYMMDD` date (inclusive bound).
    pub not_after: Option<u32>,

    /// Lines a buffer may hold before the next same-date entry starts a
    /// new sub-chunk (default: 50000).
    pub chunk_size: usize,

    /// Report chunks without writing any file (default: false).
    pub dry_run: bool,

    /// Directory output files are written to (default: `cut/`).
    pub output_dir: PathBuf,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            not_before: None,
            not_after: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            dry_run: false,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl SplitConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lower date bound as a `YYYYMMDD` integer.
    #[must_use]
    pub fn with_not_before(mut self, date: u32) -> Self {
        self.not_before = Some(date);
        self
    }

    /// Sets the upper date bound as a `YYYYMMDD` integer.
    #[must_use]
    pub fn with_not_after(mut self, date: u32) -> Self {
        self.not_after = Some(date);
        self
    }

    /// Parses and sets the lower date bound (`YYYYMMDD` or `YYYY-MM-DD`, `0` clears it).
    pub fn with_not_before_str(mut self, input: &str) -> Result<Self, ChainsawError> {
        self.not_before = parse_date_bound(input)?;
        Ok(self)
    }

    /// Parses and sets the upper date bound (`YYYYMMDD` or `YYYY-MM-DD`, `0` clears it).
    pub fn with_not_after_str(mut self, input: &str) -> Result<Self, ChainsawError> {
        self.not_after = parse_date_bound(input)?;
        Ok(self)
    }

    /// Sets the chunk size.
    ///
    /// # Errors
    ///
    /// Returns [`ChainsawError::InvalidChunkSize`] for zero.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self, ChainsawError> {
        self.chunk_size = chunk_size;
        self.validate()?;
        Ok(self)
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Returns the date window described by this configuration.
    pub fn range_filter(&self) -> RangeFilter {
        RangeFilter {
            not_before: self.not_before,
            not_after: self.not_after,
        }
    }

    /// Checks values that the type system cannot.
    pub fn validate(&self) -> Result<(), ChainsawError> {
        if self.chunk_size == 0 {
            return Err(ChainsawError::InvalidChunkSize(self.chunk_size));
        }
        Ok(())
    }
}
