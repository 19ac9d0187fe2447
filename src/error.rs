//! Unified error types for chainsaw.
//!
//! This module provides a single [`ChainsawError`] enum that covers every
//! failure the library reports to its caller.
//!
//! # Error Handling Philosophy
//!
//! - Only failures that make the whole run meaningless are errors: the input
//!   cannot be opened or read, or the configuration is invalid.
//! - Problems local to one output chunk (e.g. a file that cannot be created)
//!   are recorded on that chunk's [`FlushReport`](crate::sink::FlushReport)
//!   and never abort the run.
//! - Lines that look odd (no date prefix, unparseable date) are classified
//!   with best-effort defaults and never produce an error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chainsaw operations.
///
/// # Example
///
/// ```rust
/// use chainsaw::error::Result;
/// use chainsaw::config::SplitConfig;
///
/// fn build() -> Result<SplitConfig> {
///     SplitConfig::new().with_chunk_size(1000)
/// }
/// # build().unwrap();
/// ```
pub type Result<T> = std::result::Result<T, ChainsawError>;

/// The error type for all chainsaw operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChainsawError {
    /// An I/O error occurred while reading the input stream.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input log file could not be opened.
    ///
    /// This is fatal: nothing has been processed yet.
    #[error("Cannot open log file {}: {source}", path.display())]
    OpenInput {
        /// The file that was requested
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The output directory could not be created.
    #[error("Cannot create output directory {}: {source}", path.display())]
    CreateOutputDir {
        /// The directory that was requested
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Invalid date bound in the filter configuration.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// Chunk size must allow at least one line per chunk.
    #[error("Invalid chunk size {0}: must be a positive number of lines")]
    InvalidChunkSize(usize),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChainsawError {
    /// Creates an error for an input file that cannot be opened.
    pub fn open_input(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ChainsawError::OpenInput {
            path: path.into(),
            source,
        }
    }

    /// Creates an error for an output directory that cannot be created.
    pub fn create_output_dir(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ChainsawError::CreateOutputDir {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChainsawError::InvalidDate {
            input: input.into(),
            expected: "YYYYMMDD or YYYY-MM-DD",
        }
    }

    /// Returns `true` if this is an IO error (including open failures).
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ChainsawError::Io(_)
                | ChainsawError::OpenInput { .. }
                | ChainsawError::CreateOutputDir { .. }
        )
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ChainsawError::InvalidDate { .. } | ChainsawError::InvalidChunkSize(_)
        )
    }
}
