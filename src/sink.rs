//! Destinations for completed chunks.
//!
//! A [`FlushSink`] receives each completed [`Chunk`] by value and reports
//! what it did with it in a [`FlushReport`]. Flushes run concurrently and in
//! no particular order, so implementations must be [`Sync`] and must not
//! rely on being called in input order.
//!
//! | Sink | Use |
//! |------|-----|
//! | [`FileSink`] | Writes `<output_dir>/<name>` files (or only reports them in dry-run mode) |
//! | [`MemorySink`] | Keeps chunks in memory; for library callers and tests |

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::chunker::Chunk;
use crate::date::DateKey;

/// Outcome of flushing one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushReport {
    /// Where the chunk went (a file path for [`FileSink`]).
    pub target: String,

    /// Date group of the chunk.
    pub date_key: DateKey,

    /// Sub-chunk index, if the date was split.
    pub index: Option<usize>,

    /// Number of lines in the chunk.
    pub lines: usize,

    /// Persistence failure, if any. The lines still count as processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FlushReport {
    /// Creates a successful report for a chunk.
    pub fn new(target: impl Into<String>, chunk: &Chunk) -> Self {
        Self {
            target: target.into(),
            date_key: chunk.date_key.clone(),
            index: chunk.index,
            lines: chunk.len(),
            error: None,
        }
    }

    /// Attaches a failure message.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Returns `true` if the chunk was handled without error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Receives completed chunks.
pub trait FlushSink: Send + Sync {
    /// Persists (or otherwise consumes) one chunk.
    ///
    /// Failures are reported through [`FlushReport::error`], never by
    /// panicking, so that one bad chunk cannot affect the others.
    fn flush(&self, chunk: Chunk) -> FlushReport;
}

/// Writes each chunk to its own file under an output directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    output_dir: PathBuf,
    dry_run: bool,
}

impl FileSink {
    /// Creates a sink writing into `output_dir`.
    ///
    /// The directory must already exist.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            dry_run: false,
        }
    }

    /// In dry-run mode nothing is written, but reports are still produced.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the path a chunk is written to.
    pub fn path_for(&self, chunk: &Chunk) -> PathBuf {
        self.output_dir.join(chunk.file_name())
    }

    fn write_chunk(path: &Path, chunk: &Chunk) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(1024 * 1024, file); // 1MB buffer
        for line in &chunk.lines {
            writer.write_all(line)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}

impl FlushSink for FileSink {
    fn flush(&self, chunk: Chunk) -> FlushReport {
        let path = self.path_for(&chunk);
        let report = FlushReport::new(path.display().to_string(), &chunk);
        if self.dry_run {
            return report;
        }

        match Self::write_chunk(&path, &chunk) {
            Ok(()) => report,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to write chunk");
                report.with_error(err.to_string())
            }
        }
    }
}

/// Collects chunks in memory.
///
/// ```
/// use chainsaw::sink::{FlushSink, MemorySink};
/// use chainsaw::chunker::Chunk;
/// use chainsaw::date::DateKey;
///
/// let sink = MemorySink::new();
/// let report = sink.flush(Chunk {
///     date_key: DateKey::new("2023-09-08"),
///     index: None,
///     lines: vec!["2023-09-08 a".into()],
/// });
/// assert_eq!(report.target, "2023-09-08.log");
/// assert_eq!(sink.into_chunks().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    chunks: Mutex<Vec<Chunk>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected chunks ordered by date and sub-chunk index.
    pub fn into_chunks(self) -> Vec<Chunk> {
        let mut chunks = self
            .chunks
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        chunks.sort_by(|a, b| (&a.date_key, a.index).cmp(&(&b.date_key, b.index)));
        chunks
    }
}

impl FlushSink for MemorySink {
    fn flush(&self, chunk: Chunk) -> FlushReport {
        let report = FlushReport::new(chunk.file_name(), &chunk);
        self.chunks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(chunk);
        report
    }
}
