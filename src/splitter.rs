//! The single-pass split run.
//!
//! [`Splitter::run`] reads lines in order on the calling thread, classifies
//! each one, buffers the retained ones and dispatches every completed
//! [`Chunk`] to a [`FlushSink`] as an independent task on the rayon pool.
//! The run returns only after every dispatched flush has finished, so the
//! [`RunReport`] always lists every chunk.
//!
//! ```
//! use chainsaw::config::SplitConfig;
//! use chainsaw::sink::MemorySink;
//! use chainsaw::splitter::Splitter;
//!
//! # fn main() -> chainsaw::Result<()> {
//! let input = "garbage\n2023-09-08 a\nx continuation\n2023-09-09 b\n";
//! let sink = MemorySink::new();
//! let report = Splitter::new(SplitConfig::new())?.run(input.as_bytes(), &sink)?;
//!
//! assert_eq!(report.dropped, 1);
//! assert_eq!(report.processed, 3);
//! assert_eq!(report.flushes.len(), 2);
//! # Ok(())
//! # }
//! ```

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::chunker::{Chunk, ChunkBuffer};
use crate::classifier::{Action, Classifier};
use crate::config::SplitConfig;
use crate::error::{ChainsawError, Result};
use crate::progress::{FlushCallback, no_progress};
use crate::sink::{FileSink, FlushReport, FlushSink};

/// Line counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    /// Lines read and classified.
    pub total: usize,
    /// Lines before the first entry.
    pub dropped: usize,
    /// Lines outside the date window.
    pub passed: usize,
    /// Lines retained and flushed.
    pub processed: usize,
}

impl RunCounters {
    /// Accounts for one classified line.
    ///
    /// [`Action::Stop`] is not counted: the stopping line and everything
    /// after it are outside the run.
    pub fn record(&mut self, action: &Action) {
        match action {
            Action::Stop => return,
            Action::Drop => self.dropped += 1,
            Action::Pass => self.passed += 1,
            Action::Append | Action::Retain(_) => self.processed += 1,
        }
        self.total += 1;
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Lines before the first entry.
    pub dropped: usize,

    /// Lines retained and flushed, including those whose file failed to write.
    pub processed: usize,

    /// Lines outside the date window; `None` when the run stopped early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<usize>,

    /// Lines in the input; `None` when the run stopped early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,

    /// Reading stopped at an entry later than the upper bound.
    pub stopped_early: bool,

    /// Date groups that started again after being closed (unsorted input).
    pub reopened_groups: usize,

    /// One report per flushed chunk, ordered by date and sub-chunk index.
    pub flushes: Vec<FlushReport>,
}

impl RunReport {
    /// Builds the report from the final counters.
    ///
    /// Total and passed counts are not meaningful once the input was cut
    /// short, so they are left out in that case.
    pub fn new(counters: RunCounters, stopped_early: bool) -> Self {
        let (total, passed) = if stopped_early {
            (None, None)
        } else {
            (Some(counters.total), Some(counters.passed))
        };
        Self {
            dropped: counters.dropped,
            processed: counters.processed,
            passed,
            total,
            stopped_early,
            reopened_groups: 0,
            flushes: Vec::new(),
        }
    }

    /// Number of chunks handled without error.
    pub fn files_written(&self) -> usize {
        self.flushes.iter().filter(|f| f.is_ok()).count()
    }

    /// Flushes that reported an error.
    pub fn failed_flushes(&self) -> impl Iterator<Item = &FlushReport> {
        self.flushes.iter().filter(|f| !f.is_ok())
    }
}

/// Runs the classify/buffer/flush pass.
pub struct Splitter {
    config: SplitConfig,
    on_flush: FlushCallback,
}

impl Splitter {
    /// Creates a splitter for a validated configuration.
    pub fn new(config: SplitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            on_flush: no_progress(),
        })
    }

    /// Registers a callback invoked as each flush completes.
    #[must_use]
    pub fn with_progress(mut self, on_flush: FlushCallback) -> Self {
        self.on_flush = on_flush;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Splits everything read from `reader` into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`ChainsawError::Io`] if reading fails. Flushes already
    /// dispatched still run to completion before the error is returned.
    pub fn run<R, S>(&self, reader: R, sink: &S) -> Result<RunReport>
    where
        R: BufRead,
        S: FlushSink,
    {
        let reports = Mutex::new(Vec::new());
        let on_flush = &self.on_flush;

        let scanned = rayon::in_place_scope(|scope| {
            let mut dispatch = |chunk: Chunk| {
                tracing::debug!(file = %chunk.file_name(), lines = chunk.len(), "dispatching flush");
                let reports = &reports;
                scope.spawn(move |_| {
                    let report = sink.flush(chunk);
                    on_flush(&report);
                    reports
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(report);
                });
            };
            self.scan(reader, &mut dispatch)
        });
        let (counters, stopped_early, reopened_groups) = scanned?;

        let mut flushes = reports.into_inner().unwrap_or_else(PoisonError::into_inner);
        flushes.sort_by(|a, b| (&a.date_key, a.index).cmp(&(&b.date_key, b.index)));

        let mut report = RunReport::new(counters, stopped_early);
        report.reopened_groups = reopened_groups;
        report.flushes = flushes;
        tracing::debug!(
            processed = report.processed,
            dropped = report.dropped,
            files = report.flushes.len(),
            stopped_early,
            "run finished"
        );
        Ok(report)
    }

    /// Sequential part of the run: one line at a time, in input order.
    fn scan<R: BufRead>(
        &self,
        mut reader: R,
        dispatch: &mut impl FnMut(Chunk),
    ) -> Result<(RunCounters, bool, usize)> {
        let mut classifier = Classifier::new(self.config.range_filter());
        let mut buffer = ChunkBuffer::new(self.config.chunk_size);
        let mut counters = RunCounters::default();
        let mut raw = Vec::with_capacity(4096);

        loop {
            raw.clear();
            if reader.read_until(b'\n', &mut raw)? == 0 {
                break;
            }
            let line = strip_terminator(&raw);
            let action = classifier.classify(line);
            counters.record(&action);

            match action {
                Action::Stop => break,
                Action::Drop | Action::Pass => {}
                Action::Append => buffer.push_continuation(line.to_vec()),
                Action::Retain(key) => {
                    if let Some(chunk) = buffer.push_entry(key, line.to_vec()) {
                        dispatch(chunk);
                    }
                }
            }
        }

        let reopened = buffer.reopened_groups();
        if let Some(chunk) = buffer.finish() {
            dispatch(chunk);
        }
        Ok((counters, classifier.is_stopped(), reopened))
    }
}

/// Strips the line terminator (`\n` or `\r\n`).
///
/// The rest of the line is left as is, whatever its encoding.
fn strip_terminator(raw: &[u8]) -> &[u8] {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Splits the log file at `path` into files under `config.output_dir`.
///
/// The input is opened first; the output directory is created only when
/// the input is readable and the run is not a dry run.
///
/// # Errors
///
/// - [`ChainsawError::OpenInput`] if the file cannot be opened
/// - [`ChainsawError::CreateOutputDir`] if the output directory cannot be created
/// - [`ChainsawError::Io`] if reading fails mid-way
pub fn split_file(
    path: impl AsRef<Path>,
    config: SplitConfig,
    on_flush: FlushCallback,
) -> Result<RunReport> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ChainsawError::open_input(path, e))?;

    if !config.dry_run {
        fs::create_dir_all(&config.output_dir)
            .map_err(|e| ChainsawError::create_output_dir(&config.output_dir, e))?;
    }

    let sink = FileSink::new(&config.output_dir).with_dry_run(config.dry_run);
    let reader = BufReader::with_capacity(256 * 1024, file);
    Splitter::new(config)?
        .with_progress(on_flush)
        .run(reader, &sink)
}
