//! Buffering of retained lines into per-date chunks.
//!
//! [`ChunkBuffer`] collects the lines of the current date group and decides
//! when a buffer is complete:
//!
//! - **Date change**: an entry with a different date closes the current
//!   group. The buffer is marked chunked only if earlier sub-chunks of the
//!   same date were already emitted.
//! - **Size limit**: an entry of the same date arriving while the buffer
//!   holds *more than* `chunk_size` lines closes a sub-chunk. The check runs
//!   before the entry is appended, so a sub-chunk holds at least
//!   `chunk_size + 1` lines, and continuation lines are never split from
//!   their entry.
//!
//! Completed buffers are handed out as owned [`Chunk`]s; the manager keeps
//! no reference to them. Lines are raw bytes and are never re-encoded.
//!
//! ```
//! use chainsaw::chunker::ChunkBuffer;
//! use chainsaw::date::DateKey;
//!
//! let mut buffer = ChunkBuffer::new(50_000);
//! assert!(buffer.push_entry(DateKey::new("2023-09-08"), "2023-09-08 a".into()).is_none());
//! buffer.push_continuation("  at trace".into());
//!
//! let chunk = buffer.push_entry(DateKey::new("2023-09-09"), "2023-09-09 b".into()).unwrap();
//! assert_eq!(chunk.file_name(), "2023-09-08.log");
//! assert_eq!(chunk.len(), 2);
//!
//! let last = buffer.finish().unwrap();
//! assert_eq!(last.file_name(), "2023-09-09.log");
//! ```

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::date::DateKey;

/// Default maximum number of lines per output file before sub-chunking.
pub const DEFAULT_CHUNK_SIZE: usize = 50_000;

/// A completed buffer, ready to be flushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Date group the lines belong to.
    pub date_key: DateKey,

    /// Sub-chunk index, `None` when the date fits in a single file.
    pub index: Option<usize>,

    /// The lines, in input order, as read and without line terminators.
    pub lines: Vec<Vec<u8>>,
}

impl Chunk {
    /// Returns `true` if this is one of several files for its date.
    pub fn is_chunked(&self) -> bool {
        self.index.is_some()
    }

    /// Number of lines in the chunk.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the chunk holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The lines as text, with invalid UTF-8 replaced.
    ///
    /// For display only; [`Chunk::lines`] holds the bytes that get written.
    pub fn lines_lossy(&self) -> Vec<Cow<'_, str>> {
        self.lines.iter().map(|line| String::from_utf8_lossy(line)).collect()
    }

    /// Output file name: `{date}.log` or `{date}.{index}.log`.
    pub fn file_name(&self) -> String {
        chunk_file_name(&self.date_key, self.index)
    }
}

/// Builds the output file name for a date group and optional sub-chunk index.
pub fn chunk_file_name(date_key: &DateKey, index: Option<usize>) -> String {
    match index {
        Some(index) => format!("{}.{}.log", date_key, index),
        None => format!("{}.log", date_key),
    }
}

/// Accumulates lines for the current date group.
#[derive(Debug)]
pub struct ChunkBuffer {
    chunk_size: usize,
    cursor: Option<DateKey>,
    lines: Vec<Vec<u8>>,
    chunk_index: usize,
    closed: HashSet<DateKey>,
    reopened: usize,
}

impl ChunkBuffer {
    /// Creates an empty buffer manager.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            cursor: None,
            lines: Vec::new(),
            chunk_index: 0,
            closed: HashSet::new(),
            reopened: 0,
        }
    }

    /// Date of the group currently being filled.
    pub fn cursor(&self) -> Option<&DateKey> {
        self.cursor.as_ref()
    }

    /// Number of lines buffered and not yet flushed.
    pub fn pending_lines(&self) -> usize {
        self.lines.len()
    }

    /// How many times a date group started again after it had been closed.
    ///
    /// Non-zero only for input that is not in chronological order; such
    /// groups produce output files with the same names as earlier ones.
    pub fn reopened_groups(&self) -> usize {
        self.reopened
    }

    /// Adds a retained entry line, returning the chunk it completed, if any.
    pub fn push_entry(&mut self, key: DateKey, line: Vec<u8>) -> Option<Chunk> {
        let completed = if self.cursor.as_ref() == Some(&key) {
            if self.lines.len() > self.chunk_size {
                let chunk = self.take(Some(self.chunk_index));
                self.chunk_index += 1;
                chunk
            } else {
                None
            }
        } else {
            let index = (self.chunk_index != 0).then_some(self.chunk_index);
            let chunk = self.take(index);
            if let Some(previous) = self.cursor.take() {
                self.closed.insert(previous);
            }
            if self.closed.contains(&key) {
                self.reopened += 1;
                tracing::warn!(date = %key, "date group reopened, input is not in chronological order");
            }
            self.chunk_index = 0;
            self.cursor = Some(key);
            chunk
        };

        self.lines.push(line);
        completed
    }

    /// Adds a continuation line to the current group.
    pub fn push_continuation(&mut self, line: Vec<u8>) {
        debug_assert!(self.cursor.is_some(), "continuation before first entry");
        self.lines.push(line);
    }

    /// Hands out whatever is left at end of input.
    pub fn finish(mut self) -> Option<Chunk> {
        let index = (self.chunk_index != 0).then_some(self.chunk_index);
        self.take(index)
    }

    /// Moves the buffered lines out under the current cursor.
    ///
    /// Empty buffers produce nothing.
    fn take(&mut self, index: Option<usize>) -> Option<Chunk> {
        let lines = std::mem::take(&mut self.lines);
        if lines.is_empty() {
            return None;
        }
        let date_key = self.cursor.clone()?;
        Some(Chunk {
            date_key,
            index,
            lines,
        })
    }
}

impl Default for ChunkBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}
