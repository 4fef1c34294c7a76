//! Chunk a reader of unknown length through a fixed-size source buffer.
//!
//! The buffer is filled from the reader and chunked with
//! [`StreamMode::More`]; the tail that could not be cut yet is moved to the
//! front and topped up on the next fill. Once the reader is exhausted the
//! rest is chunked with [`StreamMode::Final`]. Boundaries match a single
//! final call over the whole input.

use std::collections::VecDeque;
use std::io::{self, Read};

use tracing::debug;

use crate::chunker::Chunker;
use crate::error::{ConfigError, Result};
use crate::hasher::HASH_SIZE;
use crate::manifest::records;
use crate::params::StreamMode;

/// Default source buffer size (4 MiB).
pub const DEFAULT_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// A chunk located in the overall stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkEntry {
    pub hash: [u8; HASH_SIZE],
    /// Offset of the chunk's first byte from the start of the stream.
    pub offset: u64,
    pub length: u32,
}

/// Iterator of [`ChunkEntry`] values read from `R`.
pub struct StreamChunker<R> {
    reader: R,
    chunker: Chunker,
    source: Vec<u8>,
    target: Vec<u8>,
    /// Bytes at the front of `source` carried over from the previous fill.
    pending: usize,
    /// Stream offset of `source[0]`.
    offset: u64,
    ready: VecDeque<ChunkEntry>,
    done: bool,
}

impl<R: Read> StreamChunker<R> {
    pub fn new(reader: R, chunker: Chunker) -> Result<Self> {
        Self::with_buffer_size(reader, chunker, DEFAULT_BUFFER_SIZE)
    }

    /// `buffer_size` must be larger than the chunker's maximum chunk size.
    pub fn with_buffer_size(reader: R, chunker: Chunker, buffer_size: usize) -> Result<Self> {
        let maximum = chunker.params().maximum;
        if buffer_size <= maximum as usize {
            return Err(ConfigError::BufferTooSmall {
                buffer_size,
                maximum,
            }
            .into());
        }
        Ok(Self {
            reader,
            chunker,
            source: vec![0u8; buffer_size],
            target: vec![0u8; chunker.target_capacity(buffer_size)],
            pending: 0,
            offset: 0,
            ready: VecDeque::new(),
            done: false,
        })
    }

    /// Read until `source` is full or the reader reports end of input.
    fn fill(&mut self) -> io::Result<usize> {
        let mut filled = self.pending;
        while filled < self.source.len() {
            match self.reader.read(&mut self.source[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn next_window(&mut self) -> Result<()> {
        let filled = self.fill()?;
        let mode = if filled < self.source.len() {
            StreamMode::Final
        } else {
            StreamMode::More
        };

        let progress = self
            .chunker
            .chunk(&self.source[..filled], &mut self.target, mode)?;

        let mut offset = self.offset;
        for record in records(&self.target[..progress.target_offset]) {
            self.ready.push_back(ChunkEntry {
                hash: record.hash,
                offset,
                length: record.length,
            });
            offset += u64::from(record.length);
        }

        self.source.copy_within(progress.source_offset..filled, 0);
        self.pending = filled - progress.source_offset;
        self.offset = offset;
        debug!(
            filled,
            consumed = progress.source_offset,
            carried = self.pending,
            "stream window"
        );

        if mode.is_final() {
            self.done = true;
        }
        Ok(())
    }
}

impl<R: Read> Iterator for StreamChunker<R> {
    type Item = Result<ChunkEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.ready.pop_front() {
                return Some(Ok(entry));
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.next_window() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}
