//! Content-defined chunking for deduplication.
//!
//! A source buffer is split at boundaries chosen by a gear rolling checksum,
//! so an insertion or deletion only disturbs the chunks around the edit.
//! Each chunk becomes a 36-byte record (SHA-256 hash followed by a
//! big-endian length) in a packed manifest.

pub mod chunker;
pub mod cut;
pub mod error;
pub mod gear;
pub mod hasher;
pub mod manifest;
pub mod params;
pub mod stream;

pub use chunker::{chunk, required_target_capacity, Chunker, Progress};
pub use error::{ConfigError, Error, Result};
pub use manifest::{ChunkRecord, RECORD_SIZE};
pub use params::{ChunkParams, StreamMode};
pub use stream::{ChunkEntry, StreamChunker};
