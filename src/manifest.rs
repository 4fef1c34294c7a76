//! The packed binary manifest.
//!
//! A manifest is a flat run of fixed-size records, one per chunk, in source
//! order:
//!
//! ```text
//! [ 32-byte SHA-256 of the chunk ][ 4-byte big-endian chunk length ]
//! ```
//!
//! There is no header, no count and no padding. Consumers rely on the
//! 36-byte stride.

use crate::error::{Error, Result};
use crate::hasher::HASH_SIZE;

/// Size of the length field in bytes.
pub const LENGTH_SIZE: usize = 4;

/// Size of one record in bytes.
pub const RECORD_SIZE: usize = HASH_SIZE + LENGTH_SIZE;

/// One manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkRecord {
    pub hash: [u8; HASH_SIZE],
    pub length: u32,
}

impl ChunkRecord {
    pub fn read(bytes: &[u8; RECORD_SIZE]) -> Self {
        Self::parse(bytes)
    }

    // Caller guarantees at least RECORD_SIZE bytes.
    fn parse(bytes: &[u8]) -> Self {
        let mut hash = [0u8; HASH_SIZE];
        hash.copy_from_slice(&bytes[..HASH_SIZE]);
        let mut length = [0u8; LENGTH_SIZE];
        length.copy_from_slice(&bytes[HASH_SIZE..RECORD_SIZE]);
        Self {
            hash,
            length: u32::from_be_bytes(length),
        }
    }

    /// Encode into the first [`RECORD_SIZE`] bytes of `out`.
    pub fn write_to(&self, out: &mut [u8]) -> Result<()> {
        if out.len() < RECORD_SIZE {
            return Err(Error::Capacity {
                needed: RECORD_SIZE,
                available: out.len(),
            });
        }
        out[..HASH_SIZE].copy_from_slice(&self.hash);
        write_length(&mut out[HASH_SIZE..RECORD_SIZE], self.length);
        Ok(())
    }

    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        out[..HASH_SIZE].copy_from_slice(&self.hash);
        write_length(&mut out[HASH_SIZE..], self.length);
        out
    }
}

/// Write a chunk length as 4 big-endian bytes.
pub(crate) fn write_length(out: &mut [u8], length: u32) {
    out[..LENGTH_SIZE].copy_from_slice(&length.to_be_bytes());
}

/// Iterate the complete records of a packed manifest.
///
/// A trailing partial record is ignored; use [`decode`] to reject it.
pub fn records(bytes: &[u8]) -> impl Iterator<Item = ChunkRecord> + '_ {
    bytes.chunks_exact(RECORD_SIZE).map(ChunkRecord::parse)
}

/// Decode a packed manifest, rejecting a trailing partial record.
pub fn decode(bytes: &[u8]) -> Result<Vec<ChunkRecord>> {
    if bytes.len() % RECORD_SIZE != 0 {
        return Err(Error::Manifest(bytes.len()));
    }
    Ok(records(bytes).collect())
}
