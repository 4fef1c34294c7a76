//! Chunk a source window into a packed manifest.
//!
//! [`chunk`] is the flat entry point meant for hosts that deal in offsets
//! and raw numbers. [`Chunker`] holds parameters that were validated once
//! and works on plain slices.

use tracing::{debug, trace};

use crate::cut::cut;
use crate::error::{ConfigError, Error, Result};
use crate::hasher::{hash_into, HASH_SIZE};
use crate::manifest::{write_length, RECORD_SIZE};
use crate::params::{check_integer, check_minimum, ChunkParams, StreamMode, INTEGER_MAX};

/// How far an invocation got through the source and the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// End of the last source byte covered by a record.
    pub source_offset: usize,
    /// End of the last record written.
    pub target_offset: usize,
}

/// Target bytes needed to hold the manifest of `source_size` bytes:
/// `ceil(source_size / minimum) * 36`, the worst case of every chunk
/// being exactly `minimum` long.
pub fn required_target_capacity(minimum: u32, source_size: u32) -> Result<usize> {
    check_minimum(minimum)?;
    check_integer("sourceSize", source_size)?;
    Ok(capacity_for(minimum, source_size as usize))
}

fn capacity_for(minimum: u32, source_size: usize) -> usize {
    source_size.div_ceil(minimum as usize) * RECORD_SIZE
}

/// Chunk `source[source_offset..source_offset + source_size]` and append
/// one record per chunk to `target` starting at `target_offset`.
///
/// `flag` is `0` when more source data will follow (the tail that cannot
/// be cut yet is left unconsumed) and `1` for the final call. Every
/// argument is validated before either buffer is read; `target` must hold
/// `required_target_capacity(minimum, source_size)` bytes past
/// `target_offset`.
///
/// Returns the absolute offsets reached in both buffers.
#[allow(clippy::too_many_arguments)]
pub fn chunk(
    average: u32,
    minimum: u32,
    maximum: u32,
    source: &[u8],
    source_offset: u32,
    source_size: u32,
    target: &mut [u8],
    target_offset: u32,
    flag: u32,
) -> Result<Progress> {
    let chunker = Chunker::new(average, minimum, maximum)?;
    check_integer("sourceOffset", source_offset)?;
    check_integer("sourceSize", source_size)?;
    check_integer("targetOffset", target_offset)?;
    let mode = StreamMode::try_from(flag)?;
    if !mode.is_final() && source_size <= maximum {
        return Err(ConfigError::SourceNotAboveMaximum {
            source_size,
            maximum,
        }
        .into());
    }

    let source_start = source_offset as usize;
    let source_end = source_start + source_size as usize;
    if source_end > source.len() {
        return Err(Error::Bounds {
            buffer: "source",
            end: source_end,
            length: source.len(),
        });
    }

    let target_start = target_offset as usize;
    let target_end = target_start + capacity_for(minimum, source_size as usize);
    if target_end > target.len() {
        return Err(Error::Capacity {
            needed: target_end,
            available: target.len(),
        });
    }

    let progress = chunker.chunk(
        &source[source_start..source_end],
        &mut target[target_start..target_end],
        mode,
    )?;
    Ok(Progress {
        source_offset: source_start + progress.source_offset,
        target_offset: target_start + progress.target_offset,
    })
}

/// A chunker with validated parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    params: ChunkParams,
}

impl Chunker {
    pub fn new(average: u32, minimum: u32, maximum: u32) -> Result<Self> {
        Ok(Self {
            params: ChunkParams::new(average, minimum, maximum)?,
        })
    }

    /// Derive `minimum = round(average / 4)` and `maximum = average * 8`.
    pub fn recommended(average: u32) -> Result<Self> {
        Self::new(
            average,
            average.saturating_add(2) / 4,
            average.saturating_mul(8),
        )
    }

    pub fn params(&self) -> &ChunkParams {
        &self.params
    }

    /// Target bytes needed for a source of `source_size` bytes.
    pub fn target_capacity(&self, source_size: usize) -> usize {
        capacity_for(self.params.minimum, source_size)
    }

    /// Chunk all of `source`, writing records to the start of `target`.
    ///
    /// Offsets in the returned [`Progress`] are relative to the two slices.
    /// With [`StreamMode::More`] the source must be longer than `maximum`
    /// and the returned `source_offset` may stop short of `source.len()`.
    pub fn chunk(&self, source: &[u8], target: &mut [u8], mode: StreamMode) -> Result<Progress> {
        if source.len() > INTEGER_MAX as usize {
            return Err(ConfigError::NotAnInteger { name: "sourceSize" }.into());
        }
        let maximum = self.params.maximum;
        if !mode.is_final() && source.len() <= maximum as usize {
            return Err(ConfigError::SourceNotAboveMaximum {
                source_size: source.len() as u32,
                maximum,
            }
            .into());
        }
        let needed = self.target_capacity(source.len());
        if needed > target.len() {
            return Err(Error::Capacity {
                needed,
                available: target.len(),
            });
        }
        self.process(source, &mut target[..needed], mode)
    }

    /// Chunk all of `source` as a final window and return the manifest.
    pub fn manifest(&self, source: &[u8]) -> Result<Vec<u8>> {
        let mut target = vec![0u8; self.target_capacity(source.len())];
        let progress = self.chunk(source, &mut target, StreamMode::Final)?;
        target.truncate(progress.target_offset);
        Ok(target)
    }

    fn process(&self, source: &[u8], target: &mut [u8], mode: StreamMode) -> Result<Progress> {
        let ChunkParams {
            minimum, maximum, ..
        } = self.params;
        let mut source_offset = 0;
        let mut target_offset = 0;

        while source_offset < source.len() {
            let size = cut(&self.params, &source[source_offset..], mode);
            if size == 0 {
                break;
            }
            if (size < minimum as usize && !mode.is_final()) || size > maximum as usize {
                return Err(Error::Invariant {
                    size,
                    minimum,
                    maximum,
                });
            }
            let chunk_end = source_offset + size;
            if chunk_end > source.len() {
                return Err(Error::Bounds {
                    buffer: "source",
                    end: chunk_end,
                    length: source.len(),
                });
            }
            let record_end = target_offset + RECORD_SIZE;
            if record_end > target.len() {
                return Err(Error::Capacity {
                    needed: record_end,
                    available: target.len(),
                });
            }

            let record = &mut target[target_offset..record_end];
            hash_into(&source[source_offset..chunk_end], &mut record[..HASH_SIZE])?;
            write_length(&mut record[HASH_SIZE..], size as u32);
            trace!(offset = source_offset, size, "chunk");

            source_offset = chunk_end;
            target_offset = record_end;
        }

        debug!(
            consumed = source_offset,
            remaining = source.len() - source_offset,
            records = target_offset / RECORD_SIZE,
            last = mode.is_final(),
            "chunked window"
        );
        Ok(Progress {
            source_offset,
            target_offset,
        })
    }
}
