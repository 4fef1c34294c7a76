use crate::params::{
    AVERAGE_MAX, AVERAGE_MIN, BITS_MAX, BITS_MIN, MAXIMUM_MAX, MAXIMUM_MIN, MINIMUM_MAX,
    MINIMUM_MIN,
};

/// A rejected chunking parameter.
///
/// Raised before any buffer is read or written. Nothing is produced when
/// one of these comes back, so the caller can fix the argument and retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be an unsigned 31 bit integer")]
    NotAnInteger { name: &'static str },

    #[error("average < AVERAGE_MIN ({0} < {})", AVERAGE_MIN)]
    AverageTooSmall(u32),
    #[error("average > AVERAGE_MAX ({0} > {})", AVERAGE_MAX)]
    AverageTooLarge(u32),

    #[error("minimum < MINIMUM_MIN ({0} < {})", MINIMUM_MIN)]
    MinimumTooSmall(u32),
    #[error("minimum > MINIMUM_MAX ({0} > {})", MINIMUM_MAX)]
    MinimumTooLarge(u32),
    #[error("minimum >= average ({minimum} >= {average})")]
    MinimumNotBelowAverage { minimum: u32, average: u32 },

    #[error("maximum < MAXIMUM_MIN ({0} < {})", MAXIMUM_MIN)]
    MaximumTooSmall(u32),
    #[error("maximum > MAXIMUM_MAX ({0} > {})", MAXIMUM_MAX)]
    MaximumTooLarge(u32),
    #[error("maximum <= average ({maximum} <= {average})")]
    MaximumNotAboveAverage { maximum: u32, average: u32 },
    #[error("maximum - minimum < average ({maximum} - {minimum} < {average})")]
    RangeTooNarrow {
        minimum: u32,
        average: u32,
        maximum: u32,
    },

    #[error("average must be between {} and {} bits, got {0}", BITS_MIN, BITS_MAX)]
    AverageBits(u32),

    #[error("flags has an unknown flag ({0})")]
    UnknownFlag(u32),
    #[error("sourceSize <= maximum ({source_size} <= {maximum}) without the final flag")]
    SourceNotAboveMaximum { source_size: u32, maximum: u32 },

    #[error("buffer size {buffer_size} must exceed maximum chunk size {maximum}")]
    BufferTooSmall { buffer_size: usize, maximum: u32 },
}

/// Errors returned by the chunking entry points.
///
/// Every variant aborts the whole invocation. Records already written to
/// the target before the failure must not be trusted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("{buffer} overflow: end {end} > length {length}")]
    Bounds {
        buffer: &'static str,
        end: usize,
        length: usize,
    },

    #[error("target overflow: {needed} bytes needed, {available} available")]
    Capacity { needed: usize, available: usize },

    #[error("invariant violation: chunk size {size} outside [{minimum}, {maximum}]")]
    Invariant {
        size: usize,
        minimum: u32,
        maximum: u32,
    },

    #[error("hash failed: {0}")]
    Hash(String),

    #[error("manifest length {0} is not a multiple of the record size")]
    Manifest(usize),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
