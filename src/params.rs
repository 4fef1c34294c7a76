//! Chunk size parameters, their validation, and the derived boundary masks.
//!
//! The three user-facing sizes (`average`, `minimum`, `maximum`) are checked
//! against fixed ranges and against each other. The masks are then derived
//! from `average` so that cuts are rare just after `minimum` and become
//! likelier past the centre of the chunk, pulling the size distribution
//! toward `average`.

use crate::error::ConfigError;

pub const AVERAGE_MIN: u32 = 256;
pub const AVERAGE_MAX: u32 = 268_435_456;
pub const MINIMUM_MIN: u32 = 64;
pub const MINIMUM_MAX: u32 = 67_108_864;
pub const MAXIMUM_MIN: u32 = 1024;
pub const MAXIMUM_MAX: u32 = 1_073_741_824;

/// Largest value accepted for any numeric argument (31 bits).
pub const INTEGER_MAX: u32 = (1 << 31) - 1;

/// Bounds on `round(log2(average))`.
pub const BITS_MIN: u32 = 8;
pub const BITS_MAX: u32 = 28;

/// Whether more source data follows the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// More data may follow: never emit an undersized tail, stop and ask
    /// for more input instead.
    More,
    /// Final (or only) call: drain every remaining byte.
    Final,
}

impl StreamMode {
    pub fn is_final(self) -> bool {
        self == StreamMode::Final
    }
}

impl TryFrom<u32> for StreamMode {
    type Error = ConfigError;

    fn try_from(flag: u32) -> Result<Self, Self::Error> {
        check_integer("flags", flag)?;
        match flag {
            0 => Ok(StreamMode::More),
            1 => Ok(StreamMode::Final),
            other => Err(ConfigError::UnknownFlag(other)),
        }
    }
}

impl From<StreamMode> for u32 {
    fn from(mode: StreamMode) -> u32 {
        match mode {
            StreamMode::More => 0,
            StreamMode::Final => 1,
        }
    }
}

/// Validated chunk sizes plus the two derived masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkParams {
    pub average: u32,
    pub minimum: u32,
    pub maximum: u32,
    /// Stricter mask (`bits + 1` low bits), tested before the centre.
    pub mask1: u32,
    /// Looser mask (`bits - 1` low bits), tested after the centre.
    pub mask2: u32,
}

impl ChunkParams {
    /// Validate the three sizes and derive both masks.
    pub fn new(average: u32, minimum: u32, maximum: u32) -> Result<Self, ConfigError> {
        check_integer("average", average)?;
        if average < AVERAGE_MIN {
            return Err(ConfigError::AverageTooSmall(average));
        }
        if average > AVERAGE_MAX {
            return Err(ConfigError::AverageTooLarge(average));
        }

        check_minimum(minimum)?;
        if minimum >= average {
            return Err(ConfigError::MinimumNotBelowAverage { minimum, average });
        }

        check_integer("maximum", maximum)?;
        if maximum < MAXIMUM_MIN {
            return Err(ConfigError::MaximumTooSmall(maximum));
        }
        if maximum > MAXIMUM_MAX {
            return Err(ConfigError::MaximumTooLarge(maximum));
        }
        if maximum <= average {
            return Err(ConfigError::MaximumNotAboveAverage { maximum, average });
        }
        if maximum - minimum < average {
            return Err(ConfigError::RangeTooNarrow {
                minimum,
                average,
                maximum,
            });
        }

        let bits = average_bits(average)?;
        Ok(Self {
            average,
            minimum,
            maximum,
            mask1: mask(bits + 1),
            mask2: mask(bits - 1),
        })
    }
}

/// Reject values that do not fit in 31 bits.
pub fn check_integer(name: &'static str, value: u32) -> Result<(), ConfigError> {
    if value > INTEGER_MAX {
        return Err(ConfigError::NotAnInteger { name });
    }
    Ok(())
}

/// Range check for `minimum` on its own, shared with the capacity helper.
pub fn check_minimum(minimum: u32) -> Result<(), ConfigError> {
    check_integer("minimum", minimum)?;
    if minimum < MINIMUM_MIN {
        return Err(ConfigError::MinimumTooSmall(minimum));
    }
    if minimum > MINIMUM_MAX {
        return Err(ConfigError::MinimumTooLarge(minimum));
    }
    Ok(())
}

/// `round(log2(value))`: 65535, 65536 and 65537 all give 16.
pub fn logarithm2(value: u32) -> u32 {
    f64::from(value).log2().round() as u32
}

/// Mask bit count for `average`, bounded to `BITS_MIN..=BITS_MAX`.
pub fn average_bits(average: u32) -> Result<u32, ConfigError> {
    let bits = logarithm2(average);
    if !(BITS_MIN..=BITS_MAX).contains(&bits) {
        return Err(ConfigError::AverageBits(bits));
    }
    Ok(bits)
}

/// A mask with the low `bits` bits set. `bits` must be in `1..=31`.
pub fn mask(bits: u32) -> u32 {
    debug_assert!((1..=31).contains(&bits), "mask bits out of range: {bits}");
    (1u32 << bits) - 1
}
