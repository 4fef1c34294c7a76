//! Boundary detection with a gear rolling checksum and two masks.

use crate::gear::GEAR_TABLE;
use crate::params::{ChunkParams, StreamMode};

/// Length of the region past `minimum` that is scanned with the stricter
/// mask, capped at `source_size`.
///
/// The region ends at `average - min(average, minimum + ceil(minimum / 2))`.
pub fn center_size(average: u32, minimum: u32, source_size: u32) -> u32 {
    let offset = (minimum + minimum.div_ceil(2)).min(average);
    (average - offset).min(source_size)
}

/// Find the length of the next chunk at the start of `window`.
///
/// Returns `0` when the window cannot be cut yet and more input is needed
/// (only with [`StreamMode::More`]). Otherwise returns a length in
/// `1..=maximum`: a content-defined boundary, a forced cut at `maximum`,
/// or the whole tail of a final window.
///
/// The result depends only on the scanned bytes and `params`.
pub fn cut(params: &ChunkParams, window: &[u8], mode: StreamMode) -> usize {
    let minimum = params.minimum as usize;
    let maximum = params.maximum as usize;

    let mut size = window.len();
    if size <= minimum {
        return if mode.is_final() { size } else { 0 };
    }
    if size > maximum {
        size = maximum;
    }

    // size <= maximum < 2^31, so the narrowing is lossless.
    let center = center_size(params.average, params.minimum, size as u32) as usize;

    let mut checksum = 0u32;
    let mut position = minimum;
    while position < center {
        checksum = (checksum >> 1).wrapping_add(GEAR_TABLE[window[position] as usize]);
        position += 1;
        if checksum & params.mask1 == 0 {
            return position;
        }
    }
    while position < size {
        checksum = (checksum >> 1).wrapping_add(GEAR_TABLE[window[position] as usize]);
        position += 1;
        if checksum & params.mask2 == 0 {
            return position;
        }
    }

    if !mode.is_final() && size < maximum {
        return 0;
    }
    size
}
