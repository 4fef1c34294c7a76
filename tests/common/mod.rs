#![allow(dead_code)]

use deduplication::manifest::{self, ChunkRecord};

/// Deterministic pseudo-random bytes from a 32-bit LCG.
pub fn lcg_data(size: usize, seed: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}

pub fn lengths(records: &[ChunkRecord]) -> Vec<u32> {
    records.iter().map(|r| r.length).collect()
}

pub fn decode(packed: &[u8]) -> Vec<ChunkRecord> {
    manifest::decode(packed).unwrap()
}
