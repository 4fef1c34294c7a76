use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Size of a chunk content hash in bytes.
pub const HASH_SIZE: usize = 32;

/// SHA-256 of `data`.
pub fn digest(data: &[u8]) -> [u8; HASH_SIZE] {
    Sha256::digest(data).into()
}

/// Write the SHA-256 of `chunk` into `out`, which must be exactly
/// [`HASH_SIZE`] bytes long.
pub fn hash_into(chunk: &[u8], out: &mut [u8]) -> Result<()> {
    if out.len() != HASH_SIZE {
        return Err(Error::Hash(format!(
            "digest slot is {} bytes, expected {}",
            out.len(),
            HASH_SIZE
        )));
    }
    let mut hasher = Sha256::new();
    hasher.update(chunk);
    out.copy_from_slice(&hasher.finalize());
    Ok(())
}
