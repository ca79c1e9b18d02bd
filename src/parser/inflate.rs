//! zlib decompression of compressed elements

use crate::error::{Error, Result};
use flate2::read::ZlibDecoder;
use log::debug;
use std::io::Read;

/// Inflate a zlib stream into a fresh buffer
///
/// `offset` locates the compressed payload for error reporting.
pub fn inflate(compressed: &[u8], offset: usize) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(compressed);
    let mut out = Vec::with_capacity(compressed.len().saturating_mul(4));
    decoder
        .read_to_end(&mut out)
        .map_err(|e| Error::corrupt_compressed(offset, e.to_string()))?;
    debug!(
        "inflated {} bytes into {} at offset {}",
        compressed.len(),
        out.len(),
        offset
    );
    Ok(out)
}
