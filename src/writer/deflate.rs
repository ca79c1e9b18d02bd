//! zlib compression of top-level elements

use crate::error::Result;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use log::debug;
use std::io::Write;

/// Compress an encoded element stream; levels above 9 are clamped
pub fn deflate(bytes: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder.write_all(bytes)?;
    let compressed = encoder.finish()?;
    debug!(
        "deflated {} bytes into {} at level {}",
        bytes.len(),
        compressed.len(),
        level
    );
    Ok(compressed)
}
