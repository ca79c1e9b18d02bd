//! Decoding MAT-files
//!
//! Decoding walks a borrowed byte buffer with a [`ByteCursor`]; bytes are
//! only copied when a compressed element is inflated.

mod cursor;
mod file;
mod inflate;
mod matrix;
mod primitives;
mod tag;

pub use cursor::ByteCursor;
pub use file::{Elements, elements, parse_header};
pub use matrix::parse_matrix;
pub use tag::{MAX_PACKED_SIZE, Tag, parse_element, parse_tag};

use crate::error::Result;
use crate::options::ReadOptions;
use crate::types::MatFile;
use std::io::Read;
use std::path::Path;

/// Decode a MAT-file held in memory
///
/// On error nothing is returned; use [`elements`] to keep the arrays
/// decoded before the failure.
pub fn parse(bytes: &[u8]) -> Result<MatFile> {
    parse_with(bytes, &ReadOptions::default())
}

/// Decode a MAT-file held in memory with options
pub fn parse_with(bytes: &[u8], options: &ReadOptions) -> Result<MatFile> {
    let (header, arrays) = elements(bytes, options)?;
    let mut file = MatFile::new(header);
    for array in arrays {
        file.insert(array?);
    }
    Ok(file)
}

/// Read a whole MAT-file from a reader
pub fn read<R: Read>(reader: R) -> Result<MatFile> {
    read_with(reader, &ReadOptions::default())
}

/// Read a whole MAT-file from a reader with options
pub fn read_with<R: Read>(mut reader: R, options: &ReadOptions) -> Result<MatFile> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_with(&bytes, options)
}

/// Read a MAT-file from disk
pub fn open(path: impl AsRef<Path>) -> Result<MatFile> {
    open_with(path, &ReadOptions::default())
}

/// Read a MAT-file from disk with options
pub fn open_with(path: impl AsRef<Path>, options: &ReadOptions) -> Result<MatFile> {
    let bytes = std::fs::read(path)?;
    parse_with(&bytes, options)
}
