//! Error types for mat5

use std::io;
use thiserror::Error;

/// Result type alias for MAT-file operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding or encoding a MAT-file.
///
/// Byte offsets are relative to the buffer being decoded. Elements that were
/// decompressed carry offsets into the decompressed stream.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the byte source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed tag, unknown data type code or inconsistent element layout.
    #[error("Malformed MAT-file at offset {offset}: {reason}")]
    Format { offset: usize, reason: String },

    /// Fewer bytes or values available than declared.
    #[error("Truncated data at offset {offset}: needed {needed}, only {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The zlib stream of a compressed element is invalid.
    #[error("Corrupt compressed element at offset {offset}: {reason}")]
    CorruptCompressed { offset: usize, reason: String },

    /// Matrix class code that this crate cannot decode.
    #[error("Unsupported array class code {code}")]
    UnsupportedClass { code: u8 },

    /// Value data length disagrees with the element count of the dimensions.
    #[error("Dimension mismatch for '{name}': dimensions hold {expected} elements, data has {actual}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Array cannot be represented in the format.
    #[error("Invalid array '{name}': {reason}")]
    InvalidArray { name: String, reason: String },

    /// Decoding was cancelled between top-level elements.
    #[error("Decoding cancelled")]
    Cancelled,
}

impl Error {
    /// Create a Format error at the given offset.
    pub fn format(offset: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            offset,
            reason: reason.into(),
        }
    }

    /// Create a Truncated error.
    pub const fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Self::Truncated {
            offset,
            needed,
            available,
        }
    }

    /// Create a CorruptCompressed error.
    pub fn corrupt_compressed(offset: usize, reason: impl Into<String>) -> Self {
        Self::CorruptCompressed {
            offset,
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }

    /// Create an InvalidArray error.
    pub fn invalid_array(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArray {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
