//! mat5 - Reader and writer for MATLAB level 5 MAT-files
//!
//! Decodes MAT-files into typed, named arrays and encodes the same model
//! back into files MATLAB can load.
//!
//! # Features
//!
//! - Dense numeric arrays of all ten primitive classes, real or complex
//! - Character, cell, struct, object, and sparse arrays
//! - Little- and big-endian files, compressed (v7) and uncompressed (v6) elements
//! - Zero-copy decoding from a borrowed buffer, copying only inflated data
//! - Name filtering, cancellation, and per-array streaming of results
//!
//! # Example
//!
//! ```rust
//! use mat5::{Array, NumericArray, CharArray, StructArray};
//!
//! let m1 = NumericArray::from_rows("m1", &[&[1.3, 4.0], &[2.0, 5.0], &[3.0, 6.0]]).unwrap();
//!
//! let mut s = StructArray::new("str", vec![1, 1]).unwrap();
//! s.set_field("f1", 0, NumericArray::new("", vec![1, 1], vec![3.1415f64]).unwrap()).unwrap();
//! s.set_field("f2", 0, CharArray::from_text("", "dummy")).unwrap();
//!
//! let arrays: Vec<Array> = vec![m1.into(), s.into()];
//! let bytes = mat5::to_bytes(&arrays).unwrap();
//!
//! let file = mat5::parse(&bytes).unwrap();
//! let m1 = file.get("m1").unwrap().as_double().unwrap();
//! assert_eq!(m1.get(2, 1), Some(6.0));
//! ```

pub mod error;
pub mod filter;
pub mod options;
pub mod parser;
pub mod types;
pub mod writer;

#[cfg(feature = "ndarray")]
pub mod ndarray_ext;

// Re-export common types at crate root
pub use error::{Error, Result};
pub use filter::{AcceptAll, ArrayFilter, NameFilter};
pub use options::{Compression, ReadOptions, WriteOptions};
pub use parser::{elements, open, open_with, parse, parse_with, read, read_with};
pub use types::{
    Array, ArrayFlags, ArrayMeta, ByteOrder, CellArray, CharArray, ClassCode, DataType, Element,
    Header, MatFile, NumericArray, SparseArray, StructArray,
};
pub use writer::{save, save_with, to_bytes, write, write_with};
