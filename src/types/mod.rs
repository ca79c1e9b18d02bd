//! Core types for the MAT-file format

mod array;
mod cell;
mod char;
mod class;
mod data_type;
mod element;
mod header;
mod mat_file;
mod numeric;
mod sparse;
mod structure;

pub use self::char::CharArray;
pub use array::{Array, ArrayMeta};
pub use cell::CellArray;
pub use class::{ArrayFlags, ClassCode};
pub use data_type::DataType;
pub use element::{Element, Scalar};
pub use header::{
    ByteOrder, DESCRIPTION_SIZE, HEADER_SIZE, Header, MARKER_BIG, MARKER_LITTLE, VERSION,
};
pub use mat_file::MatFile;
pub use numeric::NumericArray;
pub use sparse::{SparseArray, SparseIter};
pub use structure::{MAX_FIELD_NAME_LEN, StructArray};
