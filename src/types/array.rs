//! Array value model - shared metadata and the array sum type

use super::{
    ArrayFlags, CellArray, CharArray, ClassCode, Element, NumericArray, SparseArray, StructArray,
};
use crate::error::{Error, Result};
use std::fmt;

/// Metadata shared by every array kind
///
/// Dimensions are fixed at construction and always have rank >= 2. Their
/// running product, and that of the trailing dimensions, fits in `usize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayMeta {
    pub name: String,
    dimensions: Vec<usize>,
    len: usize,
    cols: usize,
    flags: ArrayFlags,
}

/// Product of `dims`, or None if any partial product overflows
fn checked_product(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

impl ArrayMeta {
    pub fn new(name: impl Into<String>, dimensions: Vec<usize>) -> Result<Self> {
        let name = name.into();
        if dimensions.len() < 2 {
            return Err(Error::invalid_array(
                name,
                format!("rank must be at least 2, got {:?}", dimensions),
            ));
        }
        let (Some(len), Some(cols)) = (
            checked_product(&dimensions),
            checked_product(&dimensions[1..]),
        ) else {
            return Err(Error::invalid_array(
                name,
                format!("element count of {:?} overflows usize", dimensions),
            ));
        };
        Ok(Self {
            name,
            dimensions,
            len,
            cols,
            flags: ArrayFlags::default(),
        })
    }

    /// Metadata of a 1xN row vector
    pub(crate) fn row_vector(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            dimensions: vec![1, len],
            len,
            cols: len,
            flags: ArrayFlags::default(),
        }
    }

    pub(crate) fn with_flags(mut self, flags: ArrayFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    pub fn rows(&self) -> usize {
        self.dimensions[0]
    }

    /// Number of columns; trailing dimensions are folded into the column count
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements
    pub fn num_elements(&self) -> usize {
        self.len
    }

    pub fn flags(&self) -> ArrayFlags {
        self.flags
    }

    pub fn is_complex(&self) -> bool {
        self.flags.complex
    }

    pub fn is_global(&self) -> bool {
        self.flags.global
    }

    pub fn is_logical(&self) -> bool {
        self.flags.logical
    }

    pub fn set_global(&mut self, global: bool) {
        self.flags.global = global;
    }

    pub fn set_logical(&mut self, logical: bool) {
        self.flags.logical = logical;
    }

    pub(crate) fn set_complex(&mut self, complex: bool) {
        self.flags.complex = complex;
    }

    /// Column-major linear index of a 2-D position
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows() && col < self.cols()).then(|| row + col * self.rows())
    }

    /// Column-major linear index of an N-D position
    pub fn linear_index(&self, position: &[usize]) -> Option<usize> {
        if position.len() != self.dimensions.len() {
            return None;
        }
        let mut index = 0;
        let mut stride = 1;
        for (&p, &d) in position.iter().zip(&self.dimensions) {
            if p >= d {
                return None;
            }
            index += p * stride;
            stride *= d;
        }
        Some(index)
    }

    pub(crate) fn check_len(&self, actual: usize) -> Result<()> {
        let expected = self.num_elements();
        if expected != actual {
            return Err(Error::dimension_mismatch(&self.name, expected, actual));
        }
        Ok(())
    }

    pub(crate) fn write_header(&self, f: &mut fmt::Formatter<'_>, class: ClassCode) -> fmt::Result {
        let dims: Vec<String> = self.dimensions.iter().map(|d| d.to_string()).collect();
        write!(f, "{} = [{} {}", self.name, dims.join("x"), class)?;
        if self.flags.complex {
            write!(f, " complex")?;
        }
        if self.flags.logical {
            write!(f, " logical")?;
        }
        if self.flags.global {
            write!(f, " global")?;
        }
        writeln!(f, "]")
    }
}

/// A decoded or to-be-encoded array of any kind
#[derive(Debug, Clone, PartialEq)]
pub enum Array {
    Double(NumericArray<f64>),
    Single(NumericArray<f32>),
    Int8(NumericArray<i8>),
    UInt8(NumericArray<u8>),
    Int16(NumericArray<i16>),
    UInt16(NumericArray<u16>),
    Int32(NumericArray<i32>),
    UInt32(NumericArray<u32>),
    Int64(NumericArray<i64>),
    UInt64(NumericArray<u64>),
    Char(CharArray),
    Cell(CellArray),
    Struct(StructArray),
    Sparse(SparseArray),
}

macro_rules! dispatch {
    ($array:expr, $a:ident => $body:expr) => {
        match $array {
            Array::Double($a) => $body,
            Array::Single($a) => $body,
            Array::Int8($a) => $body,
            Array::UInt8($a) => $body,
            Array::Int16($a) => $body,
            Array::UInt16($a) => $body,
            Array::Int32($a) => $body,
            Array::UInt32($a) => $body,
            Array::Int64($a) => $body,
            Array::UInt64($a) => $body,
            Array::Char($a) => $body,
            Array::Cell($a) => $body,
            Array::Struct($a) => $body,
            Array::Sparse($a) => $body,
        }
    };
}

impl Array {
    pub fn meta(&self) -> &ArrayMeta {
        dispatch!(self, a => a.meta())
    }

    pub fn meta_mut(&mut self) -> &mut ArrayMeta {
        dispatch!(self, a => a.meta_mut())
    }

    pub fn name(&self) -> &str {
        &self.meta().name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.meta_mut().name = name.into();
    }

    pub fn dimensions(&self) -> &[usize] {
        self.meta().dimensions()
    }

    pub fn flags(&self) -> ArrayFlags {
        self.meta().flags()
    }

    pub fn num_elements(&self) -> usize {
        self.meta().num_elements()
    }

    /// Class code written for this array
    pub fn class(&self) -> ClassCode {
        match self {
            Array::Double(_) => ClassCode::Double,
            Array::Single(_) => ClassCode::Single,
            Array::Int8(_) => ClassCode::Int8,
            Array::UInt8(_) => ClassCode::UInt8,
            Array::Int16(_) => ClassCode::Int16,
            Array::UInt16(_) => ClassCode::UInt16,
            Array::Int32(_) => ClassCode::Int32,
            Array::UInt32(_) => ClassCode::UInt32,
            Array::Int64(_) => ClassCode::Int64,
            Array::UInt64(_) => ClassCode::UInt64,
            Array::Char(_) => ClassCode::Char,
            Array::Cell(_) => ClassCode::Cell,
            Array::Struct(s) if s.class_name().is_some() => ClassCode::Object,
            Array::Struct(_) => ClassCode::Struct,
            Array::Sparse(_) => ClassCode::Sparse,
        }
    }

    /// Try to get as a numeric array of element type T
    pub fn as_numeric<T: Element>(&self) -> Option<&NumericArray<T>> {
        T::from_array(self)
    }

    pub fn as_numeric_mut<T: Element>(&mut self) -> Option<&mut NumericArray<T>> {
        T::from_array_mut(self)
    }

    /// Try to get as a double array
    pub fn as_double(&self) -> Option<&NumericArray<f64>> {
        self.as_numeric()
    }

    pub fn as_char(&self) -> Option<&CharArray> {
        match self {
            Array::Char(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_cell(&self) -> Option<&CellArray> {
        match self {
            Array::Cell(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructArray> {
        match self {
            Array::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sparse(&self) -> Option<&SparseArray> {
        match self {
            Array::Sparse(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is an unnamed empty 0x0 double, the placeholder for unset slots
    pub(crate) fn is_placeholder(&self) -> bool {
        match self {
            Array::Double(d) => {
                d.name().is_empty()
                    && d.dimensions() == [0, 0]
                    && d.meta().flags() == ArrayFlags::default()
            }
            _ => false,
        }
    }

    /// Contents of a cell or field slot; the placeholder is stored as unset
    pub(crate) fn into_slot(self) -> Option<Array> {
        (!self.is_placeholder()).then_some(self)
    }
}

impl<T: Element> From<NumericArray<T>> for Array {
    fn from(array: NumericArray<T>) -> Self {
        T::into_array(array)
    }
}

impl From<CharArray> for Array {
    fn from(array: CharArray) -> Self {
        Array::Char(array)
    }
}

impl From<CellArray> for Array {
    fn from(array: CellArray) -> Self {
        Array::Cell(array)
    }
}

impl From<StructArray> for Array {
    fn from(array: StructArray) -> Self {
        Array::Struct(array)
    }
}

impl From<SparseArray> for Array {
    fn from(array: SparseArray) -> Self {
        Array::Sparse(array)
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, a => fmt::Display::fmt(a, f))
    }
}
