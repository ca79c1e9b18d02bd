//! ndarray integration for numeric arrays
//!
//! MAT-files store data column-major, so conversions go through Fortran
//! layout on the ndarray side. Vectors and scalars gain trailing unit
//! dimensions on the way in, since MAT-file arrays have rank >= 2.
//!
//! Enable with the `ndarray` feature flag.

use crate::types::{Array, ClassCode, Element, NumericArray};
use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use thiserror::Error;

/// Error type for ndarray conversions
#[derive(Error, Debug)]
pub enum NdarrayError {
    /// Array class differs from the requested element type
    #[error("class mismatch: expected {expected}, got {actual}")]
    ClassMismatch {
        expected: ClassCode,
        actual: ClassCode,
    },
    /// Shape doesn't match data length
    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    /// MAT-file side rejected the array
    #[error(transparent)]
    Array(#[from] crate::Error),
}

fn to_fortran<T: Element>(dimensions: &[usize], data: &[T]) -> Result<ArrayD<T>, NdarrayError> {
    Ok(ArrayD::from_shape_vec(
        IxDyn(dimensions).f(),
        data.to_vec(),
    )?)
}

/// Column-major element order of an ndarray
fn column_major<T: Element>(array: &ArrayD<T>) -> Vec<T> {
    array.t().iter().copied().collect()
}

fn mat_dimensions(shape: &[usize]) -> Vec<usize> {
    let mut dimensions = shape.to_vec();
    while dimensions.len() < 2 {
        dimensions.push(1);
    }
    dimensions
}

impl<T: Element> NumericArray<T> {
    /// Create a real array from an ndarray of any layout
    pub fn from_ndarray(name: impl Into<String>, array: &ArrayD<T>) -> Result<Self, NdarrayError> {
        Ok(Self::new(
            name,
            mat_dimensions(array.shape()),
            column_major(array),
        )?)
    }

    /// Create a complex array from real and imaginary ndarrays of the same shape
    pub fn from_ndarray_complex(
        name: impl Into<String>,
        real: &ArrayD<T>,
        imag: &ArrayD<T>,
    ) -> Result<Self, NdarrayError> {
        Ok(Self::new_complex(
            name,
            mat_dimensions(real.shape()),
            column_major(real),
            column_major(imag),
        )?)
    }

    /// Real part as an ndarray in Fortran layout
    pub fn to_ndarray(&self) -> Result<ArrayD<T>, NdarrayError> {
        to_fortran(self.dimensions(), self.real())
    }

    /// Imaginary part as an ndarray, None for real arrays
    pub fn imag_to_ndarray(&self) -> Result<Option<ArrayD<T>>, NdarrayError> {
        self.imag()
            .map(|imag| to_fortran(self.dimensions(), imag))
            .transpose()
    }
}

impl Array {
    /// Real part of a numeric array of element type `T` as an ndarray
    pub fn to_ndarray<T: Element>(&self) -> Result<ArrayD<T>, NdarrayError> {
        T::from_array(self)
            .ok_or(NdarrayError::ClassMismatch {
                expected: T::CLASS,
                actual: self.class(),
            })?
            .to_ndarray()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn matrix_keeps_row_col_positions() {
        let m = array![[1.3f64, 4.0], [2.0, 5.0], [3.0, 6.0]].into_dyn();
        let numeric = NumericArray::from_ndarray("m1", &m).unwrap();
        assert_eq!(numeric.dimensions(), &[3, 2]);
        assert_eq!(numeric.real(), &[1.3, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let back = numeric.to_ndarray().unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn vector_gets_unit_dimension() {
        let v = array![1i32, 2, 3].into_dyn();
        let numeric = NumericArray::from_ndarray("v", &v).unwrap();
        assert_eq!(numeric.dimensions(), &[3, 1]);
    }

    #[test]
    fn three_dimensional() {
        let t = ArrayD::<u16>::from_shape_fn(IxDyn(&[2, 3, 4]), |idx| {
            (idx[0] * 12 + idx[1] * 4 + idx[2]) as u16
        });
        let numeric = NumericArray::from_ndarray("t", &t).unwrap();
        assert_eq!(numeric.meta().linear_index(&[1, 2, 3]).map(|i| numeric.real()[i]), Some(23));
        assert_eq!(numeric.to_ndarray().unwrap(), t);
    }

    #[test]
    fn complex_parts() {
        let re = array![[1.0f32, 2.0]].into_dyn();
        let im = array![[-1.0f32, -2.0]].into_dyn();
        let numeric = NumericArray::from_ndarray_complex("c", &re, &im).unwrap();
        assert_eq!(numeric.imag_to_ndarray().unwrap(), Some(im));
    }

    #[test]
    fn class_mismatch() {
        let array: Array = NumericArray::new("d", vec![1, 1], vec![1.0f64]).unwrap().into();
        let result = array.to_ndarray::<f32>();
        assert!(matches!(result, Err(NdarrayError::ClassMismatch { .. })));
    }
}
