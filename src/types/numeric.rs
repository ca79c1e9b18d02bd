//! Dense numeric arrays

use super::{ArrayMeta, Element};
use crate::error::{Error, Result};
use std::fmt;

/// Dense numeric array stored column-major
///
/// `imag` is present exactly when the array is complex and always has the
/// same length as `real`.
#[derive(Debug, Clone)]
pub struct NumericArray<T: Element> {
    meta: ArrayMeta,
    real: Vec<T>,
    imag: Option<Vec<T>>,
}

impl<T: Element> NumericArray<T> {
    /// Create a real array from column-major data
    pub fn new(name: impl Into<String>, dimensions: Vec<usize>, real: Vec<T>) -> Result<Self> {
        let meta = ArrayMeta::new(name, dimensions)?;
        meta.check_len(real.len())?;
        Ok(Self {
            meta,
            real,
            imag: None,
        })
    }

    /// Create a complex array from column-major real and imaginary parts
    pub fn new_complex(
        name: impl Into<String>,
        dimensions: Vec<usize>,
        real: Vec<T>,
        imag: Vec<T>,
    ) -> Result<Self> {
        let mut meta = ArrayMeta::new(name, dimensions)?;
        meta.check_len(real.len())?;
        meta.check_len(imag.len())?;
        meta.set_complex(true);
        Ok(Self {
            meta,
            real,
            imag: Some(imag),
        })
    }

    /// Create a real array filled with zeros
    pub fn zeros(name: impl Into<String>, dimensions: Vec<usize>) -> Result<Self> {
        let meta = ArrayMeta::new(name, dimensions)?;
        let real = vec![T::default(); meta.num_elements()];
        Ok(Self {
            meta,
            real,
            imag: None,
        })
    }

    /// Create a column-major `rows x (data.len() / rows)` array from a flat vector
    pub fn from_column_major(name: impl Into<String>, data: Vec<T>, rows: usize) -> Result<Self> {
        let name = name.into();
        if rows == 0 || data.len() % rows != 0 {
            return Err(Error::invalid_array(
                name,
                format!("{} values cannot be split into {} rows", data.len(), rows),
            ));
        }
        let cols = data.len() / rows;
        Self::new(name, vec![rows, cols], data)
    }

    /// Create a 2-D array from row slices (every row must have the same length)
    pub fn from_rows(name: impl Into<String>, rows: &[&[T]]) -> Result<Self> {
        let name = name.into();
        let m = rows.len();
        let n = rows.first().map_or(0, |r| r.len());
        if let Some(bad) = rows.iter().find(|r| r.len() != n) {
            return Err(Error::dimension_mismatch(name, n, bad.len()));
        }
        let mut data = Vec::with_capacity(m * n);
        for col in 0..n {
            for row in rows {
                data.push(row[col]);
            }
        }
        Self::new(name, vec![m, n], data)
    }

    pub(crate) fn from_parts(meta: ArrayMeta, real: Vec<T>, imag: Option<Vec<T>>) -> Self {
        Self { meta, real, imag }
    }

    pub fn meta(&self) -> &ArrayMeta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut ArrayMeta {
        &mut self.meta
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn dimensions(&self) -> &[usize] {
        self.meta.dimensions()
    }

    pub fn len(&self) -> usize {
        self.real.len()
    }

    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    pub fn is_complex(&self) -> bool {
        self.imag.is_some()
    }

    /// Mark the array as logical (meaningful for `u8` arrays)
    pub fn logical(mut self) -> Self {
        self.meta.set_logical(true);
        self
    }

    pub fn real(&self) -> &[T] {
        &self.real
    }

    pub fn real_mut(&mut self) -> &mut [T] {
        &mut self.real
    }

    pub fn imag(&self) -> Option<&[T]> {
        self.imag.as_deref()
    }

    pub fn imag_mut(&mut self) -> Option<&mut [T]> {
        self.imag.as_deref_mut()
    }

    /// Real value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        self.meta.index(row, col).map(|i| self.real[i])
    }

    /// Imaginary value at (row, col), None for real arrays
    pub fn get_imag(&self, row: usize, col: usize) -> Option<T> {
        let i = self.meta.index(row, col)?;
        self.imag.as_ref().map(|imag| imag[i])
    }

    /// Set the real value at (row, col); returns false when out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: T) -> bool {
        match self.meta.index(row, col) {
            Some(i) => {
                self.real[i] = value;
                true
            }
            None => false,
        }
    }

    /// Set the imaginary value at (row, col); returns false when out of bounds or real
    pub fn set_imag(&mut self, row: usize, col: usize, value: T) -> bool {
        match (self.meta.index(row, col), self.imag.as_mut()) {
            (Some(i), Some(imag)) => {
                imag[i] = value;
                true
            }
            _ => false,
        }
    }

    /// Consume into (metadata, real, imaginary)
    pub fn into_parts(self) -> (ArrayMeta, Vec<T>, Option<Vec<T>>) {
        (self.meta, self.real, self.imag)
    }
}

impl<T: Element> PartialEq for NumericArray<T> {
    fn eq(&self, other: &Self) -> bool {
        fn same_run<T: Element>(a: &[T], b: &[T]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same(*y))
        }
        self.meta == other.meta
            && same_run(&self.real, &other.real)
            && match (&self.imag, &other.imag) {
                (Some(a), Some(b)) => same_run(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl<T: Element> fmt::Display for NumericArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.meta.write_header(f, T::CLASS)?;
        for row in 0..self.meta.rows() {
            write!(f, "\t")?;
            for col in 0..self.meta.cols() {
                let i = row + col * self.meta.rows();
                write!(f, "{}", self.real[i])?;
                if let Some(imag) = &self.imag {
                    write!(f, "+{}i", imag[i])?;
                }
                write!(f, "\t")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
