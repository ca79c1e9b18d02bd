//! Sparse (compressed sparse column) arrays

use super::{ArrayMeta, ClassCode, Element};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Two-dimensional sparse array of doubles in CSC layout
///
/// The values of column `c` are `real[column_pointers[c]..column_pointers[c + 1]]`
/// and their rows are the matching entries of `row_indices`.
#[derive(Debug, Clone)]
pub struct SparseArray {
    meta: ArrayMeta,
    nzmax: usize,
    column_pointers: Vec<usize>,
    row_indices: Vec<usize>,
    real: Vec<f64>,
    imag: Option<Vec<f64>>,
}

impl SparseArray {
    /// Create an all-zero sparse array
    pub fn new(name: impl Into<String>, rows: usize, cols: usize) -> Result<Self> {
        let meta = ArrayMeta::new(name, vec![rows, cols])?;
        let pointers = pointer_count(&meta.name, cols)?;
        Ok(Self {
            meta,
            nzmax: 0,
            column_pointers: vec![0; pointers],
            row_indices: Vec::new(),
            real: Vec::new(),
            imag: None,
        })
    }

    /// Create from raw CSC parts, validating their consistency
    pub fn from_csc(
        name: impl Into<String>,
        rows: usize,
        cols: usize,
        column_pointers: Vec<usize>,
        row_indices: Vec<usize>,
        real: Vec<f64>,
        imag: Option<Vec<f64>>,
    ) -> Result<Self> {
        let mut meta = ArrayMeta::new(name, vec![rows, cols])?;
        validate_csc(&meta, &column_pointers, &row_indices)?;
        let nnz = row_indices.len();
        if real.len() != nnz {
            return Err(Error::dimension_mismatch(&meta.name, nnz, real.len()));
        }
        if let Some(imag) = &imag {
            if imag.len() != nnz {
                return Err(Error::dimension_mismatch(&meta.name, nnz, imag.len()));
            }
            meta.set_complex(true);
        }
        Ok(Self {
            meta,
            nzmax: nnz,
            column_pointers,
            row_indices,
            real,
            imag,
        })
    }

    /// Create from (row, col, value) triplets; a repeated position keeps the last value
    pub fn from_triplets(
        name: impl Into<String>,
        rows: usize,
        cols: usize,
        triplets: &[(usize, usize, f64)],
    ) -> Result<Self> {
        let entries = triplets.iter().map(|&(r, c, v)| (r, c, v, 0.0));
        Self::build(name.into(), rows, cols, entries, false)
    }

    /// Create a complex sparse array from (row, col, real, imag) entries
    pub fn from_triplets_complex(
        name: impl Into<String>,
        rows: usize,
        cols: usize,
        entries: &[(usize, usize, f64, f64)],
    ) -> Result<Self> {
        Self::build(name.into(), rows, cols, entries.iter().copied(), true)
    }

    fn build(
        name: String,
        rows: usize,
        cols: usize,
        entries: impl Iterator<Item = (usize, usize, f64, f64)>,
        complex: bool,
    ) -> Result<Self> {
        // Keyed by (col, row) so iteration is already in CSC order
        let mut sorted = BTreeMap::new();
        for (row, col, re, im) in entries {
            if row >= rows || col >= cols {
                return Err(Error::invalid_array(
                    name,
                    format!("entry ({}, {}) outside {}x{}", row, col, rows, cols),
                ));
            }
            sorted.insert((col, row), (re, im));
        }

        let mut column_pointers = vec![0; pointer_count(&name, cols)?];
        let mut row_indices = Vec::with_capacity(sorted.len());
        let mut real = Vec::with_capacity(sorted.len());
        let mut imag = Vec::with_capacity(if complex { sorted.len() } else { 0 });
        for (&(col, row), &(re, im)) in &sorted {
            column_pointers[col + 1] += 1;
            row_indices.push(row);
            real.push(re);
            if complex {
                imag.push(im);
            }
        }
        for c in 0..cols {
            column_pointers[c + 1] += column_pointers[c];
        }

        Self::from_csc(
            name,
            rows,
            cols,
            column_pointers,
            row_indices,
            real,
            complex.then_some(imag),
        )
    }

    pub(crate) fn from_parts(
        meta: ArrayMeta,
        nzmax: usize,
        column_pointers: Vec<usize>,
        row_indices: Vec<usize>,
        real: Vec<f64>,
        imag: Option<Vec<f64>>,
    ) -> Self {
        Self {
            meta,
            nzmax,
            column_pointers,
            row_indices,
            real,
            imag,
        }
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

    pub fn rows(&self) -> usize {
        self.meta.rows()
    }

    pub fn cols(&self) -> usize {
        self.meta.cols()
    }

    /// Number of stored values
    pub fn nnz(&self) -> usize {
        self.row_indices.len()
    }

    /// Declared storage capacity, never less than `nnz`
    pub fn nzmax(&self) -> usize {
        self.nzmax.max(self.nnz())
    }

    pub fn set_nzmax(&mut self, nzmax: usize) {
        self.nzmax = nzmax;
    }

    pub fn is_complex(&self) -> bool {
        self.imag.is_some()
    }

    pub fn column_pointers(&self) -> &[usize] {
        &self.column_pointers
    }

    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    pub fn real(&self) -> &[f64] {
        &self.real
    }

    pub fn real_mut(&mut self) -> &mut [f64] {
        &mut self.real
    }

    pub fn imag(&self) -> Option<&[f64]> {
        self.imag.as_deref()
    }

    pub fn imag_mut(&mut self) -> Option<&mut [f64]> {
        self.imag.as_deref_mut()
    }

    fn position(&self, row: usize, col: usize) -> Option<usize> {
        let start = self.column_pointers[col];
        let end = self.column_pointers[col + 1];
        self.row_indices[start..end]
            .iter()
            .position(|&r| r == row)
            .map(|i| start + i)
    }

    /// Real value at (row, col); zero when not stored, None when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.meta.index(row, col)?;
        Some(self.position(row, col).map_or(0.0, |i| self.real[i]))
    }

    /// Imaginary value at (row, col); None for real arrays or when out of bounds
    pub fn get_imag(&self, row: usize, col: usize) -> Option<f64> {
        self.meta.index(row, col)?;
        let imag = self.imag.as_ref()?;
        Some(self.position(row, col).map_or(0.0, |i| imag[i]))
    }

    /// Stored entries as `(row, col, real, imag)` in column-major order
    pub fn iter(&self) -> SparseIter<'_> {
        SparseIter {
            array: self,
            index: 0,
            col: 0,
        }
    }
}

/// Length of the column pointer array for `cols` columns
fn pointer_count(name: &str, cols: usize) -> Result<usize> {
    cols.checked_add(1)
        .ok_or_else(|| Error::invalid_array(name, format!("{} columns is too many", cols)))
}

/// Check CSC structure: pointer count, monotonicity, and row bounds
fn validate_csc(
    meta: &ArrayMeta,
    column_pointers: &[usize],
    row_indices: &[usize],
) -> Result<()> {
    let cols = meta.cols();
    if column_pointers.len().checked_sub(1) != Some(cols) {
        return Err(Error::dimension_mismatch(
            &meta.name,
            cols.saturating_add(1),
            column_pointers.len(),
        ));
    }
    if column_pointers[0] != 0 {
        return Err(Error::invalid_array(
            &meta.name,
            "first column pointer must be 0",
        ));
    }
    if let Some(c) = column_pointers.windows(2).position(|w| w[1] < w[0]) {
        return Err(Error::invalid_array(
            &meta.name,
            format!("column pointers decrease at column {}", c),
        ));
    }
    if column_pointers[cols] != row_indices.len() {
        return Err(Error::dimension_mismatch(
            &meta.name,
            column_pointers[cols],
            row_indices.len(),
        ));
    }
    if let Some(&row) = row_indices.iter().find(|&&r| r >= meta.rows()) {
        return Err(Error::invalid_array(
            &meta.name,
            format!("row index {} outside {} rows", row, meta.rows()),
        ));
    }
    Ok(())
}

/// Iterator over stored sparse entries, advancing columns in lock-step
pub struct SparseIter<'a> {
    array: &'a SparseArray,
    index: usize,
    col: usize,
}

impl Iterator for SparseIter<'_> {
    type Item = (usize, usize, f64, Option<f64>);

    fn next(&mut self) -> Option<Self::Item> {
        let array = self.array;
        if self.index >= array.nnz() {
            return None;
        }
        while self.index >= array.column_pointers[self.col + 1] {
            self.col += 1;
        }
        let i = self.index;
        self.index += 1;
        Some((
            array.row_indices[i],
            self.col,
            array.real[i],
            array.imag.as_ref().map(|imag| imag[i]),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.array.nnz() - self.index;
        (left, Some(left))
    }
}

impl PartialEq for SparseArray {
    fn eq(&self, other: &Self) -> bool {
        fn same_run(a: &[f64], b: &[f64]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same(*y))
        }
        self.meta == other.meta
            && self.nzmax() == other.nzmax()
            && self.column_pointers == other.column_pointers
            && self.row_indices == other.row_indices
            && same_run(&self.real, &other.real)
            && match (&self.imag, &other.imag) {
                (Some(a), Some(b)) => same_run(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl fmt::Display for SparseArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.meta.write_header(f, ClassCode::Sparse)?;
        for (row, col, re, im) in self.iter() {
            match im {
                Some(im) => writeln!(f, "\t({},{})\t{}+{}i", row + 1, col + 1, re, im)?,
                None => writeln!(f, "\t({},{})\t{}", row + 1, col + 1, re)?,
            }
        }
        Ok(())
    }
}
