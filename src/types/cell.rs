//! Cell arrays

use super::{Array, ArrayMeta, ClassCode};
use crate::error::{Error, Result};
use std::fmt;

/// Heterogeneous array whose every cell owns a nested array
///
/// Unset cells are `None` and are written as empty 0x0 doubles.
#[derive(Debug, Clone, PartialEq)]
pub struct CellArray {
    meta: ArrayMeta,
    cells: Vec<Option<Array>>,
}

impl CellArray {
    /// Create a cell array with every cell unset
    pub fn new(name: impl Into<String>, dimensions: Vec<usize>) -> Result<Self> {
        let meta = ArrayMeta::new(name, dimensions)?;
        let cells = vec![None; meta.num_elements()];
        Ok(Self { meta, cells })
    }

    /// Create a cell array from column-major cells
    pub fn from_cells(
        name: impl Into<String>,
        dimensions: Vec<usize>,
        cells: Vec<Option<Array>>,
    ) -> Result<Self> {
        let meta = ArrayMeta::new(name, dimensions)?;
        meta.check_len(cells.len())?;
        let cells = cells
            .into_iter()
            .map(|cell| cell.and_then(Array::into_slot))
            .collect();
        Ok(Self { meta, cells })
    }

    pub(crate) fn from_parts(meta: ArrayMeta, cells: Vec<Option<Array>>) -> Self {
        Self { meta, cells }
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
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at a linear (column-major) index
    pub fn get(&self, index: usize) -> Option<&Array> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Array> {
        self.cells.get_mut(index).and_then(Option::as_mut)
    }

    /// Cell at (row, col)
    pub fn get_at(&self, row: usize, col: usize) -> Option<&Array> {
        self.meta.index(row, col).and_then(|i| self.get(i))
    }

    /// Store an array into the cell at a linear index, returning the previous value
    ///
    /// An unnamed empty 0x0 double leaves the cell unset, as it reads back.
    pub fn set(&mut self, index: usize, value: impl Into<Array>) -> Result<Option<Array>> {
        let len = self.cells.len();
        let slot = self.cells.get_mut(index).ok_or_else(|| {
            Error::invalid_array(
                &self.meta.name,
                format!("cell index {} out of bounds for {} cells", index, len),
            )
        })?;
        Ok(std::mem::replace(slot, value.into().into_slot()))
    }

    /// Clear the cell at a linear index
    pub fn take(&mut self, index: usize) -> Option<Array> {
        self.cells.get_mut(index).and_then(Option::take)
    }

    /// All cells in column-major order
    pub fn cells(&self) -> &[Option<Array>] {
        &self.cells
    }
}

impl fmt::Display for CellArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.meta.write_header(f, ClassCode::Cell)?;
        for (i, cell) in self.cells.iter().enumerate() {
            match cell {
                Some(array) => {
                    let dims: Vec<String> =
                        array.dimensions().iter().map(|d| d.to_string()).collect();
                    writeln!(f, "\t{{{}}}: [{} {}]", i, dims.join("x"), array.class())?
                }
                None => writeln!(f, "\t{{{}}}: []", i)?,
            }
        }
        Ok(())
    }
}
