//! Character arrays

use super::{ArrayMeta, ClassCode};
use crate::error::{Error, Result};
use std::fmt;

/// Character array of UTF-16 code units stored column-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharArray {
    meta: ArrayMeta,
    chars: Vec<u16>,
}

impl CharArray {
    pub fn new(name: impl Into<String>, dimensions: Vec<usize>, chars: Vec<u16>) -> Result<Self> {
        let meta = ArrayMeta::new(name, dimensions)?;
        meta.check_len(chars.len())?;
        Ok(Self { meta, chars })
    }

    /// Create a 1xN character row from text
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let chars: Vec<u16> = text.encode_utf16().collect();
        Self {
            meta: ArrayMeta::row_vector(name, chars.len()),
            chars,
        }
    }

    /// Create a multi-row character matrix; every row must have the same length
    pub fn from_rows(name: impl Into<String>, rows: &[&str]) -> Result<Self> {
        let name = name.into();
        let encoded: Vec<Vec<u16>> = rows.iter().map(|r| r.encode_utf16().collect()).collect();
        let n = encoded.first().map_or(0, |r| r.len());
        if let Some(bad) = encoded.iter().find(|r| r.len() != n) {
            return Err(Error::dimension_mismatch(name, n, bad.len()));
        }
        let mut chars = Vec::with_capacity(rows.len() * n);
        for col in 0..n {
            for row in &encoded {
                chars.push(row[col]);
            }
        }
        Self::new(name, vec![rows.len(), n], chars)
    }

    pub(crate) fn from_parts(meta: ArrayMeta, chars: Vec<u16>) -> Self {
        Self { meta, chars }
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

    /// All code units in column-major order
    pub fn chars(&self) -> &[u16] {
        &self.chars
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u16> {
        self.meta.index(row, col).map(|i| self.chars[i])
    }

    /// Set the code unit at (row, col); returns false when out of bounds
    pub fn set(&mut self, row: usize, col: usize, unit: u16) -> bool {
        match self.meta.index(row, col) {
            Some(i) => {
                self.chars[i] = unit;
                true
            }
            None => false,
        }
    }

    /// Row `m` as a string
    pub fn row(&self, m: usize) -> Option<String> {
        if m >= self.meta.rows() {
            return None;
        }
        let units: Vec<u16> = (0..self.meta.cols())
            .map(|n| self.chars[m + n * self.meta.rows()])
            .collect();
        Some(String::from_utf16_lossy(&units))
    }

    /// Every row as a string
    pub fn rows(&self) -> Vec<String> {
        (0..self.meta.rows()).filter_map(|m| self.row(m)).collect()
    }
}

impl fmt::Display for CharArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.meta.write_header(f, ClassCode::Char)?;
        for row in self.rows() {
            writeln!(f, "\t'{}'", row)?;
        }
        Ok(())
    }
}
