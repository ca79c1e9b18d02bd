//! Decoded file contents

use super::{Array, Header};
use std::collections::HashMap;
use std::fmt;

/// Header plus the named arrays of a MAT-file
///
/// Arrays are keyed by name. When a file holds two arrays with the same
/// name the later one wins, but it keeps the position of the first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatFile {
    header: Header,
    arrays: HashMap<String, Array>,
    order: Vec<String>,
}

impl MatFile {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            arrays: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Insert an array under its own name, returning any array it replaced
    pub fn insert(&mut self, array: Array) -> Option<Array> {
        let name = array.name().to_string();
        let previous = self.arrays.insert(name.clone(), array);
        if previous.is_none() {
            self.order.push(name);
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&Array> {
        self.arrays.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Array> {
        self.arrays.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Array> {
        let array = self.arrays.remove(name)?;
        self.order.retain(|n| n != name);
        Some(array)
    }

    /// Array names in file order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Arrays in file order
    pub fn iter(&self) -> impl Iterator<Item = &Array> {
        self.order.iter().filter_map(|name| self.arrays.get(name))
    }

    /// Consume into arrays in file order
    pub fn into_arrays(mut self) -> Vec<Array> {
        self.order
            .iter()
            .filter_map(|name| self.arrays.remove(name))
            .collect()
    }
}

impl fmt::Display for MatFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header.description)?;
        for array in self.iter() {
            write!(f, "{}", array)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CharArray, NumericArray};

    #[test]
    fn later_duplicate_wins() {
        let mut file = MatFile::default();
        file.insert(CharArray::from_text("a", "first").into());
        file.insert(NumericArray::new("b", vec![1, 1], vec![1.0f64]).unwrap().into());
        let replaced = file.insert(CharArray::from_text("a", "second").into());

        assert!(replaced.is_some());
        assert_eq!(file.len(), 2);
        assert_eq!(file.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(file.get("a").unwrap().as_char().unwrap().row(0).unwrap(), "second");
    }

    #[test]
    fn remove_and_into_arrays() {
        let mut file = MatFile::default();
        file.insert(CharArray::from_text("x", "1").into());
        file.insert(CharArray::from_text("y", "2").into());
        file.insert(CharArray::from_text("z", "3").into());

        assert!(file.remove("y").is_some());
        assert!(!file.contains("y"));
        let names: Vec<String> = file
            .into_arrays()
            .iter()
            .map(|a| a.name().to_string())
            .collect();
        assert_eq!(names, vec!["x", "z"]);
    }
}
