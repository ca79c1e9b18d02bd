//! Struct arrays (and MATLAB objects, which are struct arrays with a class name)

use super::{Array, ArrayMeta, ClassCode};
use crate::error::{Error, Result};
use std::fmt;

/// Longest field name the level 5 format can hold (field slots are at most 64 bytes)
pub const MAX_FIELD_NAME_LEN: usize = 63;

/// Struct array: every field holds one value slot per struct element
#[derive(Debug, Clone, PartialEq)]
pub struct StructArray {
    meta: ArrayMeta,
    class_name: Option<String>,
    fields: Vec<(String, Vec<Option<Array>>)>,
}

impl StructArray {
    /// Create a struct array without fields
    pub fn new(name: impl Into<String>, dimensions: Vec<usize>) -> Result<Self> {
        Ok(Self {
            meta: ArrayMeta::new(name, dimensions)?,
            class_name: None,
            fields: Vec::new(),
        })
    }

    /// Create an object of the given class without fields
    pub fn object(
        name: impl Into<String>,
        class_name: impl Into<String>,
        dimensions: Vec<usize>,
    ) -> Result<Self> {
        let mut s = Self::new(name, dimensions)?;
        s.class_name = Some(class_name.into());
        Ok(s)
    }

    pub(crate) fn from_parts(
        meta: ArrayMeta,
        class_name: Option<String>,
        fields: Vec<(String, Vec<Option<Array>>)>,
    ) -> Self {
        Self {
            meta,
            class_name,
            fields,
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

    /// Class name for objects, None for plain structs
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Number of struct elements (value slots per field)
    pub fn len(&self) -> usize {
        self.meta.num_elements()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Declare a field with every slot unset; declaring an existing field is a no-op
    pub fn add_field(&mut self, field: impl Into<String>) -> Result<()> {
        let field = field.into();
        if self.fields.iter().any(|(name, _)| *name == field) {
            return Ok(());
        }
        if field.is_empty() || field.len() > MAX_FIELD_NAME_LEN || field.contains('\0') {
            return Err(Error::invalid_array(
                &self.meta.name,
                format!("invalid field name {:?}", field),
            ));
        }
        let slots = vec![None; self.len()];
        self.fields.push((field, slots));
        Ok(())
    }

    /// Store a value under (field, index), declaring the field if needed
    ///
    /// An unnamed empty 0x0 double leaves the slot unset.
    pub fn set_field(
        &mut self,
        field: impl Into<String>,
        index: usize,
        value: impl Into<Array>,
    ) -> Result<Option<Array>> {
        let field = field.into();
        if index >= self.len() {
            return Err(Error::invalid_array(
                &self.meta.name,
                format!("struct index {} out of bounds for {} elements", index, self.len()),
            ));
        }
        self.add_field(field.as_str())?;
        let slots = self
            .fields
            .iter_mut()
            .find(|(name, _)| *name == field)
            .map(|(_, slots)| slots)
            .ok_or_else(|| Error::invalid_array(&field, "field vanished"))?;
        Ok(std::mem::replace(&mut slots[index], value.into().into_slot()))
    }

    /// Value of a field at a struct element index
    pub fn get_field(&self, field: &str, index: usize) -> Option<&Array> {
        self.field(field)?.get(index)?.as_ref()
    }

    pub fn get_field_mut(&mut self, field: &str, index: usize) -> Option<&mut Array> {
        self.fields
            .iter_mut()
            .find(|(name, _)| name == field)?
            .1
            .get_mut(index)?
            .as_mut()
    }

    /// All slots of a field
    pub fn field(&self, field: &str) -> Option<&[Option<Array>]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, slots)| slots.as_slice())
    }

    /// Every field with its slots, in declaration order
    pub fn fields(&self) -> &[(String, Vec<Option<Array>>)] {
        &self.fields
    }

    /// Remove a field and return its slots
    pub fn remove_field(&mut self, field: &str) -> Option<Vec<Option<Array>>> {
        let pos = self.fields.iter().position(|(name, _)| name == field)?;
        Some(self.fields.remove(pos).1)
    }
}

impl fmt::Display for StructArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = if self.class_name.is_some() {
            ClassCode::Object
        } else {
            ClassCode::Struct
        };
        self.meta.write_header(f, class)?;
        if let Some(class_name) = &self.class_name {
            writeln!(f, "\tclass: {}", class_name)?;
        }
        for (name, slots) in &self.fields {
            let set = slots.iter().filter(|s| s.is_some()).count();
            writeln!(f, "\t{}: {}/{} set", name, set, slots.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CharArray, NumericArray};

    #[test]
    fn set_and_get_fields() {
        let mut s = StructArray::new("str", vec![1, 1]).unwrap();
        s.set_field("f1", 0, NumericArray::new("", vec![1, 1], vec![3.1415f64]).unwrap())
            .unwrap();
        s.set_field("f2", 0, CharArray::from_text("", "hi")).unwrap();

        assert_eq!(s.field_count(), 2);
        assert_eq!(s.field_names().collect::<Vec<_>>(), vec!["f1", "f2"]);
        assert_eq!(s.get_field("f1", 0).unwrap().as_double().unwrap().real(), &[3.1415]);
        assert_eq!(s.get_field("f2", 0).unwrap().as_char().unwrap().row(0).unwrap(), "hi");
        assert!(s.get_field("f3", 0).is_none());
    }

    #[test]
    fn struct_array_slots() {
        let mut s = StructArray::new("sa", vec![1, 3]).unwrap();
        s.add_field("x").unwrap();
        s.set_field("x", 2, CharArray::from_text("", "last")).unwrap();
        let slots = s.field("x").unwrap();
        assert_eq!(slots.len(), 3);
        assert!(slots[0].is_none());
        assert!(slots[2].is_some());
    }

    #[test]
    fn empty_double_leaves_slot_unset() {
        let mut s = StructArray::new("s", vec![1, 1]).unwrap();
        s.set_field("x", 0, NumericArray::<f64>::zeros("", vec![0, 0]).unwrap())
            .unwrap();
        assert_eq!(s.field_count(), 1);
        assert!(s.get_field("x", 0).is_none());

        // a named empty double is a real value
        s.set_field("y", 0, NumericArray::<f64>::zeros("kept", vec![0, 0]).unwrap())
            .unwrap();
        assert!(s.get_field("y", 0).is_some());
    }

    #[test]
    fn index_out_of_bounds() {
        let mut s = StructArray::new("s", vec![1, 1]).unwrap();
        let result = s.set_field("x", 1, CharArray::from_text("", "x"));
        assert!(result.is_err());
        assert_eq!(s.field_count(), 0);
    }

    #[test]
    fn invalid_field_names() {
        let mut s = StructArray::new("s", vec![1, 1]).unwrap();
        assert!(s.add_field("").is_err());
        assert!(s.add_field("a".repeat(64)).is_err());
        assert!(s.add_field("a".repeat(63)).is_ok());
    }

    #[test]
    fn duplicate_field_is_noop() {
        let mut s = StructArray::new("s", vec![1, 1]).unwrap();
        s.set_field("x", 0, CharArray::from_text("", "keep")).unwrap();
        s.add_field("x").unwrap();
        assert_eq!(s.field_count(), 1);
        assert!(s.get_field("x", 0).is_some());
    }

    #[test]
    fn remove_field() {
        let mut s = StructArray::new("s", vec![1, 1]).unwrap();
        s.add_field("a").unwrap();
        s.add_field("b").unwrap();
        assert!(s.remove_field("a").is_some());
        assert_eq!(s.field_names().collect::<Vec<_>>(), vec!["b"]);
    }
}
