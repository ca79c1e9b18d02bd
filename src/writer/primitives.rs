//! Encoding runs of primitive values

use super::tag::write_element;
use crate::error::{Error, Result};
use crate::types::{ByteOrder, DataType, Element};

pub fn put_u32(out: &mut Vec<u8>, value: u32, order: ByteOrder) {
    value.write(order, out);
}

/// Write a run of values as an element of their native type
pub fn write_values<T: Element>(out: &mut Vec<u8>, values: &[T], order: ByteOrder) -> Result<()> {
    let mut payload = Vec::with_capacity(values.len() * T::SIZE);
    for &value in values {
        value.write(order, &mut payload);
    }
    write_element(out, T::DATA_TYPE, &payload, order)
}

/// Write counts or indices as an `miINT32` run
pub fn write_indices(
    out: &mut Vec<u8>,
    name: &str,
    values: &[usize],
    order: ByteOrder,
) -> Result<()> {
    let values = values
        .iter()
        .map(|&v| {
            i32::try_from(v).map_err(|_| {
                Error::invalid_array(name, format!("{} does not fit in 32 bits", v))
            })
        })
        .collect::<Result<Vec<i32>>>()?;
    write_values(out, &values, order)
}

/// Write a name as an `miINT8` run
pub fn write_name(out: &mut Vec<u8>, name: &str, order: ByteOrder) -> Result<()> {
    write_element(out, DataType::Int8, name.as_bytes(), order)
}
