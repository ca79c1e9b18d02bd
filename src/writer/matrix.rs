//! Encoding arrays as matrix elements

use super::primitives::{put_u32, write_indices, write_name, write_values};
use super::tag::{padding, write_element, write_tag};
use crate::error::{Error, Result};
use crate::types::{
    Array, ByteOrder, CellArray, DataType, Element, MAX_FIELD_NAME_LEN, NumericArray,
    SparseArray, StructArray,
};

/// Write a complete matrix element for `array`
pub fn write_matrix(out: &mut Vec<u8>, array: &Array, order: ByteOrder) -> Result<()> {
    let body = encode_matrix(array, order)?;
    write_tag(out, DataType::Matrix, body.len(), order)?;
    out.extend_from_slice(&body);
    out.resize(out.len() + padding(body.len()), 0);
    Ok(())
}

/// Write an unset cell or field slot
fn write_slot(out: &mut Vec<u8>, slot: Option<&Array>, order: ByteOrder) -> Result<()> {
    match slot {
        Some(array) => write_matrix(out, array, order),
        None => {
            let placeholder: Array = NumericArray::<f64>::zeros("", vec![0, 0])?.into();
            write_matrix(out, &placeholder, order)
        }
    }
}

fn encode_matrix(array: &Array, order: ByteOrder) -> Result<Vec<u8>> {
    let meta = array.meta();
    let mut flags = meta.flags();
    flags.complex = match array {
        Array::Double(a) => a.is_complex(),
        Array::Single(a) => a.is_complex(),
        Array::Int8(a) => a.is_complex(),
        Array::UInt8(a) => a.is_complex(),
        Array::Int16(a) => a.is_complex(),
        Array::UInt16(a) => a.is_complex(),
        Array::Int32(a) => a.is_complex(),
        Array::UInt32(a) => a.is_complex(),
        Array::Int64(a) => a.is_complex(),
        Array::UInt64(a) => a.is_complex(),
        Array::Sparse(a) => a.is_complex(),
        Array::Char(_) | Array::Cell(_) | Array::Struct(_) => false,
    };
    let nzmax = match array {
        Array::Sparse(s) => s.nzmax(),
        _ => 0,
    };
    let nzmax = u32::try_from(nzmax)
        .map_err(|_| Error::invalid_array(&meta.name, "nzmax does not fit in 32 bits"))?;

    let mut body = Vec::new();
    let mut flag_words = Vec::with_capacity(8);
    put_u32(&mut flag_words, array.class() as u32 | flags.bits(), order);
    put_u32(&mut flag_words, nzmax, order);
    write_element(&mut body, DataType::UInt32, &flag_words, order)?;
    write_indices(&mut body, &meta.name, meta.dimensions(), order)?;
    write_name(&mut body, &meta.name, order)?;

    match array {
        Array::Double(a) => write_numeric(&mut body, a, order)?,
        Array::Single(a) => write_numeric(&mut body, a, order)?,
        Array::Int8(a) => write_numeric(&mut body, a, order)?,
        Array::UInt8(a) => write_numeric(&mut body, a, order)?,
        Array::Int16(a) => write_numeric(&mut body, a, order)?,
        Array::UInt16(a) => write_numeric(&mut body, a, order)?,
        Array::Int32(a) => write_numeric(&mut body, a, order)?,
        Array::UInt32(a) => write_numeric(&mut body, a, order)?,
        Array::Int64(a) => write_numeric(&mut body, a, order)?,
        Array::UInt64(a) => write_numeric(&mut body, a, order)?,
        Array::Char(c) => write_values(&mut body, c.chars(), order)?,
        Array::Cell(c) => write_cell(&mut body, c, order)?,
        Array::Struct(s) => write_struct(&mut body, s, order)?,
        Array::Sparse(s) => write_sparse(&mut body, s, order)?,
    }
    Ok(body)
}

fn write_numeric<T: Element>(
    out: &mut Vec<u8>,
    array: &NumericArray<T>,
    order: ByteOrder,
) -> Result<()> {
    write_values(out, array.real(), order)?;
    if let Some(imag) = array.imag() {
        write_values(out, imag, order)?;
    }
    Ok(())
}

fn write_cell(out: &mut Vec<u8>, cell: &CellArray, order: ByteOrder) -> Result<()> {
    for slot in cell.cells() {
        write_slot(out, slot.as_ref(), order)?;
    }
    Ok(())
}

fn write_struct(out: &mut Vec<u8>, array: &StructArray, order: ByteOrder) -> Result<()> {
    if let Some(class_name) = array.class_name() {
        write_name(out, class_name, order)?;
    }

    let fields = array.fields();
    if let Some((name, _)) = fields.iter().find(|(n, _)| n.len() > MAX_FIELD_NAME_LEN) {
        return Err(Error::invalid_array(
            array.name(),
            format!(
                "field name {:?} is longer than {} bytes",
                name, MAX_FIELD_NAME_LEN
            ),
        ));
    }
    let name_len = fields.iter().map(|(n, _)| n.len()).max().unwrap_or(0) + 1;
    write_values(out, &[name_len as i32], order)?;

    let mut names = vec![0u8; name_len * fields.len()];
    for (slot, (name, _)) in names.chunks_exact_mut(name_len).zip(fields) {
        slot[..name.len()].copy_from_slice(name.as_bytes());
    }
    write_element(out, DataType::Int8, &names, order)?;

    for index in 0..array.len() {
        for (_, slots) in fields {
            write_slot(out, slots.get(index).and_then(Option::as_ref), order)?;
        }
    }
    Ok(())
}

fn write_sparse(out: &mut Vec<u8>, array: &SparseArray, order: ByteOrder) -> Result<()> {
    let name = array.name();
    write_indices(out, name, array.row_indices(), order)?;
    write_indices(out, name, array.column_pointers(), order)?;
    write_values(out, array.real(), order)?;
    if let Some(imag) = array.imag() {
        write_values(out, imag, order)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ReadOptions;
    use crate::parser::{ByteCursor, parse_element};
    use crate::types::{CharArray, ClassCode};

    fn roundtrip(array: &Array, order: ByteOrder) -> Array {
        let mut out = Vec::new();
        write_matrix(&mut out, array, order).unwrap();
        assert_eq!(out.len() % 8, 0);
        let (tag, payload, rest) = parse_element(ByteCursor::new(&out, order)).unwrap();
        assert_eq!(tag.data_type, DataType::Matrix);
        assert!(!tag.packed);
        assert!(rest.eos());
        crate::parser::parse_matrix(payload, &ReadOptions::default())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn flags_word_carries_class_and_attributes() {
        let array: Array = NumericArray::new("l", vec![1, 2], vec![1u8, 0])
            .unwrap()
            .logical()
            .into();
        let mut out = Vec::new();
        write_matrix(&mut out, &array, ByteOrder::Little).unwrap();
        // matrix tag, then flags element tag, then the flags word
        let word = u32::from_le_bytes([out[16], out[17], out[18], out[19]]);
        assert_eq!(word, ClassCode::UInt8 as u32 | 0x0200);
    }

    #[test]
    fn field_name_length_is_longest_plus_one() {
        let mut s = StructArray::new("s", vec![1, 1]).unwrap();
        s.add_field("abc").unwrap();
        s.add_field("z").unwrap();
        let array: Array = s.into();

        let decoded = roundtrip(&array, ByteOrder::Little);
        assert_eq!(decoded, array);

        let mut out = Vec::new();
        write_matrix(&mut out, &array, ByteOrder::Little).unwrap();
        // matrix tag 8, flags 16, dims 16, name packed 8, then field name length (packed)
        let len = u32::from_le_bytes([out[52], out[53], out[54], out[55]]);
        assert_eq!(len, 4);
    }

    #[test]
    fn unset_slots_written_as_placeholders() {
        let mut cell = CellArray::new("cl", vec![1, 3]).unwrap();
        cell.set(1, CharArray::from_text("", "mid")).unwrap();
        let array: Array = cell.into();
        assert_eq!(roundtrip(&array, ByteOrder::Big), array);
    }

    #[test]
    fn explicit_empty_double_slots_roundtrip() {
        let empty = || NumericArray::<f64>::zeros("", vec![0, 0]).unwrap();
        let mut cell = CellArray::new("cl", vec![1, 2]).unwrap();
        cell.set(0, empty()).unwrap();
        cell.set(1, CharArray::from_text("", "b")).unwrap();
        let array: Array = cell.into();
        assert_eq!(roundtrip(&array, ByteOrder::Little), array);

        let mut s = StructArray::new("s", vec![1, 1]).unwrap();
        s.set_field("f", 0, empty()).unwrap();
        let array: Array = s.into();
        assert_eq!(roundtrip(&array, ByteOrder::Big), array);
    }

    #[test]
    fn empty_struct_has_min_field_name_length() {
        let array: Array = StructArray::new("e", vec![0, 0]).unwrap().into();
        assert_eq!(roundtrip(&array, ByteOrder::Little), array);
    }

    #[test]
    fn complex_sparse_roundtrip() {
        let sparse =
            SparseArray::from_triplets_complex("sp", 4, 3, &[(3, 0, 1.0, 2.0), (0, 2, -1.0, 0.5)])
                .unwrap();
        let array: Array = sparse.into();
        assert_eq!(roundtrip(&array, ByteOrder::Big), array);
    }
}
