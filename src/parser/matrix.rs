//! Recursive decoding of matrix elements

use super::cursor::ByteCursor;
use super::primitives::{decode_chars, decode_name, decode_run, decode_values};
use super::tag::{Tag, parse_element};
use crate::error::{Error, Result};
use crate::options::ReadOptions;
use crate::types::{
    Array, ArrayFlags, ArrayMeta, CellArray, CharArray, ClassCode, DataType, Element,
    NumericArray, SparseArray, StructArray,
};
use log::{debug, trace, warn};

/// Everything before the class-specific body of a matrix
#[derive(Debug)]
struct MatrixHeader {
    class_code: u8,
    flags: ArrayFlags,
    nzmax: usize,
    dimensions: Vec<usize>,
    name: String,
    offset: usize,
}

/// Decode a top-level matrix
///
/// Returns None when the filter rejects the array; its body is then never
/// looked at.
pub fn parse_matrix(payload: ByteCursor<'_>, options: &ReadOptions) -> Result<Option<Array>> {
    if payload.eos() {
        warn!("empty matrix element at offset {}", payload.offset());
        return Ok(None);
    }
    let (header, cursor) = parse_header(payload)?;
    if !options.matches(&header.name) {
        debug!("skipping filtered array '{}'", header.name);
        return Ok(None);
    }
    let array = parse_body(header, cursor)?;
    debug!(
        "decoded '{}': {} {:?}",
        array.name(),
        array.class(),
        array.dimensions()
    );
    Ok(Some(array))
}

/// Decode a matrix nested in a cell or struct; empty placeholders become None
fn parse_nested(payload: ByteCursor<'_>) -> Result<Option<Array>> {
    if payload.eos() {
        return Ok(None);
    }
    let (header, cursor) = parse_header(payload)?;
    let array = parse_body(header, cursor)?;
    Ok(array.into_slot())
}

/// Read the next sub-element and require it to be a matrix
fn next_matrix(cursor: ByteCursor<'_>) -> Result<(Option<Array>, ByteCursor<'_>)> {
    let offset = cursor.offset();
    let (tag, payload, cursor) = parse_element(cursor)?;
    if tag.data_type != DataType::Matrix {
        return Err(Error::format(
            offset,
            format!("expected nested matrix, found {:?}", tag.data_type),
        ));
    }
    Ok((parse_nested(payload)?, cursor))
}

/// Read a sub-element holding non-negative integers (dimensions, indices)
fn parse_indices(cursor: ByteCursor<'_>) -> Result<(Vec<usize>, ByteCursor<'_>)> {
    let (tag, payload, cursor) = parse_element(cursor)?;
    let values: Vec<i64> = decode_values(&tag, payload)?;
    let indices = values
        .into_iter()
        .map(|v| {
            usize::try_from(v)
                .map_err(|_| Error::format(payload.offset(), format!("negative index {}", v)))
        })
        .collect::<Result<Vec<usize>>>()?;
    Ok((indices, cursor))
}

fn parse_header(payload: ByteCursor<'_>) -> Result<(MatrixHeader, ByteCursor<'_>)> {
    let offset = payload.offset();

    let (tag, flags_payload, cursor) = parse_element(payload)?;
    let words: Vec<u32> = decode_values(&tag, flags_payload)?;
    let [attributes, nzmax] = words[..] else {
        return Err(Error::format(
            offset,
            format!("array flags hold {} words, expected 2", words.len()),
        ));
    };

    let dims_offset = cursor.offset();
    let (dimensions, cursor) = parse_indices(cursor)?;
    if dimensions.len() < 2 {
        return Err(Error::format(
            dims_offset,
            format!("array rank must be at least 2, got {}", dimensions.len()),
        ));
    }

    let (tag, name_payload, cursor) = parse_element(cursor)?;
    let name = decode_name(&tag, name_payload)?;

    let header = MatrixHeader {
        class_code: (attributes & 0xFF) as u8,
        flags: ArrayFlags::from_bits(attributes),
        nzmax: nzmax as usize,
        dimensions,
        name,
        offset,
    };
    trace!("matrix header {:?}", header);
    Ok((header, cursor))
}

fn parse_body(header: MatrixHeader, cursor: ByteCursor<'_>) -> Result<Array> {
    let class = ClassCode::from_u8(header.class_code).ok_or(Error::UnsupportedClass {
        code: header.class_code,
    })?;
    let offset = header.offset;
    let nzmax = header.nzmax;
    let meta = ArrayMeta::new(header.name, header.dimensions)
        .map_err(|e| Error::format(offset, e.to_string()))?
        .with_flags(header.flags);

    let (array, cursor) = match class {
        ClassCode::Double => parse_numeric::<f64>(meta, cursor)?,
        ClassCode::Single => parse_numeric::<f32>(meta, cursor)?,
        ClassCode::Int8 => parse_numeric::<i8>(meta, cursor)?,
        ClassCode::UInt8 => parse_numeric::<u8>(meta, cursor)?,
        ClassCode::Int16 => parse_numeric::<i16>(meta, cursor)?,
        ClassCode::UInt16 => parse_numeric::<u16>(meta, cursor)?,
        ClassCode::Int32 => parse_numeric::<i32>(meta, cursor)?,
        ClassCode::UInt32 => parse_numeric::<u32>(meta, cursor)?,
        ClassCode::Int64 => parse_numeric::<i64>(meta, cursor)?,
        ClassCode::UInt64 => parse_numeric::<u64>(meta, cursor)?,
        ClassCode::Char => parse_char(meta, cursor)?,
        ClassCode::Cell => parse_cell(meta, cursor)?,
        ClassCode::Struct => parse_struct(meta, None, cursor)?,
        ClassCode::Object => {
            let (tag, payload, cursor) = parse_element(cursor)?;
            let class_name = decode_name(&tag, payload)?;
            parse_struct(meta, Some(class_name), cursor)?
        }
        ClassCode::Sparse => parse_sparse(meta, nzmax, cursor)?,
    };

    if !cursor.eos() {
        trace!(
            "{} unread bytes after '{}'",
            cursor.remaining(),
            array.name()
        );
    }
    Ok(array)
}

fn parse_numeric<T: Element>(
    meta: ArrayMeta,
    cursor: ByteCursor<'_>,
) -> Result<(Array, ByteCursor<'_>)> {
    let count = meta.num_elements();
    let (tag, payload, cursor) = parse_element(cursor)?;
    let real = decode_run::<T>(&tag, payload, count)?;
    let (imag, cursor) = if meta.is_complex() {
        let (tag, payload, cursor) = parse_element(cursor)?;
        (Some(decode_run::<T>(&tag, payload, count)?), cursor)
    } else {
        (None, cursor)
    };
    Ok((NumericArray::from_parts(meta, real, imag).into(), cursor))
}

fn parse_char(meta: ArrayMeta, cursor: ByteCursor<'_>) -> Result<(Array, ByteCursor<'_>)> {
    let (tag, payload, cursor) = parse_element(cursor)?;
    let chars = decode_chars(&tag, payload, meta.num_elements())?;
    Ok((CharArray::from_parts(meta, chars).into(), cursor))
}

/// Smallest encoding of a nested matrix: a bare tag
const MIN_MATRIX_LEN: usize = 8;

/// Fail early when `count` nested matrices cannot fit in what is left
fn check_nested_count(cursor: &ByteCursor<'_>, count: usize) -> Result<()> {
    let needed = count.saturating_mul(MIN_MATRIX_LEN);
    if needed > cursor.remaining() {
        return Err(Error::truncated(cursor.offset(), needed, cursor.remaining()));
    }
    Ok(())
}

fn parse_cell(meta: ArrayMeta, mut cursor: ByteCursor<'_>) -> Result<(Array, ByteCursor<'_>)> {
    let count = meta.num_elements();
    check_nested_count(&cursor, count)?;
    let mut cells = Vec::with_capacity(count);
    for _ in 0..count {
        let (cell, next) = next_matrix(cursor)?;
        cells.push(cell);
        cursor = next;
    }
    Ok((CellArray::from_parts(meta, cells).into(), cursor))
}

fn parse_struct(
    meta: ArrayMeta,
    class_name: Option<String>,
    cursor: ByteCursor<'_>,
) -> Result<(Array, ByteCursor<'_>)> {
    let offset = cursor.offset();
    let (tag, payload, cursor) = parse_element(cursor)?;
    let lengths: Vec<i64> = decode_values(&tag, payload)?;
    let name_len = match lengths[..] {
        [len] if len > 0 => len as usize,
        _ => {
            return Err(Error::format(
                offset,
                format!("invalid field name length {:?}", lengths),
            ));
        }
    };

    let (names_tag, names_payload, mut cursor) = parse_element(cursor)?;
    let field_names = split_field_names(&names_tag, names_payload, name_len)?;

    // Without fields there is nothing to read per element
    let count = if field_names.is_empty() {
        0
    } else {
        meta.num_elements()
    };
    check_nested_count(&cursor, count.saturating_mul(field_names.len()))?;
    let mut fields: Vec<(String, Vec<Option<Array>>)> = field_names
        .into_iter()
        .map(|name| (name, Vec::with_capacity(count)))
        .collect();
    for _ in 0..count {
        for (_, slots) in fields.iter_mut() {
            let (value, next) = next_matrix(cursor)?;
            slots.push(value);
            cursor = next;
        }
    }
    Ok((StructArray::from_parts(meta, class_name, fields).into(), cursor))
}

/// Split the field-names payload into NUL-padded slots of `name_len` bytes
fn split_field_names(tag: &Tag, payload: ByteCursor<'_>, name_len: usize) -> Result<Vec<String>> {
    let (bytes, _) = payload.take(tag.size)?;
    let count = tag.size / name_len;
    if tag.size % name_len != 0 {
        warn!(
            "field names span {} bytes, not a multiple of {}",
            tag.size, name_len
        );
    }
    Ok(bytes
        .chunks_exact(name_len)
        .take(count)
        .map(|slot| {
            let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
            String::from_utf8_lossy(&slot[..end]).into_owned()
        })
        .collect())
}

fn parse_sparse(
    meta: ArrayMeta,
    nzmax: usize,
    cursor: ByteCursor<'_>,
) -> Result<(Array, ByteCursor<'_>)> {
    let rows = meta.rows();
    let cols = meta.cols();

    let ir_offset = cursor.offset();
    let (mut row_indices, cursor) = parse_indices(cursor)?;
    let jc_offset = cursor.offset();
    let (column_pointers, cursor) = parse_indices(cursor)?;

    if column_pointers.len().checked_sub(1) != Some(cols) {
        return Err(Error::format(
            jc_offset,
            format!(
                "{} column pointers for {} columns",
                column_pointers.len(),
                cols
            ),
        ));
    }
    if column_pointers[0] != 0 || column_pointers.windows(2).any(|w| w[1] < w[0]) {
        return Err(Error::format(
            jc_offset,
            "column pointers are not non-decreasing from 0",
        ));
    }

    let nnz = column_pointers[cols];
    if row_indices.len() < nnz {
        return Err(Error::truncated(ir_offset, nnz, row_indices.len()));
    }
    row_indices.truncate(nnz);
    if let Some(&row) = row_indices.iter().find(|&&r| r >= rows) {
        return Err(Error::format(
            ir_offset,
            format!("row index {} outside {} rows", row, rows),
        ));
    }
    if nzmax < nnz {
        warn!(
            "sparse '{}' declares nzmax {} below its {} values",
            meta.name, nzmax, nnz
        );
    }

    let (real, cursor) = parse_sparse_values(cursor, nnz)?;
    let (imag, cursor) = if meta.is_complex() {
        let (imag, cursor) = parse_sparse_values(cursor, nnz)?;
        (Some(imag), cursor)
    } else {
        (None, cursor)
    };

    Ok((
        SparseArray::from_parts(meta, nzmax, column_pointers, row_indices, real, imag).into(),
        cursor,
    ))
}

/// Sparse value runs may be padded out to nzmax; keep the first `nnz`
fn parse_sparse_values(cursor: ByteCursor<'_>, nnz: usize) -> Result<(Vec<f64>, ByteCursor<'_>)> {
    let (tag, payload, cursor) = parse_element(cursor)?;
    let mut values: Vec<f64> = decode_values(&tag, payload)?;
    if values.len() < nnz {
        return Err(Error::truncated(payload.offset(), nnz, values.len()));
    }
    values.truncate(nnz);
    Ok((values, cursor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ByteOrder;

    /// Little-endian sub-element with normal tag and padding
    fn element(data_type: DataType, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(data_type as u32).to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        out.resize(out.len() + (8 - payload.len() % 8) % 8, 0);
        out
    }

    fn words(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn header(class: u32, dims: &[u32], name: &str) -> Vec<u8> {
        let mut out = element(DataType::UInt32, &words(&[class, 0]));
        out.extend(element(DataType::Int32, &words(dims)));
        out.extend(element(DataType::Int8, name.as_bytes()));
        out
    }

    fn decode(payload: &[u8]) -> Result<Option<Array>> {
        parse_matrix(
            ByteCursor::new(payload, ByteOrder::Little),
            &ReadOptions::default(),
        )
    }

    #[test]
    fn double_matrix() {
        let mut payload = header(6, &[3, 2], "m1");
        let values: Vec<u8> = [1.3f64, 2.0, 3.0, 4.0, 5.0, 6.0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        payload.extend(element(DataType::Double, &values));

        let array = decode(&payload).unwrap().unwrap();
        let m1 = array.as_double().unwrap();
        assert_eq!(m1.name(), "m1");
        assert_eq!(m1.dimensions(), &[3, 2]);
        assert_eq!(m1.get(0, 0), Some(1.3));
        assert_eq!(m1.get(2, 1), Some(6.0));
    }

    #[test]
    fn double_stored_as_uint8() {
        let mut payload = header(6, &[1, 3], "u");
        payload.extend(element(DataType::UInt8, &[1, 2, 200]));
        let array = decode(&payload).unwrap().unwrap();
        assert_eq!(array.as_double().unwrap().real(), &[1.0, 2.0, 200.0]);
    }

    #[test]
    fn complex_int16() {
        let mut payload = header(10 | 0x0800, &[1, 2], "c");
        payload.extend(element(DataType::Int16, &[1, 0, 2, 0]));
        payload.extend(element(DataType::Int16, &[0xFF, 0xFF, 0xFE, 0xFF]));
        let array = decode(&payload).unwrap().unwrap();
        let c = array.as_numeric::<i16>().unwrap();
        assert_eq!(c.real(), &[1, 2]);
        assert_eq!(c.imag(), Some(&[-1, -2][..]));
    }

    #[test]
    fn utf8_char_matrix() {
        let mut payload = header(4, &[1, 2], "s");
        payload.extend(element(DataType::Utf8, "hé".as_bytes()));
        let array = decode(&payload).unwrap().unwrap();
        assert_eq!(array.as_char().unwrap().row(0).unwrap(), "hé");
    }

    #[test]
    fn cell_with_placeholder() {
        let mut inner = header(4, &[1, 2], "");
        inner.extend(element(DataType::UInt16, &[b'h', 0, b'i', 0]));
        let mut placeholder = header(6, &[0, 0], "");
        placeholder.extend(element(DataType::Double, &[]));

        let mut payload = header(1, &[2, 1], "cl");
        payload.extend(element(DataType::Matrix, &inner));
        payload.extend(element(DataType::Matrix, &placeholder));

        let array = decode(&payload).unwrap().unwrap();
        let cell = array.as_cell().unwrap();
        assert_eq!(cell.get(0).unwrap().as_char().unwrap().row(0).unwrap(), "hi");
        assert!(cell.get(1).is_none());
    }

    #[test]
    fn struct_fields() {
        let mut f1 = header(6, &[1, 1], "");
        f1.extend(element(DataType::Double, &3.1415f64.to_le_bytes()));
        let mut f2 = header(4, &[1, 5], "");
        f2.extend(element(DataType::UInt8, b"dummy"));

        let mut payload = header(2, &[1, 1], "str");
        payload.extend(element(DataType::Int32, &words(&[4])));
        payload.extend(element(DataType::Int8, b"f1\0\0f2\0\0"));
        payload.extend(element(DataType::Matrix, &f1));
        payload.extend(element(DataType::Matrix, &f2));

        let array = decode(&payload).unwrap().unwrap();
        let s = array.as_struct().unwrap();
        assert_eq!(s.field_names().collect::<Vec<_>>(), vec!["f1", "f2"]);
        assert_eq!(s.get_field("f1", 0).unwrap().as_double().unwrap().real(), &[3.1415]);
        assert_eq!(
            s.get_field("f2", 0).unwrap().as_char().unwrap().row(0).unwrap(),
            "dummy"
        );
    }

    #[test]
    fn object_has_class_name() {
        let mut payload = header(3, &[1, 1], "obj");
        payload.extend(element(DataType::Int8, b"inline"));
        payload.extend(element(DataType::Int32, &words(&[1])));
        payload.extend(element(DataType::Int8, &[]));
        let array = decode(&payload).unwrap().unwrap();
        assert_eq!(array.class(), ClassCode::Object);
        assert_eq!(array.as_struct().unwrap().class_name(), Some("inline"));
    }

    #[test]
    fn sparse_trims_padded_runs() {
        // 3x2 with (0,0)=1 and (2,1)=2, runs padded out to nzmax 3
        let mut payload = element(DataType::UInt32, &words(&[5, 3]));
        payload.extend(element(DataType::Int32, &words(&[3, 2])));
        payload.extend(element(DataType::Int8, b"sp"));
        payload.extend(element(DataType::Int32, &words(&[0, 2, 0])));
        payload.extend(element(DataType::Int32, &words(&[0, 1, 2])));
        let values: Vec<u8> = [1.0f64, 2.0, 0.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        payload.extend(element(DataType::Double, &values));

        let array = decode(&payload).unwrap().unwrap();
        let sp = array.as_sparse().unwrap();
        assert_eq!(sp.nnz(), 2);
        assert_eq!(sp.nzmax(), 3);
        assert_eq!(sp.get(0, 0), Some(1.0));
        assert_eq!(sp.get(2, 1), Some(2.0));
    }

    #[test]
    fn sparse_decreasing_pointers_rejected() {
        let mut payload = header(5, &[2, 2], "sp");
        payload.extend(element(DataType::Int32, &words(&[0])));
        payload.extend(element(DataType::Int32, &words(&[0, 1, 0])));
        payload.extend(element(DataType::Double, &1.0f64.to_le_bytes()));
        assert!(matches!(decode(&payload), Err(Error::Format { .. })));
    }

    #[test]
    fn unsupported_class() {
        let mut payload = header(16, &[1, 1], "fh");
        payload.extend(element(DataType::Double, &1.0f64.to_le_bytes()));
        assert!(matches!(
            decode(&payload),
            Err(Error::UnsupportedClass { code: 16 })
        ));
    }

    #[test]
    fn filtered_matrix_is_skipped_before_body() {
        // The body is unsupported, but the filter rejects the name first
        let payload = header(17, &[1, 1], "skip");
        let options = ReadOptions::new().filter(|name: &str| name != "skip");
        let result = parse_matrix(ByteCursor::new(&payload, ByteOrder::Little), &options);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn rank_one_is_format_error() {
        let payload = header(6, &[3], "v");
        assert!(matches!(decode(&payload), Err(Error::Format { .. })));
    }

    #[test]
    fn huge_cell_fails_before_allocating() {
        let mut payload = header(1, &[65536, 65536], "cl");
        payload.extend(element(DataType::Matrix, &[]));
        assert!(matches!(
            decode(&payload),
            Err(Error::Truncated { available: 8, .. })
        ));
    }

    #[test]
    fn huge_struct_fails_before_allocating() {
        let mut payload = header(2, &[65536, 65536], "st");
        payload.extend(element(DataType::Int32, &words(&[4])));
        payload.extend(element(DataType::Int8, b"a\0\0\0b\0\0\0"));
        assert!(matches!(decode(&payload), Err(Error::Truncated { .. })));
    }

    #[test]
    fn fieldless_struct_ignores_declared_size() {
        let mut payload = header(2, &[65536, 65536], "st");
        payload.extend(element(DataType::Int32, &words(&[1])));
        payload.extend(element(DataType::Int8, &[]));
        let array = decode(&payload).unwrap().unwrap();
        let s = array.as_struct().unwrap();
        assert_eq!(s.field_names().count(), 0);
        assert_eq!(s.dimensions(), &[65536, 65536]);
    }

    #[test]
    fn overflowing_dimensions_are_format_errors() {
        let mut payload = header(6, &[0x7fff_ffff; 3], "big");
        payload.extend(element(DataType::Double, &[]));
        assert!(matches!(decode(&payload), Err(Error::Format { .. })));

        let mut payload = header(1, &[0x7fff_ffff; 3], "cells");
        payload.extend(element(DataType::Matrix, &[]));
        assert!(matches!(decode(&payload), Err(Error::Format { .. })));
    }

    #[test]
    fn short_real_run_is_truncated() {
        let mut payload = header(6, &[2, 2], "t");
        payload.extend(element(DataType::Double, &1.0f64.to_le_bytes()));
        assert!(matches!(
            decode(&payload),
            Err(Error::Truncated {
                needed: 4,
                available: 1,
                ..
            })
        ));
    }
}
