//! Decoding runs of primitive values

use super::cursor::ByteCursor;
use super::tag::Tag;
use crate::error::{Error, Result};
use crate::types::{DataType, Element, Scalar};

/// Decode every value of an element payload into `T`
///
/// Values stored as `T`'s own type are copied straight across. Any other
/// primitive type is widened to a [`Scalar`] and narrowed into `T`.
pub fn decode_values<T: Element>(tag: &Tag, payload: ByteCursor<'_>) -> Result<Vec<T>> {
    let offset = payload.offset();
    if !tag.data_type.is_primitive() {
        return Err(Error::format(
            offset,
            format!("expected numeric data, found {:?}", tag.data_type),
        ));
    }
    let width = tag.data_type.element_size();
    let count = tag.element_count();
    if count * width != tag.size {
        return Err(Error::format(
            offset,
            format!(
                "{} bytes is not a whole number of {:?} values",
                tag.size, tag.data_type
            ),
        ));
    }

    let (bytes, _) = payload.take(tag.size)?;
    let order = payload.order();
    let mut values = Vec::with_capacity(count);
    if tag.data_type == T::DATA_TYPE {
        values.extend(bytes.chunks_exact(T::SIZE).map(|chunk| T::read(chunk, order)));
    } else {
        for chunk in bytes.chunks_exact(width) {
            let value = Scalar::decode(tag.data_type, chunk, order)
                .ok_or_else(|| Error::format(offset, "non-numeric data in value run"))?;
            values.push(T::from_scalar(value));
        }
    }
    Ok(values)
}

/// Decode a run that must hold exactly `expected` values
pub fn decode_run<T: Element>(
    tag: &Tag,
    payload: ByteCursor<'_>,
    expected: usize,
) -> Result<Vec<T>> {
    let values = decode_values(tag, payload)?;
    check_count(payload.offset(), expected, values.len())?;
    Ok(values)
}

/// Decode character data into UTF-16 code units
///
/// `miUTF8` payloads are decoded as UTF-8 text; every other type is read
/// as a run of integers narrowed to 16 bits.
pub fn decode_chars(tag: &Tag, payload: ByteCursor<'_>, expected: usize) -> Result<Vec<u16>> {
    let offset = payload.offset();
    let units: Vec<u16> = match tag.data_type {
        DataType::Utf8 => {
            let (bytes, _) = payload.take(tag.size)?;
            std::str::from_utf8(bytes)
                .map_err(|e| Error::format(offset, format!("invalid UTF-8 text: {}", e)))?
                .encode_utf16()
                .collect()
        }
        _ => decode_values(tag, payload)?,
    };
    check_count(offset, expected, units.len())?;
    Ok(units)
}

/// Decode a name, stopping at the first NUL
pub fn decode_name(tag: &Tag, payload: ByteCursor<'_>) -> Result<String> {
    let units: Vec<u16> = match tag.data_type {
        DataType::Utf8 | DataType::Int8 | DataType::UInt8 => {
            let (bytes, _) = payload.take(tag.size)?;
            let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
            return Ok(String::from_utf8_lossy(&bytes[..end]).into_owned());
        }
        _ => decode_values(tag, payload)?,
    };
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    Ok(String::from_utf16_lossy(&units[..end]))
}

fn check_count(offset: usize, expected: usize, actual: usize) -> Result<()> {
    if actual < expected {
        return Err(Error::truncated(offset, expected, actual));
    }
    if actual > expected {
        return Err(Error::format(
            offset,
            format!("expected {} values, found {}", expected, actual),
        ));
    }
    Ok(())
}
