//! Data element tags

use super::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::types::DataType;
use log::{trace, warn};

/// Largest payload the packed (small element) form can carry
pub const MAX_PACKED_SIZE: usize = 4;

/// Decoded element tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub data_type: DataType,
    /// Payload size in bytes, excluding padding
    pub size: usize,
    /// Whether the payload sits inline in the tag (small element form)
    pub packed: bool,
}

impl Tag {
    /// Bytes of padding that follow the payload
    pub fn padding(&self) -> usize {
        if self.packed {
            MAX_PACKED_SIZE - self.size
        } else if self.data_type == DataType::Compressed {
            0
        } else {
            (8 - self.size % 8) % 8
        }
    }

    /// Number of values in the payload (bytes for matrix and compressed elements)
    pub fn element_count(&self) -> usize {
        self.size / self.data_type.element_size()
    }
}

/// Read a tag, consuming 4 bytes for the packed form and 8 for the normal form
pub fn parse_tag(cursor: ByteCursor<'_>) -> Result<(Tag, ByteCursor<'_>)> {
    let offset = cursor.offset();
    let (word, cursor) = cursor.u32()?;

    let packed_size = (word >> 16) as usize;
    let (code, size, packed, cursor) = if packed_size != 0 {
        if packed_size > MAX_PACKED_SIZE {
            return Err(Error::format(
                offset,
                format!("packed element claims {} bytes", packed_size),
            ));
        }
        (word & 0xFFFF, packed_size, true, cursor)
    } else {
        let (size, cursor) = cursor.u32()?;
        (word, size as usize, false, cursor)
    };

    let data_type = DataType::from_u32(code)
        .ok_or_else(|| Error::format(offset, format!("unknown data type {}", code)))?;

    if packed && !data_type.is_primitive() {
        return Err(Error::format(
            offset,
            format!("{:?} element cannot use the packed form", data_type),
        ));
    }

    trace!(
        "tag at {}: {:?}, {} bytes{}",
        offset,
        data_type,
        size,
        if packed { " (packed)" } else { "" }
    );

    Ok((
        Tag {
            data_type,
            size,
            packed,
        },
        cursor,
    ))
}

/// Read a whole element: tag, payload, and padding
///
/// The payload comes back as a cursor over its own bytes. Missing padding
/// at the very end of the buffer is tolerated.
pub fn parse_element(cursor: ByteCursor<'_>) -> Result<(Tag, ByteCursor<'_>, ByteCursor<'_>)> {
    let (tag, cursor) = parse_tag(cursor)?;
    let (payload, cursor) = cursor.split(tag.size)?;

    let padding = tag.padding();
    let (cursor, skipped) = cursor.skip_at_most(padding);
    if skipped < padding {
        warn!(
            "element at offset {} ends {} padding bytes short of the buffer end",
            payload.offset(),
            padding - skipped
        );
    }

    Ok((tag, payload, cursor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ByteOrder;

    fn le(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn normal_tag() {
        let data = le(&[9, 16]);
        let (tag, cursor) = parse_tag(ByteCursor::new(&data, ByteOrder::Little)).unwrap();
        assert_eq!(tag.data_type, DataType::Double);
        assert_eq!(tag.size, 16);
        assert!(!tag.packed);
        assert_eq!(tag.element_count(), 2);
        assert!(cursor.eos());
    }

    #[test]
    fn packed_tag() {
        // int32 value 7, packed: size 4 in the upper half, type 5 in the lower
        let data = le(&[(4 << 16) | 5, 7]);
        let (tag, cursor) = parse_tag(ByteCursor::new(&data, ByteOrder::Little)).unwrap();
        assert!(tag.packed);
        assert_eq!(tag.size, 4);
        assert_eq!(tag.data_type, DataType::Int32);
        assert_eq!(tag.padding(), 0);
        assert_eq!(cursor.offset(), 4);
    }

    #[test]
    fn packed_tag_big_endian() {
        let data: Vec<u8> = [(2u32 << 16) | 2, 0x4142_0000]
            .iter()
            .flat_map(|w| w.to_be_bytes())
            .collect();
        let (tag, payload, rest) = parse_element(ByteCursor::new(&data, ByteOrder::Big)).unwrap();
        assert_eq!(tag.data_type, DataType::UInt8);
        assert_eq!(payload.take(2).unwrap().0, b"AB");
        assert!(rest.eos());
    }

    #[test]
    fn packed_element_occupies_eight_bytes() {
        let mut data = le(&[(1 << 16) | 2]);
        data.extend_from_slice(&[b'x', 0, 0, 0]);
        data.extend_from_slice(&le(&[9, 8]));
        let (tag, payload, rest) =
            parse_element(ByteCursor::new(&data, ByteOrder::Little)).unwrap();
        assert_eq!(tag.padding(), 3);
        assert_eq!(payload.remaining(), 1);
        assert_eq!(rest.offset(), 8);
    }

    #[test]
    fn normal_element_is_padded() {
        let mut data = le(&[2, 3]);
        data.extend_from_slice(b"abc\0\0\0\0\0");
        data.extend_from_slice(&le(&[9, 0]));
        let (tag, payload, rest) =
            parse_element(ByteCursor::new(&data, ByteOrder::Little)).unwrap();
        assert_eq!(tag.padding(), 5);
        assert_eq!(payload.take(3).unwrap().0, b"abc");
        assert_eq!(rest.offset(), 16);
    }

    #[test]
    fn compressed_element_is_not_padded() {
        let mut data = le(&[15, 3]);
        data.extend_from_slice(&[1, 2, 3]);
        data.extend_from_slice(&le(&[15, 0]));
        let (_, payload, rest) = parse_element(ByteCursor::new(&data, ByteOrder::Little)).unwrap();
        assert_eq!(payload.remaining(), 3);
        assert_eq!(rest.offset(), 11);
    }

    #[test]
    fn missing_trailing_padding_tolerated() {
        let mut data = le(&[2, 3]);
        data.extend_from_slice(b"abc");
        let (_, _, rest) = parse_element(ByteCursor::new(&data, ByteOrder::Little)).unwrap();
        assert!(rest.eos());
    }

    #[test]
    fn unknown_type_is_format_error() {
        let data = le(&[8, 0]);
        let err = parse_tag(ByteCursor::new(&data, ByteOrder::Little)).unwrap_err();
        assert!(matches!(err, Error::Format { offset: 0, .. }));
    }

    #[test]
    fn oversized_packed_is_format_error() {
        let data = le(&[(5 << 16) | 2, 0]);
        let err = parse_tag(ByteCursor::new(&data, ByteOrder::Little)).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn payload_past_end_is_truncated() {
        let data = le(&[9, 64]);
        let err = parse_element(ByteCursor::new(&data, ByteOrder::Little)).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                offset: 8,
                needed: 64,
                available: 0
            }
        ));
    }
}
