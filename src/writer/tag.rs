//! Data element tags

use super::primitives::put_u32;
use crate::error::{Error, Result};
use crate::parser::MAX_PACKED_SIZE;
use crate::types::{ByteOrder, DataType};

/// Bytes needed to pad `len` up to the next 8-byte boundary
pub fn padding(len: usize) -> usize {
    (8 - len % 8) % 8
}

fn size_word(size: usize) -> Result<u32> {
    u32::try_from(size).map_err(|_| {
        Error::invalid_array("", format!("element of {} bytes exceeds 4 GiB", size))
    })
}

/// Write a normal-form tag
pub fn write_tag(out: &mut Vec<u8>, data_type: DataType, size: usize, order: ByteOrder) -> Result<()> {
    put_u32(out, data_type as u32, order);
    put_u32(out, size_word(size)?, order);
    Ok(())
}

/// Write a complete primitive element, packing payloads of 1 to 4 bytes into the tag
pub fn write_element(
    out: &mut Vec<u8>,
    data_type: DataType,
    payload: &[u8],
    order: ByteOrder,
) -> Result<()> {
    if (1..=MAX_PACKED_SIZE).contains(&payload.len()) && data_type.is_primitive() {
        put_u32(out, ((payload.len() as u32) << 16) | data_type as u32, order);
        out.extend_from_slice(payload);
        out.resize(out.len() + MAX_PACKED_SIZE - payload.len(), 0);
    } else {
        write_tag(out, data_type, payload.len(), order)?;
        out.extend_from_slice(payload);
        out.resize(out.len() + padding(payload.len()), 0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ByteCursor, parse_element};

    #[test]
    fn small_payload_is_packed() {
        let mut out = Vec::new();
        write_element(&mut out, DataType::Int8, b"ab", ByteOrder::Little).unwrap();
        assert_eq!(out, vec![0x01, 0x00, 0x02, 0x00, b'a', b'b', 0, 0]);
    }

    #[test]
    fn five_bytes_use_normal_form() {
        let mut out = Vec::new();
        write_element(&mut out, DataType::UInt8, b"dummy", ByteOrder::Little).unwrap();
        assert_eq!(out.len(), 16);
        assert_eq!(&out[..8], &[2, 0, 0, 0, 5, 0, 0, 0]);
        assert_eq!(&out[8..13], b"dummy");
        assert_eq!(&out[13..], &[0, 0, 0]);
    }

    #[test]
    fn empty_payload_is_eight_bytes() {
        let mut out = Vec::new();
        write_element(&mut out, DataType::Double, &[], ByteOrder::Big).unwrap();
        assert_eq!(out, vec![0, 0, 0, 9, 0, 0, 0, 0]);
    }

    #[test]
    fn written_elements_parse_back() {
        for len in 0..20usize {
            let payload: Vec<u8> = (0..len as u8).collect();
            for order in [ByteOrder::Little, ByteOrder::Big] {
                let mut out = Vec::new();
                write_element(&mut out, DataType::UInt8, &payload, order).unwrap();
                assert_eq!(out.len() % 8, 0);

                let (tag, body, rest) = parse_element(ByteCursor::new(&out, order)).unwrap();
                assert_eq!(tag.packed, (1..=4).contains(&len));
                assert_eq!(body.take(len).unwrap().0, payload.as_slice());
                assert!(rest.eos());
            }
        }
    }
}
