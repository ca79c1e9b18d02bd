//! File header serialization

use crate::types::{ByteOrder, DESCRIPTION_SIZE, Element, HEADER_SIZE, VERSION};

/// Encode the 128-byte header
///
/// The description is padded with spaces, or cut at the last character
/// boundary that fits.
pub fn encode_header(description: &str, order: ByteOrder) -> Vec<u8> {
    let mut end = description.len().min(DESCRIPTION_SIZE);
    while !description.is_char_boundary(end) {
        end -= 1;
    }

    let mut out = Vec::with_capacity(HEADER_SIZE);
    out.extend_from_slice(&description.as_bytes()[..end]);
    out.resize(DESCRIPTION_SIZE, b' ');
    // subsystem data offset, unused
    out.extend_from_slice(&[0; 8]);
    VERSION.write(order, &mut out);
    out.extend_from_slice(order.marker());
    out
}
