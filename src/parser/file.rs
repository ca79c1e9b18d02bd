//! File header and the top-level element stream

use super::cursor::ByteCursor;
use super::inflate::inflate;
use super::matrix::parse_matrix;
use super::tag::parse_element;
use crate::error::{Error, Result};
use crate::options::ReadOptions;
use crate::types::{Array, ByteOrder, DESCRIPTION_SIZE, DataType, HEADER_SIZE, Header, VERSION};
use log::{debug, warn};
use std::collections::VecDeque;

const VERSION_OFFSET: usize = DESCRIPTION_SIZE + 8;
const MARKER_OFFSET: usize = VERSION_OFFSET + 2;

/// Decode the 128-byte header at the start of `bytes`
pub fn parse_header(bytes: &[u8]) -> Result<Header> {
    if bytes.len() < HEADER_SIZE {
        return Err(Error::truncated(0, HEADER_SIZE, bytes.len()));
    }

    let marker = [bytes[MARKER_OFFSET], bytes[MARKER_OFFSET + 1]];
    let byte_order = ByteOrder::from_marker(marker).ok_or_else(|| {
        Error::format(
            MARKER_OFFSET,
            format!("unknown endian marker {:?}", String::from_utf8_lossy(&marker)),
        )
    })?;

    let version_bytes = [bytes[VERSION_OFFSET], bytes[VERSION_OFFSET + 1]];
    let version = match byte_order {
        ByteOrder::Little => u16::from_le_bytes(version_bytes),
        ByteOrder::Big => u16::from_be_bytes(version_bytes),
    };
    if version != VERSION {
        return Err(Error::format(
            VERSION_OFFSET,
            format!("unsupported version 0x{:04x}", version),
        ));
    }

    let text = &bytes[..DESCRIPTION_SIZE];
    let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
    let description = String::from_utf8_lossy(&text[..end]).trim_end().to_string();

    debug!("header: {:?}, {:?}", description, byte_order);
    Ok(Header {
        description,
        version,
        byte_order,
    })
}

/// Iterator over the top-level arrays of a file
///
/// Yields one result per decoded array. After the first error the
/// iterator is exhausted; arrays yielded before it stay valid.
pub struct Elements<'a> {
    cursor: ByteCursor<'a>,
    options: ReadOptions,
    pending: VecDeque<Result<Array>>,
    done: bool,
}

impl<'a> Elements<'a> {
    fn new(cursor: ByteCursor<'a>, options: ReadOptions) -> Self {
        Self {
            cursor,
            options,
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// Decode the next top-level element into `pending`
    fn step(&mut self) -> Result<()> {
        let offset = self.cursor.offset();
        let (tag, payload, cursor) = parse_element(self.cursor)?;
        self.cursor = cursor;

        match tag.data_type {
            DataType::Matrix => {
                if let Some(array) = parse_matrix(payload, &self.options)? {
                    self.pending.push_back(Ok(array));
                }
            }
            DataType::Compressed => {
                let (compressed, _) = payload.take(tag.size)?;
                let stream = inflate(compressed, payload.offset())?;
                decode_inflated(&stream, self.cursor.order(), &self.options, &mut self.pending);
            }
            other => {
                return Err(Error::format(
                    offset,
                    format!("unexpected top-level element {:?}", other),
                ));
            }
        }
        Ok(())
    }

    /// Fewer than 8 zero bytes at the end are padding, not an element
    fn at_trailing_padding(&self) -> bool {
        let rest = self.cursor.remaining();
        rest < 8
            && self
                .cursor
                .take(rest)
                .is_ok_and(|(bytes, _)| bytes.iter().all(|&b| b == 0))
    }
}

impl Iterator for Elements<'_> {
    type Item = Result<Array>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                if item.is_err() {
                    self.done = true;
                    self.pending.clear();
                }
                return Some(item);
            }
            if self.done || self.cursor.eos() {
                return None;
            }
            if self.at_trailing_padding() {
                warn!(
                    "ignoring {} trailing padding bytes",
                    self.cursor.remaining()
                );
                self.done = true;
                return None;
            }
            if self.options.is_cancelled() {
                debug!("decoding cancelled at offset {}", self.cursor.offset());
                self.done = true;
                return Some(Err(Error::Cancelled));
            }
            if let Err(e) = self.step() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}

/// Decode every matrix of an inflated stream, stopping at the first error
fn decode_inflated(
    stream: &[u8],
    order: ByteOrder,
    options: &ReadOptions,
    out: &mut VecDeque<Result<Array>>,
) {
    let mut cursor = ByteCursor::new(stream, order);
    while !cursor.eos() {
        match inflated_element(cursor, options) {
            Ok((array, next)) => {
                out.extend(array.map(Ok));
                cursor = next;
            }
            Err(e) => {
                out.push_back(Err(e));
                return;
            }
        }
    }
}

fn inflated_element<'a>(
    cursor: ByteCursor<'a>,
    options: &ReadOptions,
) -> Result<(Option<Array>, ByteCursor<'a>)> {
    let offset = cursor.offset();
    let (tag, payload, cursor) = parse_element(cursor)?;
    if tag.data_type != DataType::Matrix {
        return Err(Error::format(
            offset,
            format!(
                "compressed stream holds {:?}, expected a matrix",
                tag.data_type
            ),
        ));
    }
    Ok((parse_matrix(payload, options)?, cursor))
}

/// Decode the header and return an iterator over the arrays that follow
pub fn elements<'a>(bytes: &'a [u8], options: &ReadOptions) -> Result<(Header, Elements<'a>)> {
    let header = parse_header(bytes)?;
    // Offsets stay relative to the start of the file
    let (cursor, _) = ByteCursor::new(bytes, header.byte_order).skip_at_most(HEADER_SIZE);
    Ok((header, Elements::new(cursor, options.clone())))
}
