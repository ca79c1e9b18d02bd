//! Byte cursor threaded through every decoding step
//!
//! The cursor is `Copy`: each step consumes a cursor and hands back the
//! advanced one alongside its output, so callers can backtrack by keeping
//! the old value around.

use crate::error::{Error, Result};
use crate::types::ByteOrder;

/// Position in a borrowed byte buffer with the byte order of the stream
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
    base: usize,
    order: ByteOrder,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Self {
            data,
            position: 0,
            base: 0,
            order,
        }
    }

    /// Offset of the cursor relative to the start of the decoded buffer
    pub fn offset(&self) -> usize {
        self.base + self.position
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// True when every byte has been consumed
    pub fn eos(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Take exactly `count` bytes as a zero-copy slice
    pub fn take(self, count: usize) -> Result<(&'a [u8], Self)> {
        if count > self.remaining() {
            return Err(Error::truncated(self.offset(), count, self.remaining()));
        }
        let slice = &self.data[self.position..self.position + count];
        Ok((
            slice,
            Self {
                position: self.position + count,
                ..self
            },
        ))
    }

    /// Take `count` bytes as a cursor of their own that reports offsets in this buffer
    pub fn split(self, count: usize) -> Result<(Self, Self)> {
        let base = self.offset();
        let (slice, rest) = self.take(count)?;
        Ok((
            Self {
                data: slice,
                position: 0,
                base,
                order: self.order,
            },
            rest,
        ))
    }

    pub fn skip(self, count: usize) -> Result<Self> {
        self.take(count).map(|(_, cursor)| cursor)
    }

    /// Skip up to `count` bytes, stopping at the end of the buffer
    ///
    /// Returns the cursor and the number of bytes actually skipped.
    pub fn skip_at_most(self, count: usize) -> (Self, usize) {
        let n = count.min(self.remaining());
        (
            Self {
                position: self.position + n,
                ..self
            },
            n,
        )
    }

    pub fn u16(self) -> Result<(u16, Self)> {
        let (bytes, cursor) = self.take(2)?;
        let bytes = [bytes[0], bytes[1]];
        let value = match self.order {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        };
        Ok((value, cursor))
    }

    pub fn u32(self) -> Result<(u32, Self)> {
        let (bytes, cursor) = self.take(4)?;
        let bytes = [bytes[0], bytes[1], bytes[2], bytes[3]];
        let value = match self.order {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        };
        Ok((value, cursor))
    }
}
