//! Read and write configuration

use crate::filter::{AcceptAll, ArrayFilter};
use crate::types::ByteOrder;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// zlib level used when compression is requested without one
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Options for decoding a MAT-file
#[derive(Clone)]
pub struct ReadOptions {
    filter: Arc<dyn ArrayFilter>,
    cancel: Option<Arc<AtomicBool>>,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode only the top-level arrays the filter accepts
    pub fn filter(mut self, filter: impl ArrayFilter + 'static) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    /// Stop decoding with [`Error::Cancelled`](crate::Error::Cancelled) once the flag is set
    ///
    /// The flag is checked before each top-level element.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub(crate) fn matches(&self, name: &str) -> bool {
        self.filter.matches(name)
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            filter: Arc::new(AcceptAll),
            cancel: None,
        }
    }
}

impl fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

/// Whether top-level arrays are wrapped in compressed elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    /// zlib level, 0 (store) through 9 (best)
    Level(u32),
}

impl Default for Compression {
    fn default() -> Self {
        Compression::Level(DEFAULT_COMPRESSION_LEVEL)
    }
}

/// Options for encoding a MAT-file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub(crate) byte_order: ByteOrder,
    pub(crate) compression: Compression,
    pub(crate) description: Option<String>,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Header text; truncated to 116 bytes when written
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::native(),
            compression: Compression::default(),
            description: None,
        }
    }
}
