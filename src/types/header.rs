//! Header constants and structure

/// Header size in bytes (text + subsystem offset + version + endian marker)
pub const HEADER_SIZE: usize = 128;

/// Length of the descriptive text field
pub const DESCRIPTION_SIZE: usize = 116;

/// Level 5 format version
pub const VERSION: u16 = 0x0100;

/// Endian marker as it appears in a little-endian file
pub const MARKER_LITTLE: &[u8; 2] = b"IM";

/// Endian marker as it appears in a big-endian file
pub const MARKER_BIG: &[u8; 2] = b"MI";

/// Byte order of every multi-byte value after the header text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the host
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }

    /// Marker bytes written into the header for this order
    pub fn marker(self) -> &'static [u8; 2] {
        match self {
            ByteOrder::Little => MARKER_LITTLE,
            ByteOrder::Big => MARKER_BIG,
        }
    }

    /// Detect the order from the header marker bytes
    pub fn from_marker(marker: [u8; 2]) -> Option<Self> {
        match &marker {
            MARKER_LITTLE => Some(ByteOrder::Little),
            MARKER_BIG => Some(ByteOrder::Big),
            _ => None,
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

/// Decoded 128-byte file header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Descriptive text, without NUL or trailing space padding
    pub description: String,
    pub version: u16,
    pub byte_order: ByteOrder,
}

impl Header {
    pub fn new(description: impl Into<String>, byte_order: ByteOrder) -> Self {
        Self {
            description: description.into(),
            version: VERSION,
            byte_order,
        }
    }

    /// Description written when the caller provides none
    pub fn default_description() -> String {
        format!(
            "MATLAB 5.0 MAT-file, Platform: {}, Created by: {} {}",
            std::env::consts::OS,
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
        )
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new(Self::default_description(), ByteOrder::native())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_detection() {
        assert_eq!(ByteOrder::from_marker(*b"IM"), Some(ByteOrder::Little));
        assert_eq!(ByteOrder::from_marker(*b"MI"), Some(ByteOrder::Big));
        assert_eq!(ByteOrder::from_marker(*b"XX"), None);
        assert_eq!(ByteOrder::Big.marker(), b"MI");
    }

    #[test]
    fn default_description_fits() {
        let header = Header::default();
        assert!(header.description.starts_with("MATLAB 5.0 MAT-file"));
        assert!(header.description.len() <= DESCRIPTION_SIZE);
        assert_eq!(header.version, VERSION);
    }
}
