//! Element data types (the `mi*` codes carried by every tag)

/// Data type code of a tagged data element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DataType {
    Int8 = 1,
    UInt8 = 2,
    Int16 = 3,
    UInt16 = 4,
    Int32 = 5,
    UInt32 = 6,
    Single = 7,
    Double = 9,
    Int64 = 12,
    UInt64 = 13,
    Matrix = 14,
    Compressed = 15,
    Utf8 = 16,
    Utf16 = 17,
    Utf32 = 18,
}

impl DataType {
    /// Size in bytes of a single element
    ///
    /// Matrix and compressed elements are byte streams, so their unit is one byte.
    pub fn element_size(self) -> usize {
        match self {
            DataType::Int8 | DataType::UInt8 | DataType::Utf8 => 1,
            DataType::Int16 | DataType::UInt16 | DataType::Utf16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Single | DataType::Utf32 => 4,
            DataType::Double | DataType::Int64 | DataType::UInt64 => 8,
            DataType::Matrix | DataType::Compressed => 1,
        }
    }

    /// Whether this type holds a run of primitive values
    pub fn is_primitive(self) -> bool {
        !matches!(self, DataType::Matrix | DataType::Compressed)
    }

    /// Try to convert from the on-disk code
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            1 => Some(DataType::Int8),
            2 => Some(DataType::UInt8),
            3 => Some(DataType::Int16),
            4 => Some(DataType::UInt16),
            5 => Some(DataType::Int32),
            6 => Some(DataType::UInt32),
            7 => Some(DataType::Single),
            9 => Some(DataType::Double),
            12 => Some(DataType::Int64),
            13 => Some(DataType::UInt64),
            14 => Some(DataType::Matrix),
            15 => Some(DataType::Compressed),
            16 => Some(DataType::Utf8),
            17 => Some(DataType::Utf16),
            18 => Some(DataType::Utf32),
            _ => None,
        }
    }
}
