//! Array class codes and attribute flags

/// Array class code stored in the low byte of the array-flags word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ClassCode {
    Cell = 1,
    Struct = 2,
    Object = 3,
    Char = 4,
    Sparse = 5,
    Double = 6,
    Single = 7,
    Int8 = 8,
    UInt8 = 9,
    Int16 = 10,
    UInt16 = 11,
    Int32 = 12,
    UInt32 = 13,
    Int64 = 14,
    UInt64 = 15,
}

impl ClassCode {
    /// Try to convert from the on-disk class byte
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            1 => Some(ClassCode::Cell),
            2 => Some(ClassCode::Struct),
            3 => Some(ClassCode::Object),
            4 => Some(ClassCode::Char),
            5 => Some(ClassCode::Sparse),
            6 => Some(ClassCode::Double),
            7 => Some(ClassCode::Single),
            8 => Some(ClassCode::Int8),
            9 => Some(ClassCode::UInt8),
            10 => Some(ClassCode::Int16),
            11 => Some(ClassCode::UInt16),
            12 => Some(ClassCode::Int32),
            13 => Some(ClassCode::UInt32),
            14 => Some(ClassCode::Int64),
            15 => Some(ClassCode::UInt64),
            _ => None,
        }
    }

    /// MATLAB name of the class
    pub fn name(self) -> &'static str {
        match self {
            ClassCode::Cell => "cell",
            ClassCode::Struct => "struct",
            ClassCode::Object => "object",
            ClassCode::Char => "char",
            ClassCode::Sparse => "sparse",
            ClassCode::Double => "double",
            ClassCode::Single => "single",
            ClassCode::Int8 => "int8",
            ClassCode::UInt8 => "uint8",
            ClassCode::Int16 => "int16",
            ClassCode::UInt16 => "uint16",
            ClassCode::Int32 => "int32",
            ClassCode::UInt32 => "uint32",
            ClassCode::Int64 => "int64",
            ClassCode::UInt64 => "uint64",
        }
    }
}

impl std::fmt::Display for ClassCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Attribute bits of the array-flags word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ArrayFlags {
    pub complex: bool,
    pub global: bool,
    pub logical: bool,
}

impl ArrayFlags {
    const COMPLEX: u32 = 0x0800;
    const GLOBAL: u32 = 0x0400;
    const LOGICAL: u32 = 0x0200;

    /// Decode from the first array-flags word (class byte is ignored)
    pub fn from_bits(word: u32) -> Self {
        Self {
            complex: word & Self::COMPLEX != 0,
            global: word & Self::GLOBAL != 0,
            logical: word & Self::LOGICAL != 0,
        }
    }

    /// Encode into the attribute bits of the first array-flags word
    pub fn bits(self) -> u32 {
        let mut word = 0;
        if self.complex {
            word |= Self::COMPLEX;
        }
        if self.global {
            word |= Self::GLOBAL;
        }
        if self.logical {
            word |= Self::LOGICAL;
        }
        word
    }
}
