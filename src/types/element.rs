//! Host element types for numeric arrays
//!
//! Every on-disk primitive is widened into a [`Scalar`] before it is narrowed
//! to the destination type, so unsigned values never pass through a signed
//! type of the same width.

use super::{Array, ByteOrder, ClassCode, DataType, NumericArray};
use std::fmt;

/// 64-bit intermediate for numeric conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Scalar {
    /// Decode one value of `data_type` from exactly `data_type.element_size()` bytes
    ///
    /// Returns None for non-numeric data types.
    pub fn decode(data_type: DataType, bytes: &[u8], order: ByteOrder) -> Option<Self> {
        let scalar = match data_type {
            DataType::Int8 => Scalar::Int(i8::read(bytes, order) as i64),
            DataType::UInt8 | DataType::Utf8 => Scalar::UInt(u8::read(bytes, order) as u64),
            DataType::Int16 => Scalar::Int(i16::read(bytes, order) as i64),
            DataType::UInt16 | DataType::Utf16 => Scalar::UInt(u16::read(bytes, order) as u64),
            DataType::Int32 => Scalar::Int(i32::read(bytes, order) as i64),
            DataType::UInt32 | DataType::Utf32 => Scalar::UInt(u32::read(bytes, order) as u64),
            DataType::Int64 => Scalar::Int(i64::read(bytes, order)),
            DataType::UInt64 => Scalar::UInt(u64::read(bytes, order)),
            DataType::Single => Scalar::Float(f32::read(bytes, order) as f64),
            DataType::Double => Scalar::Float(f64::read(bytes, order)),
            DataType::Matrix | DataType::Compressed => return None,
        };
        Some(scalar)
    }
}

/// Primitive type that can back a [`NumericArray`]
pub trait Element:
    Copy + Default + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// On-disk type written for this element
    const DATA_TYPE: DataType;
    /// Array class of a numeric array of this element
    const CLASS: ClassCode;
    /// Width in bytes
    const SIZE: usize;

    /// Read from the first `SIZE` bytes of `bytes`
    fn read(bytes: &[u8], order: ByteOrder) -> Self;

    /// Append the encoded value
    fn write(self, order: ByteOrder, out: &mut Vec<u8>);

    /// Narrow a widened value into this type (`as` semantics)
    fn from_scalar(scalar: Scalar) -> Self;

    fn to_scalar(self) -> Scalar;

    /// Value equality that treats two NaNs as equal
    fn same(self, other: Self) -> bool {
        self == other
    }

    /// Wrap a numeric array of this element into the matching [`Array`] variant
    fn into_array(array: NumericArray<Self>) -> Array;

    /// Borrow the numeric array if `array` holds this element type
    fn from_array(array: &Array) -> Option<&NumericArray<Self>>;

    fn from_array_mut(array: &mut Array) -> Option<&mut NumericArray<Self>>;
}

macro_rules! impl_element {
    (@same Float) => {
        fn same(self, other: Self) -> bool {
            self.to_bits() == other.to_bits() || (self.is_nan() && other.is_nan())
        }
    };
    (@same $other:ident) => {};
    ($t:ty, $data_type:ident, $class:ident, $variant:ident, $scalar:ident, $wide:ty) => {
        impl Element for $t {
            const DATA_TYPE: DataType = DataType::$data_type;
            const CLASS: ClassCode = ClassCode::$class;
            const SIZE: usize = std::mem::size_of::<$t>();

            fn read(bytes: &[u8], order: ByteOrder) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$t>()];
                buf.copy_from_slice(&bytes[..Self::SIZE]);
                match order {
                    ByteOrder::Little => <$t>::from_le_bytes(buf),
                    ByteOrder::Big => <$t>::from_be_bytes(buf),
                }
            }

            fn write(self, order: ByteOrder, out: &mut Vec<u8>) {
                match order {
                    ByteOrder::Little => out.extend_from_slice(&self.to_le_bytes()),
                    ByteOrder::Big => out.extend_from_slice(&self.to_be_bytes()),
                }
            }

            fn from_scalar(scalar: Scalar) -> Self {
                match scalar {
                    Scalar::Int(v) => v as $t,
                    Scalar::UInt(v) => v as $t,
                    Scalar::Float(v) => v as $t,
                }
            }

            fn to_scalar(self) -> Scalar {
                Scalar::$scalar(self as $wide)
            }

            impl_element!(@same $scalar);

            fn into_array(array: NumericArray<Self>) -> Array {
                Array::$variant(array)
            }

            fn from_array(array: &Array) -> Option<&NumericArray<Self>> {
                match array {
                    Array::$variant(a) => Some(a),
                    _ => None,
                }
            }

            fn from_array_mut(array: &mut Array) -> Option<&mut NumericArray<Self>> {
                match array {
                    Array::$variant(a) => Some(a),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(f64, Double, Double, Double, Float, f64);
impl_element!(f32, Single, Single, Single, Float, f64);
impl_element!(i8, Int8, Int8, Int8, Int, i64);
impl_element!(u8, UInt8, UInt8, UInt8, UInt, u64);
impl_element!(i16, Int16, Int16, Int16, Int, i64);
impl_element!(u16, UInt16, UInt16, UInt16, UInt, u64);
impl_element!(i32, Int32, Int32, Int32, Int, i64);
impl_element!(u32, UInt32, UInt32, UInt32, UInt, u64);
impl_element!(i64, Int64, Int64, Int64, Int, i64);
impl_element!(u64, UInt64, UInt64, UInt64, UInt, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_respects_byte_order() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(u32::read(&bytes, ByteOrder::Little), 0x04030201);
        assert_eq!(u32::read(&bytes, ByteOrder::Big), 0x01020304);
    }

    #[test]
    fn write_respects_byte_order() {
        let mut out = Vec::new();
        0x0102u16.write(ByteOrder::Big, &mut out);
        0x0102u16.write(ByteOrder::Little, &mut out);
        assert_eq!(out, vec![0x01, 0x02, 0x02, 0x01]);
    }

    #[test]
    fn unsigned_32_widens_without_sign_loss() {
        let bytes = 0xFFFF_FFFFu32.to_le_bytes();
        let scalar = Scalar::decode(DataType::UInt32, &bytes, ByteOrder::Little).unwrap();
        assert_eq!(scalar, Scalar::UInt(0xFFFF_FFFF));
        assert_eq!(f64::from_scalar(scalar), 4294967295.0);
        assert_eq!(i64::from_scalar(scalar), 4294967295);
    }

    #[test]
    fn signed_narrowing() {
        let bytes = (-3i8).to_le_bytes();
        let scalar = Scalar::decode(DataType::Int8, &bytes, ByteOrder::Little).unwrap();
        assert_eq!(f64::from_scalar(scalar), -3.0);
        assert_eq!(i32::from_scalar(scalar), -3);
    }

    #[test]
    fn double_is_not_narrowed_into_double() {
        let bytes = 1.3f64.to_be_bytes();
        let scalar = Scalar::decode(DataType::Double, &bytes, ByteOrder::Big).unwrap();
        assert_eq!(f64::from_scalar(scalar), 1.3);
    }

    #[test]
    fn nan_is_same_as_nan() {
        assert!(f64::NAN.same(f64::NAN));
        assert!(!f64::NAN.same(1.0));
        assert!(f32::NAN.same(f32::NAN));
        assert!(3u8.same(3));
    }

    #[test]
    fn matrix_is_not_a_scalar() {
        assert!(Scalar::decode(DataType::Matrix, &[0], ByteOrder::Little).is_none());
    }
}
