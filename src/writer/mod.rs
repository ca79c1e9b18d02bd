//! Serialization of MAT-files

mod deflate;
mod file;
mod matrix;
mod primitives;
mod tag;

pub use file::encode_header;
pub use matrix::write_matrix;
pub use tag::{write_element, write_tag};

use crate::error::Result;
use crate::options::{Compression, WriteOptions};
use crate::types::{Array, DataType, Header};
use log::debug;
use std::io::Write;
use std::path::Path;

use deflate::deflate;

/// Write arrays as a MAT-file with default options
pub fn write<W: Write>(writer: &mut W, arrays: &[Array]) -> Result<()> {
    write_with(writer, arrays, &WriteOptions::default())
}

/// Write arrays as a MAT-file
///
/// Each array becomes one top-level element, compressed unless the options
/// say otherwise.
pub fn write_with<W: Write>(writer: &mut W, arrays: &[Array], options: &WriteOptions) -> Result<()> {
    let order = options.byte_order;
    let description = match &options.description {
        Some(text) => text.clone(),
        None => Header::default_description(),
    };
    writer.write_all(&encode_header(&description, order))?;

    for array in arrays {
        let mut element = Vec::new();
        write_matrix(&mut element, array, order)?;

        match options.compression {
            Compression::None => writer.write_all(&element)?,
            Compression::Level(level) => {
                let compressed = deflate(&element, level)?;
                let mut tag = Vec::with_capacity(8);
                write_tag(&mut tag, DataType::Compressed, compressed.len(), order)?;
                writer.write_all(&tag)?;
                writer.write_all(&compressed)?;
            }
        }
        debug!("wrote '{}' ({} bytes)", array.name(), element.len());
    }
    Ok(())
}

/// Write arrays to bytes with default options
pub fn to_bytes(arrays: &[Array]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write(&mut buf, arrays)?;
    Ok(buf)
}

/// Write arrays to a file on disk with default options
pub fn save(path: impl AsRef<Path>, arrays: &[Array]) -> Result<()> {
    save_with(path, arrays, &WriteOptions::default())
}

/// Write arrays to a file on disk
pub fn save_with(path: impl AsRef<Path>, arrays: &[Array], options: &WriteOptions) -> Result<()> {
    let mut buf = Vec::new();
    write_with(&mut buf, arrays, options)?;
    std::fs::write(path, buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use crate::types::{ByteOrder, CharArray, HEADER_SIZE, NumericArray};

    fn uncompressed(order: ByteOrder) -> WriteOptions {
        WriteOptions::new()
            .byte_order(order)
            .compression(Compression::None)
    }

    #[test]
    fn header_first() {
        let bytes = to_bytes(&[]).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);
        assert!(bytes.starts_with(b"MATLAB 5.0 MAT-file"));
    }

    #[test]
    fn uncompressed_element_is_matrix() {
        let arrays: Vec<Array> = vec![CharArray::from_text("s", "dummy").into()];
        let mut bytes = Vec::new();
        write_with(&mut bytes, &arrays, &uncompressed(ByteOrder::Little)).unwrap();
        assert_eq!(&bytes[HEADER_SIZE..HEADER_SIZE + 4], &14u32.to_le_bytes());
        assert_eq!((bytes.len() - HEADER_SIZE) % 8, 0);
    }

    #[test]
    fn compressed_element_tag() {
        let arrays: Vec<Array> = vec![NumericArray::<f64>::zeros("z", vec![100, 100]).unwrap().into()];
        let options = WriteOptions::new().byte_order(ByteOrder::Big);
        let mut bytes = Vec::new();
        write_with(&mut bytes, &arrays, &options).unwrap();
        assert_eq!(&bytes[HEADER_SIZE..HEADER_SIZE + 4], &15u32.to_be_bytes());
        // 80000 bytes of zeros compress well
        assert!(bytes.len() < 2000);

        let file = parser::parse(&bytes).unwrap();
        assert_eq!(file.get("z").unwrap().dimensions(), &[100, 100]);
    }

    #[test]
    fn custom_description() {
        let options = WriteOptions::new().description("made by hand");
        let bytes = {
            let mut buf = Vec::new();
            write_with(&mut buf, &[], &options).unwrap();
            buf
        };
        let file = parser::parse(&bytes).unwrap();
        assert_eq!(file.header().description, "made by hand");
    }

    #[test]
    fn invalid_field_name_fails_write() {
        use crate::types::StructArray;
        let s = StructArray::from_parts(
            crate::types::ArrayMeta::new("s", vec![1, 1]).unwrap(),
            None,
            vec![("f".repeat(64), vec![None])],
        );
        let result = to_bytes(&[s.into()]);
        assert!(matches!(result, Err(crate::Error::InvalidArray { .. })));
    }
}
