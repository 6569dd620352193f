/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # File header encoding and decoding
//!
//! A GPP file starts with a fixed 20-byte preamble:
//!
//! | bytes | field |
//! |---|---|
//! | 0..4 | magic `GPP1` |
//! | 4 | format version |
//! | 5 | endianness flag (`1` = little-endian) |
//! | 6..8 | reserved, written as zero |
//! | 8..16 | row count (u64) |
//! | 16..20 | column count (u32) |
//!
//! followed by one metadata record per column, in schema order: u16 name
//! length, the name's UTF-8 bytes, u8 type id, then three u64 fields (data
//! offset, compressed size, uncompressed size). The header is the sole
//! source of truth for locating column blocks; its length depends only on
//! the column names, so offsets can be assigned before any bytes are
//! written.

use crate::ColumnSchema;
use crate::ColumnType;
use crate::error::GppError;
use crate::error::Result;
use std::io::Read;

pub const MAGIC: [u8; 4] = *b"GPP1";
pub const FORMAT_VERSION: u8 = 1;
pub const LITTLE_ENDIAN_FLAG: u8 = 1;

/// Fixed preamble length in bytes.
pub const FIXED_HEADER_LEN: u64 = 20;

/// Per-column record length excluding the name bytes.
const COLUMN_RECORD_FIXED_LEN: u64 = 2 + 1 + 8 + 8 + 8;

/// Column metadata as stored in the file header
#[derive(Debug, Clone)]
pub struct ColumnMeta {
    pub name: String,
    pub column_type: ColumnType,
    /// Absolute offset of the column's compressed block from file start.
    pub data_offset: u64,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
}

/// File header structure
#[derive(Debug, Clone)]
pub struct FileHeader {
    pub row_count: u64,
    pub columns: Vec<ColumnMeta>,
}

impl FileHeader {
    /// Total serialized header length. Depends only on the schema, never on
    /// the offsets, so the writer can compute it before assigning them.
    pub fn encoded_len(&self) -> u64 {
        FIXED_HEADER_LEN
            + self
                .columns
                .iter()
                .map(|c| COLUMN_RECORD_FIXED_LEN + c.name.len() as u64)
                .sum::<u64>()
    }

    /// Serialize the header, preamble first, then the metadata records in
    /// column order.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len() as usize);

        buf.extend_from_slice(&MAGIC);
        buf.push(FORMAT_VERSION);
        buf.push(LITTLE_ENDIAN_FLAG);
        buf.extend_from_slice(&[0u8; 2]); // reserved
        buf.extend_from_slice(&self.row_count.to_le_bytes());
        buf.extend_from_slice(&(self.columns.len() as u32).to_le_bytes());

        for column in &self.columns {
            buf.extend_from_slice(&(column.name.len() as u16).to_le_bytes());
            buf.extend_from_slice(column.name.as_bytes());
            buf.push(column.column_type.type_id());
            buf.extend_from_slice(&column.data_offset.to_le_bytes());
            buf.extend_from_slice(&column.compressed_size.to_le_bytes());
            buf.extend_from_slice(&column.uncompressed_size.to_le_bytes());
        }

        buf
    }

    /// Read and validate a header, leaving the reader positioned at the
    /// first column block.
    pub fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        read_header_bytes(reader, &mut magic, "magic")?;
        if magic != MAGIC {
            return Err(GppError::BadMagic(magic));
        }

        let mut flags = [0u8; 4]; // version, endianness, reserved
        read_header_bytes(reader, &mut flags, "preamble flags")?;
        if flags[0] != FORMAT_VERSION {
            return Err(GppError::UnsupportedVersion(flags[0]));
        }
        if flags[1] != LITTLE_ENDIAN_FLAG {
            return Err(GppError::UnsupportedEndianness(flags[1]));
        }
        // flags[2..4] are reserved; tolerated whatever their value so a
        // future revision can use them without breaking v1 readers.

        let mut row_count_bytes = [0u8; 8];
        read_header_bytes(reader, &mut row_count_bytes, "row count")?;
        let row_count = u64::from_le_bytes(row_count_bytes);

        let mut column_count_bytes = [0u8; 4];
        read_header_bytes(reader, &mut column_count_bytes, "column count")?;
        let column_count = u32::from_le_bytes(column_count_bytes);

        let mut columns = Vec::with_capacity(column_count as usize);
        for _ in 0..column_count {
            columns.push(decode_column_record(reader)?);
        }

        Ok(FileHeader { row_count, columns })
    }

    /// The schema described by this header, in column order.
    pub fn schema(&self) -> Vec<ColumnSchema> {
        self.columns
            .iter()
            .map(|c| ColumnSchema {
                name: c.name.clone(),
                column_type: c.column_type,
            })
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }
}

fn decode_column_record<R: Read>(reader: &mut R) -> Result<ColumnMeta> {
    let mut name_len_bytes = [0u8; 2];
    read_header_bytes(reader, &mut name_len_bytes, "column name length")?;
    let name_len = u16::from_le_bytes(name_len_bytes);

    let mut name_bytes = vec![0u8; name_len as usize];
    read_header_bytes(reader, &mut name_bytes, "column name")?;
    let name = String::from_utf8(name_bytes).map_err(|_| GppError::NonUtf8ColumnName)?;

    let mut type_byte = [0u8; 1];
    read_header_bytes(reader, &mut type_byte, "column type id")?;
    let column_type = ColumnType::from_type_id(type_byte[0])
        .ok_or(GppError::UnknownColumnType(type_byte[0]))?;

    let mut sizes = [0u8; 24];
    read_header_bytes(reader, &mut sizes, "column sizes")?;
    let data_offset = u64::from_le_bytes([
        sizes[0], sizes[1], sizes[2], sizes[3], sizes[4], sizes[5], sizes[6], sizes[7],
    ]);
    let compressed_size = u64::from_le_bytes([
        sizes[8], sizes[9], sizes[10], sizes[11], sizes[12], sizes[13], sizes[14], sizes[15],
    ]);
    let uncompressed_size = u64::from_le_bytes([
        sizes[16], sizes[17], sizes[18], sizes[19], sizes[20], sizes[21], sizes[22], sizes[23],
    ]);

    Ok(ColumnMeta {
        name,
        column_type,
        data_offset,
        compressed_size,
        uncompressed_size,
    })
}

/// `read_exact` that reports a truncated header instead of a bare EOF.
fn read_header_bytes<R: Read>(reader: &mut R, buf: &mut [u8], what: &'static str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            GppError::TruncatedHeader(what)
        } else {
            GppError::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> FileHeader {
        FileHeader {
            row_count: 42,
            columns: vec![
                ColumnMeta {
                    name: "id".to_string(),
                    column_type: ColumnType::Int32,
                    data_offset: 100,
                    compressed_size: 50,
                    uncompressed_size: 168,
                },
                ColumnMeta {
                    name: "name".to_string(),
                    column_type: ColumnType::String,
                    data_offset: 150,
                    compressed_size: 90,
                    uncompressed_size: 300,
                },
            ],
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let header = sample_header();
        let bytes = header.encode();
        let decoded = FileHeader::decode(&mut &bytes[..]).unwrap();

        assert_eq!(decoded.row_count, 42);
        assert_eq!(decoded.columns.len(), 2);
        assert_eq!(decoded.columns[0].name, "id");
        assert_eq!(decoded.columns[0].column_type, ColumnType::Int32);
        assert_eq!(decoded.columns[0].data_offset, 100);
        assert_eq!(decoded.columns[1].name, "name");
        assert_eq!(decoded.columns[1].compressed_size, 90);
        assert_eq!(decoded.columns[1].uncompressed_size, 300);
    }

    #[test]
    fn test_encoded_len_matches_encoding() {
        let header = sample_header();
        assert_eq!(header.encoded_len(), header.encode().len() as u64);

        let empty = FileHeader {
            row_count: 0,
            columns: Vec::new(),
        };
        assert_eq!(empty.encoded_len(), FIXED_HEADER_LEN);
        assert_eq!(empty.encode().len() as u64, FIXED_HEADER_LEN);
    }

    #[test]
    fn test_preamble_layout() {
        let bytes = sample_header().encode();
        assert_eq!(&bytes[0..4], b"GPP1");
        assert_eq!(bytes[4], 1); // version
        assert_eq!(bytes[5], 1); // little-endian
        assert_eq!(&bytes[6..8], &[0, 0]); // reserved
        assert_eq!(u64::from_le_bytes(bytes[8..16].try_into().unwrap()), 42);
        assert_eq!(u32::from_le_bytes(bytes[16..20].try_into().unwrap()), 2);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut bytes = sample_header().encode();
        bytes[0] = b'X';
        assert!(matches!(
            FileHeader::decode(&mut &bytes[..]),
            Err(GppError::BadMagic(_))
        ));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let mut bytes = sample_header().encode();
        bytes[4] = 2;
        assert!(matches!(
            FileHeader::decode(&mut &bytes[..]),
            Err(GppError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_unsupported_endianness_rejected() {
        let mut bytes = sample_header().encode();
        bytes[5] = 0;
        assert!(matches!(
            FileHeader::decode(&mut &bytes[..]),
            Err(GppError::UnsupportedEndianness(0))
        ));
    }

    #[test]
    fn test_nonzero_reserved_bytes_tolerated() {
        let mut bytes = sample_header().encode();
        bytes[6] = 0xAB;
        bytes[7] = 0xCD;
        assert!(FileHeader::decode(&mut &bytes[..]).is_ok());
    }

    #[test]
    fn test_unknown_type_id_rejected() {
        let mut bytes = sample_header().encode();
        // First column record: name length (2) + "id" (2), then the type id.
        let type_pos = FIXED_HEADER_LEN as usize + 2 + 2;
        bytes[type_pos] = 9;
        assert!(matches!(
            FileHeader::decode(&mut &bytes[..]),
            Err(GppError::UnknownColumnType(9))
        ));
    }

    #[test]
    fn test_truncated_header_rejected() {
        let bytes = sample_header().encode();
        // Chop in the middle of the fixed preamble and in the middle of a
        // column record; both must report truncation, not a raw EOF.
        assert!(matches!(
            FileHeader::decode(&mut &bytes[..10]),
            Err(GppError::TruncatedHeader(_))
        ));
        assert!(matches!(
            FileHeader::decode(&mut &bytes[..FIXED_HEADER_LEN as usize + 3]),
            Err(GppError::TruncatedHeader(_))
        ));
    }

    #[test]
    fn test_name_length_beyond_buffer_rejected() {
        let mut bytes = sample_header().encode();
        // Claim a 500-byte name for the first column; the buffer ends first.
        let len_pos = FIXED_HEADER_LEN as usize;
        bytes[len_pos..len_pos + 2].copy_from_slice(&500u16.to_le_bytes());
        assert!(matches!(
            FileHeader::decode(&mut &bytes[..]),
            Err(GppError::TruncatedHeader("column name"))
        ));
    }
}
