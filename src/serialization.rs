/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # Reading and writing GPP files
//!
//! The writer is two-pass: every column is encoded and compressed up front,
//! the header length is computed from the schema alone, offsets are assigned
//! by accumulating compressed sizes, and only then are bytes emitted. A file
//! is therefore written header-first but never with a provisional header
//! that needs patching.
//!
//! The reader parses the header, then visits only the requested columns by
//! seeking to each one's recorded offset and reading exactly its compressed
//! span. Skipped columns are never read and never decompressed.
//!
//! ```rust,no_run
//! use gppcol::{ColumnData, Table, read_schema};
//!
//! let mut table = Table::new();
//! table.add_column("score".to_string(), ColumnData::Float64(vec![95.5, 88.0]))?;
//! table.serialize("scores.gppcol")?;
//!
//! let (schema, rows) = read_schema("scores.gppcol")?;
//! assert_eq!(rows, 2);
//! assert_eq!(schema[0].name, "score");
//! # Ok::<(), gppcol::GppError>(())
//! ```

use crate::ColumnSchema;
use crate::Table;
use crate::codec;
use crate::compression::compress_block;
use crate::compression::decompress_block;
use crate::error::GppError;
use crate::error::Result;
use crate::header::ColumnMeta;
use crate::header::FileHeader;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;
use tracing::debug;

impl Table {
    /// Serialize the table to a file.
    ///
    /// The whole file is encoded in memory, written to a temporary sibling
    /// and renamed into place, so a failure mid-write never leaves a
    /// truncated file at the target path.
    pub fn serialize<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Serialize the table into a writer: header first, then one compressed
    /// block per column, in schema order.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for (name, data) in &self.columns {
            if data.len() != self.row_count {
                return Err(GppError::RowCountMismatch {
                    column: name.clone(),
                    expected: self.row_count,
                    actual: data.len(),
                });
            }
            if name.len() > u16::MAX as usize {
                return Err(GppError::ColumnNameTooLong(name.clone()));
            }
        }

        let mut metas = Vec::with_capacity(self.columns.len());
        let mut blocks = Vec::with_capacity(self.columns.len());
        for (name, data) in &self.columns {
            let uncompressed = codec::encode_column(data)?;
            let compressed = compress_block(&uncompressed)?;
            metas.push(ColumnMeta {
                name: name.clone(),
                column_type: data.column_type(),
                data_offset: 0,
                compressed_size: compressed.len() as u64,
                uncompressed_size: uncompressed.len() as u64,
            });
            blocks.push(compressed);
        }

        // Blocks sit back to back immediately after the header; the header
        // length is known from the schema before any offset is assigned.
        let mut header = FileHeader {
            row_count: self.row_count as u64,
            columns: metas,
        };
        let mut offset = header.encoded_len();
        for meta in &mut header.columns {
            meta.data_offset = offset;
            offset += meta.compressed_size;
        }

        writer.write_all(&header.encode())?;
        for block in &blocks {
            writer.write_all(block)?;
        }

        debug!(
            rows = self.row_count,
            columns = self.columns.len(),
            bytes = offset,
            "table encoded"
        );
        Ok(())
    }

    /// Deserialize a complete table from a file.
    pub fn deserialize<P: AsRef<Path>>(path: P) -> Result<Table> {
        let mut reader = BufReader::new(File::open(path)?);
        Table::read_from(&mut reader, None)
    }

    /// Deserialize only the named columns from a file. Column order in the
    /// result follows the file's schema, not the request.
    pub fn deserialize_columns<P: AsRef<Path>>(path: P, columns: &[&str]) -> Result<Table> {
        // Unbuffered on purpose: read-ahead would touch the byte spans of
        // columns this call promises to skip.
        let mut reader = File::open(path)?;
        Table::read_from(&mut reader, Some(columns))
    }

    /// Read a table from any seekable byte stream, optionally restricted to
    /// a set of column names.
    pub fn read_from<R: Read + Seek>(reader: &mut R, columns: Option<&[&str]>) -> Result<Table> {
        let header = FileHeader::decode(reader)?;

        let selected: Vec<&ColumnMeta> = match columns {
            None => header.columns.iter().collect(),
            Some(names) => {
                for name in names {
                    if header.column(name).is_none() {
                        return Err(GppError::UnknownColumn(name.to_string()));
                    }
                }
                header
                    .columns
                    .iter()
                    .filter(|c| names.contains(&c.name.as_str()))
                    .collect()
            }
        };

        let row_count = header.row_count as usize;
        let mut table = Table::new();
        table.row_count = row_count;

        for meta in selected {
            reader.seek(SeekFrom::Start(meta.data_offset))?;
            let mut compressed = vec![0u8; meta.compressed_size as usize];
            reader
                .read_exact(&mut compressed)
                .map_err(|e| GppError::ColumnIo {
                    column: meta.name.clone(),
                    source: e,
                })?;

            let uncompressed = decompress_block(&compressed, meta.uncompressed_size)?;
            let data = codec::decode_column(&uncompressed, meta.column_type, row_count)?;
            table.columns.push((meta.name.clone(), data));
        }

        debug!(
            rows = row_count,
            columns = table.columns.len(),
            "table decoded"
        );
        Ok(table)
    }
}

/// Read a file's schema and row count from its header alone; no column data
/// is read or decompressed.
pub fn read_schema<P: AsRef<Path>>(path: P) -> Result<(Vec<ColumnSchema>, u64)> {
    let mut reader = BufReader::new(File::open(path)?);
    read_schema_from(&mut reader)
}

/// Header-only read from any byte stream. Seeking is deliberately not
/// required: the header sits at the front.
pub fn read_schema_from<R: Read>(reader: &mut R) -> Result<(Vec<ColumnSchema>, u64)> {
    let header = FileHeader::decode(reader)?;
    Ok((header.schema(), header.row_count))
}
