/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # Error types for the GPP codec
//!
//! Every failure the codec can surface is a variant here, so callers can
//! tell a corrupt block apart from a missing column or an unsupported file
//! revision without parsing messages.

use std::io;
use thiserror::Error;

/// Errors surfaced by the GPP file format codec.
#[derive(Error, Debug)]
pub enum GppError {
    #[error("not a gpp file: bad magic {0:?}")]
    BadMagic([u8; 4]),

    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),

    #[error("unsupported endianness flag {0}")]
    UnsupportedEndianness(u8),

    #[error("header truncated while reading {0}")]
    TruncatedHeader(&'static str),

    #[error("column name is not valid utf-8")]
    NonUtf8ColumnName,

    #[error("unknown column type id {0}")]
    UnknownColumnType(u8),

    #[error("failed to read data block of column `{column}`")]
    ColumnIo {
        column: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to decompress column block")]
    Decompression(#[source] io::Error),

    #[error("decompressed block is {actual} bytes but the header declares {expected}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("column buffer is {actual} bytes, expected {expected} for {rows} rows")]
    MalformedColumn {
        expected: usize,
        actual: usize,
        rows: usize,
    },

    #[error("invalid boolean byte {byte:#04x} at row {row}")]
    InvalidBooleanByte { row: usize, byte: u8 },

    #[error("malformed string offsets: {0}")]
    MalformedOffsets(&'static str),

    #[error("string at row {row} is not valid utf-8")]
    InvalidUtf8 { row: usize },

    #[error("requested column `{0}` does not exist")]
    UnknownColumn(String),

    #[error("duplicate column name `{0}`")]
    DuplicateColumn(String),

    #[error("column `{column}` has {actual} values, table declares {expected} rows")]
    RowCountMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("string column data region is {len} bytes, exceeding the u32 offset range")]
    ColumnTooLarge { len: usize },

    #[error("column name `{0}` exceeds the 65535-byte limit")]
    ColumnNameTooLong(String),

    #[error("i/o error")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, GppError>;
