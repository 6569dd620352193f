/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # Per-type column buffer encoding
//!
//! Converts between a typed value sequence and its flat uncompressed byte
//! layout. All multi-byte values are little-endian:
//!
//! - **Int32**: 4 bytes per value.
//! - **Float64**: 8 bytes per value, IEEE-754 binary64.
//! - **Bool**: 1 byte per value, `0x00` or `0x01`; anything else is corrupt.
//! - **String**: `row_count + 1` u32 offsets followed by the concatenated
//!   UTF-8 bytes. String `i` spans `data[offsets[i]..offsets[i + 1]]`.
//!
//! This layer performs no I/O and no compression; decoders expect buffers
//! whose length matches the row count exactly.

use crate::ColumnData;
use crate::ColumnType;
use crate::error::GppError;
use crate::error::Result;

/// Encode a column into its uncompressed on-disk buffer.
pub(crate) fn encode_column(column: &ColumnData) -> Result<Vec<u8>> {
    match column {
        ColumnData::Int32(data) => Ok(encode_int32(data)),
        ColumnData::Float64(data) => Ok(encode_float64(data)),
        ColumnData::String(data) => encode_strings(data),
        ColumnData::Bool(data) => Ok(encode_bools(data)),
    }
}

/// Decode an uncompressed buffer back into typed values.
pub(crate) fn decode_column(
    buf: &[u8],
    column_type: ColumnType,
    row_count: usize,
) -> Result<ColumnData> {
    match column_type {
        ColumnType::Int32 => Ok(ColumnData::Int32(decode_int32(buf, row_count)?)),
        ColumnType::Float64 => Ok(ColumnData::Float64(decode_float64(buf, row_count)?)),
        ColumnType::String => Ok(ColumnData::String(decode_strings(buf, row_count)?)),
        ColumnType::Bool => Ok(ColumnData::Bool(decode_bools(buf, row_count)?)),
    }
}

fn encode_int32(values: &[i32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(values.len() * 4);
    for value in values {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    buf
}

fn decode_int32(buf: &[u8], row_count: usize) -> Result<Vec<i32>> {
    if buf.len() != row_count * 4 {
        return Err(GppError::MalformedColumn {
            expected: row_count * 4,
            actual: buf.len(),
            rows: row_count,
        });
    }

    let values = buf
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok(values)
}

fn encode_float64(values: &[f64]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(values.len() * 8);
    for value in values {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    buf
}

fn decode_float64(buf: &[u8], row_count: usize) -> Result<Vec<f64>> {
    if buf.len() != row_count * 8 {
        return Err(GppError::MalformedColumn {
            expected: row_count * 8,
            actual: buf.len(),
            rows: row_count,
        });
    }

    let values = buf
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
        .collect();
    Ok(values)
}

fn encode_bools(values: &[bool]) -> Vec<u8> {
    values.iter().map(|&b| b as u8).collect()
}

fn decode_bools(buf: &[u8], row_count: usize) -> Result<Vec<bool>> {
    if buf.len() != row_count {
        return Err(GppError::MalformedColumn {
            expected: row_count,
            actual: buf.len(),
            rows: row_count,
        });
    }

    let mut values = Vec::with_capacity(row_count);
    for (row, &byte) in buf.iter().enumerate() {
        match byte {
            0 => values.push(false),
            1 => values.push(true),
            _ => return Err(GppError::InvalidBooleanByte { row, byte }),
        }
    }
    Ok(values)
}

fn encode_strings(values: &[String]) -> Result<Vec<u8>> {
    let data_len: usize = values.iter().map(|s| s.len()).sum();
    if data_len > u32::MAX as usize {
        return Err(GppError::ColumnTooLarge { len: data_len });
    }

    let mut buf = Vec::with_capacity(4 * (values.len() + 1) + data_len);
    let mut end = 0u32;
    buf.extend_from_slice(&end.to_le_bytes());
    for value in values {
        end += value.len() as u32;
        buf.extend_from_slice(&end.to_le_bytes());
    }
    for value in values {
        buf.extend_from_slice(value.as_bytes());
    }
    Ok(buf)
}

fn decode_strings(buf: &[u8], row_count: usize) -> Result<Vec<String>> {
    let offsets_len = (row_count + 1) * 4;
    if buf.len() < offsets_len {
        return Err(GppError::MalformedColumn {
            expected: offsets_len,
            actual: buf.len(),
            rows: row_count,
        });
    }

    let (offset_bytes, data) = buf.split_at(offsets_len);
    let offsets: Vec<u32> = offset_bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    if offsets[0] != 0 {
        return Err(GppError::MalformedOffsets("first offset is not zero"));
    }
    if offsets.windows(2).any(|w| w[0] > w[1]) {
        return Err(GppError::MalformedOffsets(
            "offsets are not monotonically non-decreasing",
        ));
    }
    if offsets[row_count] as usize != data.len() {
        return Err(GppError::MalformedOffsets(
            "final offset does not match the data region length",
        ));
    }

    let mut values = Vec::with_capacity(row_count);
    for row in 0..row_count {
        let slice = &data[offsets[row] as usize..offsets[row + 1] as usize];
        let value = std::str::from_utf8(slice).map_err(|_| GppError::InvalidUtf8 { row })?;
        values.push(value.to_string());
    }
    Ok(values)
}
