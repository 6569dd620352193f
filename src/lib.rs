/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # GPPCOL - A Columnar On-Disk Table Format Codec Library
//!
//! This library implements the GPP columnar file format (`.gppcol`): a
//! binary, column-oriented table layout in which every column is encoded to
//! a type-specific byte buffer, compressed independently, and addressable
//! through header metadata. Readers can materialize a subset of columns
//! without touching the byte spans of the columns they skip.
//!
//! ```rust,no_run
//! use gppcol::{ColumnData, Table};
//!
//! let mut table = Table::new();
//! table.add_column("id".to_string(), ColumnData::Int32(vec![1, 2, 3]))?;
//! table.add_column(
//!     "name".to_string(),
//!     ColumnData::String(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
//! )?;
//! table.serialize("people.gppcol")?;
//!
//! // Later: read only the `id` column, skipping `name` entirely.
//! let ids = Table::deserialize_columns("people.gppcol", &["id"])?;
//! assert_eq!(ids.columns.len(), 1);
//! # Ok::<(), gppcol::GppError>(())
//! ```

use serde::Deserialize;
use serde::Serialize;
use std::fmt;

mod codec;
mod compression;
pub mod convert;
pub mod error;
pub mod header;
pub mod serialization;

pub use error::GppError;
pub use error::Result;
pub use header::ColumnMeta;
pub use header::FileHeader;
pub use serialization::read_schema;

/// Column data types supported by the format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Int32,
    Float64,
    String,
    Bool,
}

impl ColumnType {
    /// On-disk type id. The mapping is part of the wire contract and must
    /// not be renumbered without bumping the format version.
    pub(crate) fn type_id(self) -> u8 {
        match self {
            ColumnType::Int32 => 1,
            ColumnType::Float64 => 2,
            ColumnType::String => 3,
            ColumnType::Bool => 4,
        }
    }

    pub(crate) fn from_type_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(ColumnType::Int32),
            2 => Some(ColumnType::Float64),
            3 => Some(ColumnType::String),
            4 => Some(ColumnType::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int32 => "int32",
            ColumnType::Float64 => "float64",
            ColumnType::String => "string",
            ColumnType::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// One entry of a table's schema: column name plus logical type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
}

/// In-memory column data representation
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int32(Vec<i32>),
    Float64(Vec<f64>),
    String(Vec<String>),
    Bool(Vec<bool>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int32(data) => data.len(),
            ColumnData::Float64(data) => data.len(),
            ColumnData::String(data) => data.len(),
            ColumnData::Bool(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Int32(_) => ColumnType::Int32,
            ColumnData::Float64(_) => ColumnType::Float64,
            ColumnData::String(_) => ColumnType::String,
            ColumnData::Bool(_) => ColumnType::Bool,
        }
    }
}

/// Main table structure for columnar data.
///
/// Column order is significant: it is the schema order, it is the on-disk
/// block order, and it survives a round-trip through the file format.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<(String, ColumnData)>,
    pub row_count: usize,
}

impl Table {
    pub fn new() -> Self {
        Table {
            columns: Vec::new(),
            row_count: 0,
        }
    }

    /// Append a column. The first column fixes the table's row count; every
    /// later column must match it, and names must be unique.
    pub fn add_column(&mut self, name: String, data: ColumnData) -> Result<()> {
        if self.columns.iter().any(|(existing, _)| *existing == name) {
            return Err(GppError::DuplicateColumn(name));
        }

        if self.columns.is_empty() {
            self.row_count = data.len();
        } else if data.len() != self.row_count {
            return Err(GppError::RowCountMismatch {
                column: name,
                expected: self.row_count,
                actual: data.len(),
            });
        }

        self.columns.push((name, data));
        Ok(())
    }

    pub fn get_column(&self, name: &str) -> Option<&ColumnData> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, data)| data)
    }

    /// The table's schema, in column order.
    pub fn schema(&self) -> Vec<ColumnSchema> {
        self.columns
            .iter()
            .map(|(name, data)| ColumnSchema {
                name: name.clone(),
                column_type: data.column_type(),
            })
            .collect()
    }
}
