/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # CSV conversion
//!
//! Bridges headered CSV files and in-memory [`Table`]s. This layer sits
//! outside the codec: it only builds tables and hands them to the
//! serialization API.
//!
//! Column types are inferred from the text values, most specific first:
//! bool (`true`/`false`, case-insensitive), then int32, then float64, with
//! string as the fallback.

use crate::ColumnData;
use crate::ColumnType;
use crate::Table;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use std::path::Path;
use tracing::debug;

/// Read a headered CSV file into a [`Table`], inferring each column's type.
pub fn table_from_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open CSV file '{}'", path.display()))?;

    let names: Vec<String> = reader
        .headers()
        .context("failed to read CSV header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.context("failed to read CSV record")?;
        if record.len() != names.len() {
            bail!(
                "row {}: expected {} fields, found {}",
                row_idx + 2, // 1-based, after the header row
                names.len(),
                record.len()
            );
        }
        for (i, field) in record.iter().enumerate() {
            raw[i].push(field.to_string());
        }
    }

    let mut table = Table::new();
    for (name, values) in names.into_iter().zip(raw) {
        let column_type = infer_column_type(&values);
        debug!(column = %name, %column_type, rows = values.len(), "inferred column type");
        let data = parse_column(&values, column_type)
            .with_context(|| format!("failed to parse column '{}'", name))?;
        table.add_column(name, data)?;
    }
    Ok(table)
}

/// Write a [`Table`] as a headered CSV file. Booleans serialize as
/// `true`/`false`, mirroring the values the type inference accepts.
pub fn table_to_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    if table.columns.is_empty() {
        bail!("refusing to write a CSV file with no columns");
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create CSV file '{}'", path.display()))?;

    writer.write_record(table.columns.iter().map(|(name, _)| name.as_str()))?;

    for row in 0..table.row_count {
        let record: Vec<String> = table
            .columns
            .iter()
            .map(|(_, data)| match data {
                ColumnData::Int32(values) => values[row].to_string(),
                ColumnData::Float64(values) => values[row].to_string(),
                ColumnData::String(values) => values[row].clone(),
                ColumnData::Bool(values) => {
                    let text = if values[row] { "true" } else { "false" };
                    text.to_string()
                }
            })
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Inference ladder: bool, int32, float64, string. The first type every
/// trimmed value satisfies wins.
pub(crate) fn infer_column_type(values: &[String]) -> ColumnType {
    let is_bool = |v: &str| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false");
    if values.iter().all(|v| is_bool(v.trim())) {
        return ColumnType::Bool;
    }
    if values.iter().all(|v| v.trim().parse::<i32>().is_ok()) {
        return ColumnType::Int32;
    }
    if values.iter().all(|v| v.trim().parse::<f64>().is_ok()) {
        return ColumnType::Float64;
    }
    ColumnType::String
}

fn parse_column(values: &[String], column_type: ColumnType) -> Result<ColumnData> {
    match column_type {
        ColumnType::Int32 => {
            let mut parsed = Vec::with_capacity(values.len());
            for (row, value) in values.iter().enumerate() {
                let v: i32 = value.trim().parse().with_context(|| {
                    format!("row {}: failed to parse '{}' as int32", row + 1, value)
                })?;
                parsed.push(v);
            }
            Ok(ColumnData::Int32(parsed))
        }
        ColumnType::Float64 => {
            let mut parsed = Vec::with_capacity(values.len());
            for (row, value) in values.iter().enumerate() {
                let v: f64 = value.trim().parse().with_context(|| {
                    format!("row {}: failed to parse '{}' as float64", row + 1, value)
                })?;
                parsed.push(v);
            }
            Ok(ColumnData::Float64(parsed))
        }
        ColumnType::Bool => {
            let mut parsed = Vec::with_capacity(values.len());
            for (row, value) in values.iter().enumerate() {
                let trimmed = value.trim();
                if trimmed.eq_ignore_ascii_case("true") {
                    parsed.push(true);
                } else if trimmed.eq_ignore_ascii_case("false") {
                    parsed.push(false);
                } else {
                    bail!("row {}: invalid bool value '{}'", row + 1, value);
                }
            }
            Ok(ColumnData::Bool(parsed))
        }
        ColumnType::String => Ok(ColumnData::String(values.to_vec())),
    }
}
