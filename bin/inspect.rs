/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # GPP file inspector
//!
//! Prints a `.gppcol` file's schema and block layout from the header alone.
//! With `--columns` the named columns are also materialized and the first
//! rows previewed; with `--json` the schema is emitted machine-readable.

use gppcol::ColumnData;
use gppcol::FileHeader;
use gppcol::Table;
use std::env;
use std::fs::File;
use std::process;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const PREVIEW_ROWS: usize = 5;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let args: Vec<String> = env::args().collect();
    let mut positional: Vec<&str> = Vec::new();
    let mut columns: Option<String> = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => {
                json = true;
                i += 1;
            }
            "--columns" | "-c" => {
                if i + 1 < args.len() {
                    columns = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --columns requires a value");
                    process::exit(1);
                }
            }
            arg => {
                positional.push(arg);
                i += 1;
            }
        }
    }

    if positional.len() != 1 {
        eprintln!(
            "Usage: {} <file.gppcol> [--json] [--columns a,b,c]",
            args[0]
        );
        process::exit(1);
    }

    let path = positional[0];

    let header = match File::open(path) {
        Ok(mut file) => match FileHeader::decode(&mut file) {
            Ok(header) => header,
            Err(e) => {
                eprintln!("✗ Error reading header of '{}': {}", path, e);
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("✗ Error opening '{}': {}", path, e);
            process::exit(1);
        }
    };

    if json {
        let schema = serde_json::json!({
            "row_count": header.row_count,
            "columns": header.schema(),
        });
        match serde_json::to_string_pretty(&schema) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("✗ Error rendering schema: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("File: {}", path);
        println!("Rows: {}", header.row_count);
        println!("Columns ({}):", header.columns.len());
        for column in &header.columns {
            println!(
                "  - {} ({}): offset={}, compressed={}, uncompressed={}",
                column.name,
                column.column_type,
                column.data_offset,
                column.compressed_size,
                column.uncompressed_size
            );
        }
    }

    if let Some(list) = columns {
        let names: Vec<&str> = list.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
        if names.is_empty() {
            eprintln!("Error: --columns lists no column names");
            process::exit(1);
        }

        let table = match Table::deserialize_columns(path, &names) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("✗ Error reading columns: {}", e);
                process::exit(1);
            }
        };

        let preview = PREVIEW_ROWS.min(table.row_count);
        println!("\nFirst {} rows:", preview);
        for row in 0..preview {
            let values: Vec<String> = table
                .columns
                .iter()
                .map(|(_, data)| format_value(data, row))
                .collect();
            println!("  {}", values.join(", "));
        }
    }
}

fn format_value(data: &ColumnData, row: usize) -> String {
    match data {
        ColumnData::Int32(values) => values[row].to_string(),
        ColumnData::Float64(values) => values[row].to_string(),
        ColumnData::String(values) => values[row].clone(),
        ColumnData::Bool(values) => {
            let text = if values[row] { "true" } else { "false" };
            text.to_string()
        }
    }
}
