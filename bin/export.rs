/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # CSV exporter
//!
//! Converts a `.gppcol` file back into a headered CSV file. With
//! `--columns` only the named columns are read; the rest of the file is
//! never touched.
//!
//! ```bash
//! # Export the whole table
//! cargo run --bin export -- data.gppcol data.csv
//!
//! # Export a projection, reading only the listed column blocks
//! cargo run --bin export -- data.gppcol data.csv --columns id,score
//! ```

use gppcol::Table;
use gppcol::convert::table_to_csv;
use std::env;
use std::process;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let args: Vec<String> = env::args().collect();
    let mut positional: Vec<&str> = Vec::new();
    let mut columns: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
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

    if positional.len() != 2 {
        eprintln!(
            "Usage: {} <input.gppcol> <output.csv> [--columns a,b,c]",
            args[0]
        );
        process::exit(1);
    }

    let gpp_path = positional[0];
    let csv_path = positional[1];

    let result = match &columns {
        Some(list) => {
            let names: Vec<&str> = list.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
            if names.is_empty() {
                eprintln!("Error: --columns lists no column names");
                process::exit(1);
            }
            Table::deserialize_columns(gpp_path, &names)
        }
        None => Table::deserialize(gpp_path),
    };

    let table = match result {
        Ok(table) => table,
        Err(e) => {
            eprintln!("✗ Error reading '{}': {}", gpp_path, e);
            process::exit(1);
        }
    };

    if let Err(e) = table_to_csv(&table, csv_path) {
        eprintln!("✗ Error writing '{}': {:#}", csv_path, e);
        process::exit(1);
    }

    println!("✓ Wrote {}", csv_path);
    println!("Rows: {}, Columns: {}", table.row_count, table.columns.len());
}
