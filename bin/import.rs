/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # CSV importer
//!
//! Converts a headered CSV file into a `.gppcol` file, inferring each
//! column's logical type from its values.

use gppcol::FileHeader;
use gppcol::convert::table_from_csv;
use std::env;
use std::fs::File;
use std::process;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <input.csv> <output.gppcol>", args[0]);
        process::exit(1);
    }

    let csv_path = &args[1];
    let out_path = &args[2];

    println!("Loading CSV file: {}", csv_path);
    let table = match table_from_csv(csv_path) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("✗ Error reading '{}': {:#}", csv_path, e);
            process::exit(1);
        }
    };

    if let Err(e) = table.serialize(out_path) {
        eprintln!("✗ Error writing '{}': {}", out_path, e);
        process::exit(1);
    }

    println!("✓ Wrote {}", out_path);
    println!("Rows: {}, Columns: {}", table.row_count, table.columns.len());

    // Re-open the result to show where every column block landed.
    match File::open(out_path).map_err(Into::into).and_then(|mut f| FileHeader::decode(&mut f)) {
        Ok(header) => {
            for column in &header.columns {
                println!(
                    "  - {}: type={}, offset={}, compressed={}, uncompressed={}",
                    column.name,
                    column.column_type,
                    column.data_offset,
                    column.compressed_size,
                    column.uncompressed_size
                );
            }
        }
        Err(e) => {
            eprintln!("✗ Error reading back '{}': {}", out_path, e);
            process::exit(1);
        }
    }
}
