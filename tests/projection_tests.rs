/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! Tests for selective column reads: projection results, schema ordering,
//! byte-level pruning guarantees and header offset invariants.

use gppcol::{ColumnData, FileHeader, GppError, Table};
use std::io::{self, Cursor, Read, Seek, SeekFrom};

fn sample_table() -> Table {
    let mut table = Table::new();
    table
        .add_column("id".to_string(), ColumnData::Int32(vec![1, 2, 3]))
        .unwrap();
    table
        .add_column(
            "name".to_string(),
            ColumnData::String(vec![
                "Alice".to_string(),
                "Bob".to_string(),
                "Chris".to_string(),
            ]),
        )
        .unwrap();
    table
        .add_column(
            "score".to_string(),
            ColumnData::Float64(vec![95.5, 88.0, 60.0]),
        )
        .unwrap();
    table
        .add_column(
            "is_pass".to_string(),
            ColumnData::Bool(vec![true, true, false]),
        )
        .unwrap();
    table
}

fn encoded_sample() -> Vec<u8> {
    let mut bytes = Vec::new();
    sample_table().write_to(&mut bytes).unwrap();
    bytes
}

/// A seekable reader that records every byte range it actually reads.
struct TrackingReader {
    inner: Cursor<Vec<u8>>,
    reads: Vec<(u64, u64)>,
}

impl TrackingReader {
    fn new(bytes: Vec<u8>) -> Self {
        TrackingReader {
            inner: Cursor::new(bytes),
            reads: Vec::new(),
        }
    }

    /// Total bytes read from within `[start, end)`.
    fn bytes_read_in(&self, start: u64, end: u64) -> u64 {
        self.reads
            .iter()
            .map(|&(s, e)| e.min(end).saturating_sub(s.max(start)))
            .sum()
    }
}

impl Read for TrackingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let start = self.inner.position();
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.reads.push((start, start + n as u64));
        }
        Ok(n)
    }
}

impl Seek for TrackingReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

/// Reading a subset equals projecting the full table onto it
#[test]
fn test_projection_equals_full_read() {
    let table = sample_table();
    let mut reader = Cursor::new(encoded_sample());

    let projected = Table::read_from(&mut reader, Some(&["id", "is_pass"])).unwrap();

    assert_eq!(projected.row_count, 3);
    assert_eq!(projected.columns.len(), 2);
    assert_eq!(projected.get_column("id"), table.get_column("id"));
    assert_eq!(projected.get_column("is_pass"), table.get_column("is_pass"));
    assert!(projected.get_column("name").is_none());
    assert!(projected.get_column("score").is_none());
}

/// Selected columns come back in schema order regardless of request order
#[test]
fn test_projection_keeps_schema_order() {
    let mut reader = Cursor::new(encoded_sample());
    let projected = Table::read_from(&mut reader, Some(&["is_pass", "score", "id"])).unwrap();

    let names: Vec<&str> = projected
        .columns
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(names, vec!["id", "score", "is_pass"]);
}

/// A requested column that does not exist must fail by name
#[test]
fn test_unknown_column_rejected() {
    let mut reader = Cursor::new(encoded_sample());
    let result = Table::read_from(&mut reader, Some(&["id", "missing"]));

    match result {
        Err(GppError::UnknownColumn(name)) => assert_eq!(name, "missing"),
        other => panic!("Expected UnknownColumn, got {:?}", other.map(|_| ())),
    }
}

/// An empty selection still reads the header and reports the row count
#[test]
fn test_empty_selection() {
    let mut reader = Cursor::new(encoded_sample());
    let projected = Table::read_from(&mut reader, Some(&[])).unwrap();

    assert_eq!(projected.row_count, 3);
    assert!(projected.columns.is_empty());
}

/// Pruned reads must touch only the header and the selected column spans
#[test]
fn test_pruning_reads_no_excluded_bytes() {
    let bytes = encoded_sample();
    let header = FileHeader::decode(&mut &bytes[..]).unwrap();
    let header_len = header.encoded_len();

    let span = |name: &str| {
        let meta = header.column(name).unwrap();
        (meta.data_offset, meta.data_offset + meta.compressed_size)
    };
    let id_span = span("id");
    let is_pass_span = span("is_pass");
    let name_span = span("name");
    let score_span = span("score");

    let mut reader = TrackingReader::new(bytes);
    let projected = Table::read_from(&mut reader, Some(&["id", "is_pass"])).unwrap();
    assert_eq!(projected.columns.len(), 2);

    // Every read lies inside the header or a selected column's span.
    for &(start, end) in &reader.reads {
        let allowed = end <= header_len
            || (start >= id_span.0 && end <= id_span.1)
            || (start >= is_pass_span.0 && end <= is_pass_span.1);
        assert!(
            allowed,
            "read of [{}, {}) strayed outside the header and selected spans",
            start, end
        );
    }

    // The excluded columns' spans are never touched at all.
    assert_eq!(reader.bytes_read_in(name_span.0, name_span.1), 0);
    assert_eq!(reader.bytes_read_in(score_span.0, score_span.1), 0);

    // The selected spans are read exactly once, in full.
    assert_eq!(
        reader.bytes_read_in(id_span.0, id_span.1),
        id_span.1 - id_span.0
    );
    assert_eq!(
        reader.bytes_read_in(is_pass_span.0, is_pass_span.1),
        is_pass_span.1 - is_pass_span.0
    );
}

/// A full read touches every span but stays within the file's accounting
#[test]
fn test_full_read_touches_all_spans() {
    let bytes = encoded_sample();
    let total_len = bytes.len() as u64;

    let mut reader = TrackingReader::new(bytes);
    let table = Table::read_from(&mut reader, None).unwrap();
    assert_eq!(table.columns.len(), 4);

    assert_eq!(reader.bytes_read_in(0, total_len), total_len);
}

/// Declared offsets are monotonic, disjoint, and start at the header length
#[test]
fn test_offset_invariants() {
    let bytes = encoded_sample();
    let header = FileHeader::decode(&mut &bytes[..]).unwrap();

    let mut expected_offset = header.encoded_len();
    for meta in &header.columns {
        assert_eq!(
            meta.data_offset, expected_offset,
            "column `{}` does not start where the previous span ends",
            meta.name
        );
        expected_offset += meta.compressed_size;
    }
    assert_eq!(
        expected_offset,
        bytes.len() as u64,
        "last span must end exactly at the file's end"
    );
}

/// The header alone is enough to answer schema queries
#[test]
fn test_schema_read_needs_only_header_bytes() {
    let bytes = encoded_sample();
    let header_len = FileHeader::decode(&mut &bytes[..]).unwrap().encoded_len() as usize;

    // Feed the reader nothing but the header: no column byte is available,
    // and none is needed.
    let mut header_only = &bytes[..header_len];
    let (schema, rows) = gppcol::serialization::read_schema_from(&mut header_only).unwrap();

    assert_eq!(rows, 3);
    let names: Vec<&str> = schema.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "score", "is_pass"]);
}
