/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # Block compression for column buffers
//!
//! Each column's uncompressed buffer is compressed into a single ZSTD frame,
//! independently of every other column. Decompression cross-checks the
//! result against the size declared in the file header before the buffer is
//! handed to the type decoders, which expect exact lengths.

use crate::error::GppError;
use crate::error::Result;

/// ZSTD level 3 balances speed and ratio for column-sized blocks.
const COMPRESSION_LEVEL: i32 = 3;

/// Compress one column buffer. Small inputs may expand; the caller records
/// whatever size comes out.
pub(crate) fn compress_block(data: &[u8]) -> Result<Vec<u8>> {
    let compressed = zstd::encode_all(data, COMPRESSION_LEVEL)?;
    Ok(compressed)
}

/// Decompress one column block and verify it against the declared
/// uncompressed size.
pub(crate) fn decompress_block(compressed: &[u8], expected_size: u64) -> Result<Vec<u8>> {
    let data = zstd::decode_all(compressed).map_err(GppError::Decompression)?;

    if data.len() as u64 != expected_size {
        return Err(GppError::SizeMismatch {
            expected: expected_size,
            actual: data.len() as u64,
        });
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_roundtrip() {
        let data: Vec<u8> = (0..1024u32).map(|i| (i % 251) as u8).collect();
        let compressed = compress_block(&data).unwrap();
        let restored = decompress_block(&compressed, data.len() as u64).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn test_empty_block_roundtrip() {
        let compressed = compress_block(&[]).unwrap();
        let restored = decompress_block(&compressed, 0).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_size_mismatch_detected() {
        let compressed = compress_block(b"some column bytes").unwrap();
        assert!(matches!(
            decompress_block(&compressed, 9999),
            Err(GppError::SizeMismatch {
                expected: 9999,
                actual: 17,
            })
        ));
    }

    #[test]
    fn test_corrupt_frame_detected() {
        let mut compressed = compress_block(b"some column bytes").unwrap();
        // Clobbering the frame magic guarantees the decoder rejects it.
        compressed[0] ^= 0xFF;
        assert!(matches!(
            decompress_block(&compressed, 17),
            Err(GppError::Decompression(_))
        ));
    }

    #[test]
    fn test_truncated_frame_detected() {
        let compressed = compress_block(b"some column bytes").unwrap();
        let truncated = &compressed[..compressed.len() / 2];
        assert!(decompress_block(truncated, 17).is_err());
    }
}
