//! Compression layer
//!
//! Wraps stored payloads in a self-describing frame so decode never needs
//! the original level passed back in.
//!
//! ## Frame Format
//!
//! ```text
//! Raw (level 0):
//! ┌──────────┬──────────────┬─────────────────────────────┐
//! │ 0x00 (1) │ CRC32 (4 LE) │         Payload             │
//! └──────────┴──────────────┴─────────────────────────────┘
//!
//! Zstd (levels 1-9):
//! ┌──────────┬─────────────────────────────────────────────┐
//! │ 0x01 (1) │              Zstd frame                     │
//! └──────────┴─────────────────────────────────────────────┘
//! ```
//!
//! The raw frame carries its own CRC32 because there is no codec framing to
//! detect corruption; zstd frames validate themselves.

use crate::error::{Mol2DbError, Result};

/// Frame tag: payload stored uncompressed
const TAG_RAW: u8 = 0x00;

/// Frame tag: payload is a zstd frame
const TAG_ZSTD: u8 = 0x01;

/// Validated compression level in `0..=9`
///
/// Level 0 means "store raw"; out-of-range input is clamped into the valid
/// range rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// No compression: payloads are framed raw
    pub const NONE: CompressionLevel = CompressionLevel(0);

    /// Default level used by the CLI
    pub const DEFAULT: CompressionLevel = CompressionLevel(3);

    /// Strongest supported level
    pub const MAX: CompressionLevel = CompressionLevel(9);

    /// Create a level, clamping into `0..=9`
    pub fn new(level: i32) -> Self {
        CompressionLevel(level.clamp(0, 9) as u8)
    }

    /// The numeric level
    pub fn get(self) -> u8 {
        self.0
    }

    /// True when this level stores payloads raw
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::DEFAULT
    }
}

/// Compress a payload at the given level
///
/// Level 0 frames the bytes raw with a CRC32 checksum; levels 1-9 produce a
/// tagged zstd frame.
pub fn compress(data: &[u8], level: CompressionLevel) -> Result<Vec<u8>> {
    if level.is_none() {
        let mut framed = Vec::with_capacity(5 + data.len());
        framed.push(TAG_RAW);
        framed.extend_from_slice(&crc32fast::hash(data).to_le_bytes());
        framed.extend_from_slice(data);
        return Ok(framed);
    }

    let compressed = zstd::bulk::compress(data, i32::from(level.get()))
        .map_err(|e| Mol2DbError::Compression(format!("zstd compression failed: {}", e)))?;

    let mut framed = Vec::with_capacity(1 + compressed.len());
    framed.push(TAG_ZSTD);
    framed.extend_from_slice(&compressed);
    Ok(framed)
}

/// Decompress a framed payload produced by [`compress`]
///
/// Works for any level, including raw frames; corruption is reported as
/// `Mol2DbError::Compression`.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let (&tag, body) = data
        .split_first()
        .ok_or_else(|| Mol2DbError::Compression("empty payload".to_string()))?;

    match tag {
        TAG_RAW => {
            if body.len() < 4 {
                return Err(Mol2DbError::Compression(
                    "raw frame too short for checksum".to_string(),
                ));
            }
            let (checksum, payload) = body.split_at(4);
            let expected = u32::from_le_bytes([checksum[0], checksum[1], checksum[2], checksum[3]]);
            let actual = crc32fast::hash(payload);
            if actual != expected {
                return Err(Mol2DbError::Compression(format!(
                    "raw frame checksum mismatch: expected {:08x}, got {:08x}",
                    expected, actual
                )));
            }
            Ok(payload.to_vec())
        }
        TAG_ZSTD => zstd::stream::decode_all(body)
            .map_err(|e| Mol2DbError::Compression(format!("zstd decompression failed: {}", e))),
        other => Err(Mol2DbError::Compression(format!(
            "unknown frame tag: 0x{:02x}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_clamping() {
        assert_eq!(CompressionLevel::new(-3).get(), 0);
        assert_eq!(CompressionLevel::new(0).get(), 0);
        assert_eq!(CompressionLevel::new(5).get(), 5);
        assert_eq!(CompressionLevel::new(42).get(), 9);
    }

    #[test]
    fn test_raw_frame_roundtrip() {
        let data = b"not worth compressing";
        let framed = compress(data, CompressionLevel::NONE).unwrap();
        assert_eq!(framed[0], TAG_RAW);
        assert_eq!(decompress(&framed).unwrap(), data);
    }

    #[test]
    fn test_zstd_frame_roundtrip() {
        let data = vec![7u8; 4096];
        let framed = compress(&data, CompressionLevel::new(6)).unwrap();
        assert_eq!(framed[0], TAG_ZSTD);
        assert!(framed.len() < data.len());
        assert_eq!(decompress(&framed).unwrap(), data);
    }

    #[test]
    fn test_raw_checksum_mismatch() {
        let mut framed = compress(b"payload", CompressionLevel::NONE).unwrap();
        let last = framed.len() - 1;
        framed[last] ^= 0xff;
        assert!(matches!(
            decompress(&framed),
            Err(Mol2DbError::Compression(_))
        ));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert!(matches!(
            decompress(&[0x7f, 1, 2, 3]),
            Err(Mol2DbError::Compression(_))
        ));
    }
}
