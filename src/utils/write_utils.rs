//! TIFF writing utilities
//!
//! Alignment helpers for laying out tag data and strips.

use crate::tiff::errors::TiffResult;
use std::io::Write;

/// Align an offset to a 4-byte boundary
pub fn align_to_4_bytes(offset: u64) -> u64 {
    let remainder = offset % 4;
    if remainder == 0 {
        offset
    } else {
        offset + (4 - remainder)
    }
}

/// Write padding bytes so the next write starts on a 4-byte boundary
pub fn write_padding(writer: &mut impl Write, data_len: usize) -> TiffResult<()> {
    let padding = (4 - (data_len % 4)) % 4;
    if padding > 0 {
        writer.write_all(&[0u8; 3][..padding])?;
    }
    Ok(())
}

/// Encodes a RATIONAL value as it is stored in a little-endian file
pub fn rational_le_bytes(numerator: u32, denominator: u32) -> [u8; 8] {
    let mut bytes = [0u8; 8];
    bytes[..4].copy_from_slice(&numerator.to_le_bytes());
    bytes[4..].copy_from_slice(&denominator.to_le_bytes());
    bytes
}

/// Packs two SHORT values into an inline value field (little-endian)
pub fn pack_shorts(first: u16, second: u16) -> u32 {
    first as u32 | ((second as u32) << 16)
}
