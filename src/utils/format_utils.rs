//! TIFF format utilities
//!
//! Header checks shared by everything that parses a TIFF structure.

use log::debug;
use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::constants::header;

/// Reads the version number that follows the byte order marker
///
/// Only classic TIFF (42) is accepted; BigTIFF and anything else is
/// reported as an unsupported version.
pub fn check_tiff_version(
    reader: &mut dyn SeekableReader,
    byte_order_handler: &dyn ByteOrderHandler
) -> TiffResult<()> {
    let version = byte_order_handler.read_u16(reader)?;
    debug!("TIFF version: {}", version);

    match version {
        header::TIFF_VERSION => Ok(()),
        header::BIG_TIFF_VERSION => {
            debug!("BigTIFF is not supported");
            Err(TiffError::UnsupportedVersion(version))
        },
        _ => Err(TiffError::UnsupportedVersion(version)),
    }
}

/// Checks whether a byte slice starts with a TIFF header
pub fn has_tiff_header(data: &[u8]) -> bool {
    data.len() >= 8
        && (data[..2] == header::LITTLE_ENDIAN_MARKER || data[..2] == header::BIG_ENDIAN_MARKER)
}
