//! TIFF validation utilities
//!
//! Bounds checks used while reading TIFF structures and while validating
//! numeric configuration values.

use log::warn;
use std::io::SeekFrom;

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};

/// Validates an IFD offset to ensure it's within the file and past the header
pub fn validate_ifd_offset(offset: u64, file_size: u64) -> TiffResult<()> {
    if offset >= file_size || offset < header::HEADER_SIZE {
        return Err(TiffError::GenericError(format!(
            "Invalid IFD offset: {} (file size: {})",
            offset, file_size
        )));
    }

    Ok(())
}

/// Gets the size of the underlying stream
///
/// The stream position is restored afterwards. If the size cannot be
/// determined, u64::MAX is returned so bounds checks pass.
pub fn get_file_size(reader: &mut dyn SeekableReader) -> TiffResult<u64> {
    let current_position = reader.stream_position()?;
    let file_size = match reader.seek(SeekFrom::End(0)) {
        Ok(size) => size,
        Err(e) => {
            warn!("Could not determine file size: {}", e);
            u64::MAX
        }
    };
    reader.seek(SeekFrom::Start(current_position))?;

    Ok(file_size)
}

/// Validates a numeric range to ensure it's within bounds
///
/// Failures are reported as configuration errors naming the value.
pub fn validate_range<T>(value: T, min: T, max: T, name: &str) -> TiffResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(TiffError::ConfigError(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }

    Ok(())
}
