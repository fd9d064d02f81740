//! Custom error types for image loading and TIFF processing

use std::fmt;
use std::io;

/// Error types for the conversion pipeline and the TIFF reader/writer
#[derive(Debug)]
pub enum TiffError {
    /// I/O error
    IoError(io::Error),
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Unsupported TIFF version (BigTIFF is not read)
    UnsupportedVersion(u16),
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Unsupported compression method (by code or by name)
    UnsupportedCompression(String),
    /// Image dimensions not found
    MissingDimensions,
    /// Input directory is missing or is not a directory
    DirectoryNotFound(String),
    /// A single input file could not be read or decoded
    ImageDecodeError {
        /// File name of the offending input
        file: String,
        /// Reason reported by the decoder
        reason: String,
    },
    /// Color space identifier is not one we can convert to
    UnsupportedColorSpace(String),
    /// No image was loaded, so there is nothing to write
    EmptyBatch,
    /// The output TIFF could not be produced
    WriteError(String),
    /// Invalid configuration value
    ConfigError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            TiffError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            TiffError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            TiffError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            TiffError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            TiffError::MissingDimensions => write!(f, "Image dimensions not found"),
            TiffError::DirectoryNotFound(dir) => write!(f, "Input directory not found: {}", dir),
            TiffError::ImageDecodeError { file, reason } => write!(f, "{}: {}", file, reason),
            TiffError::UnsupportedColorSpace(cs) => write!(f, "Unsupported color space: {}", cs),
            TiffError::EmptyBatch => write!(f, "No images found to convert"),
            TiffError::WriteError(msg) => write!(f, "Failed to write TIFF: {}", msg),
            TiffError::ConfigError(msg) => write!(f, "Invalid configuration: {}", msg),
            TiffError::GenericError(msg) => write!(f, "TIFF error: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TiffError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}

/// Result type for conversion and TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;

impl From<String> for TiffError {
    fn from(msg: String) -> Self {
        TiffError::GenericError(msg)
    }
}
