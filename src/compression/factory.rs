//! Factory for creating compression handlers

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::utils::tag_utils;
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::deflate::AdobeDeflateHandler;
use super::zstd::ZstdHandler;
use super::jpeg::JpegHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for the given compression code
    ///
    /// Used when reading pages back; quality only matters for encoding.
    pub fn create_handler(code: u16) -> TiffResult<Box<dyn CompressionHandler>> {
        match code {
            compression::NONE => Ok(Box::new(UncompressedHandler)),
            compression::DEFLATE => Ok(Box::new(AdobeDeflateHandler)),
            compression::ZSTD => Ok(Box::new(ZstdHandler::new())),
            compression::JPEG => Ok(Box::new(JpegHandler::new())),
            _ => Err(TiffError::UnsupportedCompression(format!(
                "{} ({})", code, tag_utils::get_compression_name(code))))
        }
    }

    /// Get a handler by name
    ///
    /// `quality` is passed to lossy encoders and ignored by the others.
    pub fn get_handler_by_name(name: &str, quality: u8) -> TiffResult<Box<dyn CompressionHandler>> {
        match name.trim().to_lowercase().as_str() {
            "uncompressed" | "none" | "raw" => Ok(Box::new(UncompressedHandler)),
            "tiff_adobe_deflate" | "adobe_deflate" | "deflate" | "zip" => Ok(Box::new(AdobeDeflateHandler)),
            "zstd" | "tiff_zstd" => Ok(Box::new(ZstdHandler::new())),
            "jpeg" | "tiff_jpeg" => Ok(Box::new(JpegHandler::with_quality(quality))),
            _ => Err(TiffError::UnsupportedCompression(name.to_string()))
        }
    }

    /// Get all available compression handlers
    pub fn get_available_handlers() -> Vec<Box<dyn CompressionHandler>> {
        vec![
            Box::new(UncompressedHandler),
            Box::new(AdobeDeflateHandler),
            Box::new(ZstdHandler::new()),
            Box::new(JpegHandler::new())
        ]
    }

    /// Names accepted by `get_handler_by_name`, one per method
    pub fn available_names() -> &'static [&'static str] {
        &["none", "tiff_adobe_deflate", "zstd", "jpeg"]
    }
}
