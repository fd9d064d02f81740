//! Handler for JPEG compressed strips
//!
//! Each strip holds one complete JFIF stream. The encoder works from RGB or
//! grayscale samples and does its own YCbCr transform, so YCbCr strips are
//! turned back into RGB before encoding. Every color strip therefore holds
//! YCbCr data and is tagged as such, whatever the page's source space.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageFormat};
use log::debug;

use crate::loader::color;
use crate::loader::ColorSpace;
use crate::tiff::constants::{compression, photometric};
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::{CompressionHandler, StripLayout};

pub const DEFAULT_QUALITY: u8 = 75;

/// JPEG compression handler (compression code 7)
pub struct JpegHandler {
    /// Encoder quality, 1-100
    quality: u8,
}

impl JpegHandler {
    pub fn new() -> Self {
        JpegHandler { quality: DEFAULT_QUALITY }
    }

    /// Create a handler with the given quality, clamped to 1-100
    pub fn with_quality(quality: u8) -> Self {
        JpegHandler { quality: quality.clamp(1, 100) }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for JpegHandler {
    fn decompress(&self, data: &[u8], layout: &StripLayout) -> TiffResult<Vec<u8>> {
        let image = image::load_from_memory_with_format(data, ImageFormat::Jpeg)
            .map_err(|e| TiffError::GenericError(format!("JPEG decompression error: {}", e)))?;

        if image.width() != layout.width || image.height() != layout.height {
            return Err(TiffError::GenericError(format!(
                "JPEG strip is {}x{}, expected {}x{}",
                image.width(), image.height(), layout.width, layout.height)));
        }

        Ok(color::convert(&image, layout.color_space))
    }

    fn compress(&self, data: &[u8], layout: &StripLayout) -> TiffResult<Vec<u8>> {
        if data.len() != layout.expected_len() {
            return Err(TiffError::GenericError(format!(
                "Strip holds {} bytes, expected {} for {}x{} {}",
                data.len(), layout.expected_len(), layout.width, layout.height, layout.color_space)));
        }

        let (samples, color_type) = match layout.color_space {
            ColorSpace::Rgb => (data.to_vec(), ExtendedColorType::Rgb8),
            ColorSpace::YCbCr => (color::ycbcr_to_rgb(data), ExtendedColorType::Rgb8),
            ColorSpace::Gray => (data.to_vec(), ExtendedColorType::L8),
        };

        debug!("JPEG encoding {}x{} {} strip at quality {}",
               layout.width, layout.height, layout.color_space, self.quality);

        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, self.quality)
            .encode(&samples, layout.width, layout.height, color_type)
            .map_err(|e| TiffError::GenericError(format!("JPEG compression error: {}", e)))?;

        Ok(out)
    }

    fn name(&self) -> &'static str {
        "JPEG"
    }

    fn code(&self) -> u16 {
        compression::JPEG
    }

    fn photometric(&self, color_space: ColorSpace) -> u16 {
        match color_space {
            ColorSpace::Rgb | ColorSpace::YCbCr => photometric::YCBCR,
            ColorSpace::Gray => photometric::BLACK_IS_ZERO,
        }
    }

    fn is_lossy(&self) -> bool {
        true
    }
}
