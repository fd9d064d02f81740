//! Compression handler trait definition

use crate::loader::ColorSpace;
use crate::tiff::errors::TiffResult;

/// Shape of the pixel data held in one strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
}

impl StripLayout {
    /// Size of the strip once decompressed
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.color_space.channels()
    }
}

/// Strategy trait for handling different compression methods
pub trait CompressionHandler: Send + Sync {
    /// Decompress a strip back to interleaved samples in the layout's color space
    fn decompress(&self, data: &[u8], layout: &StripLayout) -> TiffResult<Vec<u8>>;

    /// Compress a strip of interleaved samples
    fn compress(&self, data: &[u8], layout: &StripLayout) -> TiffResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the TIFF compression code
    fn code(&self) -> u16;

    /// Photometric interpretation of a strip compressed from `color_space`
    fn photometric(&self, color_space: ColorSpace) -> u16 {
        color_space.photometric()
    }

    /// Whether a round trip may change pixel values
    fn is_lossy(&self) -> bool {
        false
    }
}
