//! Image loading
//!
//! Decodes JPEG/PNG files, converts them to the page color space and
//! resolves their DPI.

pub mod color;
pub mod dpi;
mod image_loader;

#[cfg(test)]
mod tests;

pub use color::ColorSpace;
pub use dpi::Dpi;
pub use image_loader::ImageLoader;

/// A decoded, color-converted image ready to become one TIFF page
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Interleaved 8-bit samples in `color_space` order, row-major
    pub pixels: Vec<u8>,
    /// Color space of `pixels`
    pub color_space: ColorSpace,
    /// Resolution to record on the page
    pub dpi: Dpi,
    /// File name the image came from, for messages
    pub source_name: String,
}

impl LoadedImage {
    /// Bytes in one row of pixels
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.color_space.channels()
    }
}
