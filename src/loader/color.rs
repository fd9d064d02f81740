//! Color space conversion
//!
//! Decoded images are flattened to interleaved 8-bit samples in the target
//! color space. YCbCr uses the JFIF full-range transform.

use std::fmt;
use std::str::FromStr;

use image::DynamicImage;

use crate::tiff::constants::photometric;
use crate::tiff::errors::TiffError;

/// Color modes a page can be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Three channels, red/green/blue
    Rgb,
    /// Three channels, luma and two chroma differences
    YCbCr,
    /// One channel, 8-bit grayscale
    Gray,
}

impl ColorSpace {
    /// Number of 8-bit samples per pixel
    pub fn channels(&self) -> usize {
        match self {
            ColorSpace::Rgb | ColorSpace::YCbCr => 3,
            ColorSpace::Gray => 1,
        }
    }

    /// Canonical identifier, as accepted by `from_str`
    pub fn name(&self) -> &'static str {
        match self {
            ColorSpace::Rgb => "RGB",
            ColorSpace::YCbCr => "YCbCr",
            ColorSpace::Gray => "L",
        }
    }

    /// TIFF PhotometricInterpretation value for pages in this color space
    pub fn photometric(&self) -> u16 {
        match self {
            ColorSpace::Rgb => photometric::RGB,
            ColorSpace::YCbCr => photometric::YCBCR,
            ColorSpace::Gray => photometric::BLACK_IS_ZERO,
        }
    }

    /// Color space for a PhotometricInterpretation value, if we can decode it
    pub fn from_photometric(code: u16) -> Option<Self> {
        match code {
            photometric::RGB => Some(ColorSpace::Rgb),
            photometric::YCBCR => Some(ColorSpace::YCbCr),
            photometric::BLACK_IS_ZERO => Some(ColorSpace::Gray),
            _ => None,
        }
    }
}

impl FromStr for ColorSpace {
    type Err = TiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rgb" => Ok(ColorSpace::Rgb),
            "ycbcr" => Ok(ColorSpace::YCbCr),
            "l" | "gray" | "grey" => Ok(ColorSpace::Gray),
            _ => Err(TiffError::UnsupportedColorSpace(s.to_string())),
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert a decoded image into interleaved samples of `target`
///
/// Alpha is dropped; grayscale sources are expanded for the color targets.
pub fn convert(image: &DynamicImage, target: ColorSpace) -> Vec<u8> {
    match target {
        ColorSpace::Rgb => image.to_rgb8().into_raw(),
        ColorSpace::YCbCr => rgb_to_ycbcr(image.to_rgb8().as_raw()),
        ColorSpace::Gray => image.to_luma8().into_raw(),
    }
}

fn clamp_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// RGB triples to YCbCr triples (JFIF, full range)
pub fn rgb_to_ycbcr(rgb: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgb.len());

    for px in rgb.chunks_exact(3) {
        let (r, g, b) = (px[0] as f32, px[1] as f32, px[2] as f32);

        out.push(clamp_to_u8(0.299 * r + 0.587 * g + 0.114 * b));
        out.push(clamp_to_u8(128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b));
        out.push(clamp_to_u8(128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b));
    }

    out
}

/// YCbCr triples back to RGB triples (JFIF, full range)
pub fn ycbcr_to_rgb(ycbcr: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(ycbcr.len());

    for px in ycbcr.chunks_exact(3) {
        let y = px[0] as f32;
        let cb = px[1] as f32 - 128.0;
        let cr = px[2] as f32 - 128.0;

        out.push(clamp_to_u8(y + 1.402 * cr));
        out.push(clamp_to_u8(y - 0.344_136 * cb - 0.714_136 * cr));
        out.push(clamp_to_u8(y + 1.772 * cb));
    }

    out
}
