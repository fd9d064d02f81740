//! Page-level view of a TIFF file
//!
//! Summarises each IFD of a file and decodes single-strip pages back to
//! interleaved samples.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;

use crate::compression::{CompressionFactory, StripLayout};
use crate::loader::ColorSpace;
use crate::tiff::constants::{resolution_unit, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::reader::TiffReader;
use crate::utils::tag_utils;

/// Summary of one page (IFD)
#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    /// 0-based position in the IFD chain
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub compression: u16,
    pub photometric: Option<u16>,
    /// Horizontal and vertical resolution, if both are recorded
    pub resolution: Option<(f64, f64)>,
    pub resolution_unit: u16,
}

impl PageInfo {
    /// Resolution rounded to whole dots per inch
    pub fn dpi(&self) -> Option<(u32, u32)> {
        let to_inch = match self.resolution_unit {
            resolution_unit::INCH => 1.0,
            resolution_unit::CENTIMETER => 2.54,
            _ => return None,
        };

        self.resolution.map(|(x, y)| ((x * to_inch).round() as u32, (y * to_inch).round() as u32))
    }
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {}: {}x{}, {} samples/pixel, compression {}",
               self.index + 1, self.width, self.height, self.samples_per_pixel,
               tag_utils::get_compression_name(self.compression))?;

        match self.photometric {
            Some(p) => write!(f, ", photometric {}", tag_utils::get_photometric_name(p))?,
            None => write!(f, ", photometric not set")?,
        }

        match self.resolution {
            Some((x, y)) => write!(f, ", resolution {}x{} per {}",
                                   x, y, tag_utils::get_resolution_unit_name(self.resolution_unit)),
            None => write!(f, ", no resolution"),
        }
    }
}

fn open(path: &Path) -> TiffResult<BufReader<File>> {
    let file = File::open(path)?;
    Ok(BufReader::new(file))
}

/// Lists the pages of a TIFF file in chain order
pub fn read_pages(path: &Path) -> TiffResult<Vec<PageInfo>> {
    let mut reader = open(path)?;
    let mut tiff_reader = TiffReader::new();
    let tiff = tiff_reader.read(&mut reader)?;

    let mut pages = Vec::with_capacity(tiff.page_count());
    for ifd in &tiff.ifds {
        let (width, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;

        let x = tiff_reader.read_resolution(&mut reader, ifd, tags::X_RESOLUTION);
        let y = tiff_reader.read_resolution(&mut reader, ifd, tags::Y_RESOLUTION);
        let resolution = x.zip(y);

        pages.push(PageInfo {
            index: ifd.number,
            width,
            height,
            samples_per_pixel: ifd.get_samples_per_pixel(),
            compression: ifd.get_compression(),
            photometric: ifd.get_photometric(),
            resolution,
            resolution_unit: ifd.get_tag_value(tags::RESOLUTION_UNIT)
                .map(|v| v as u16)
                .unwrap_or(resolution_unit::INCH),
        });
    }

    Ok(pages)
}

/// Decodes page `index` to interleaved samples in its stored color space
pub fn read_page_pixels(path: &Path, index: usize) -> TiffResult<(StripLayout, Vec<u8>)> {
    let mut reader = open(path)?;
    let mut tiff_reader = TiffReader::new();
    let tiff = tiff_reader.read(&mut reader)?;

    let ifd = tiff.ifds.get(index).ok_or_else(|| TiffError::GenericError(format!(
        "Page {} requested but the file has {} pages", index, tiff.page_count())))?;

    let (width, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;
    let photometric = ifd.get_photometric().ok_or(TiffError::TagNotFound(tags::PHOTOMETRIC_INTERPRETATION))?;
    let color_space = ColorSpace::from_photometric(photometric).ok_or_else(|| TiffError::UnsupportedColorSpace(
        tag_utils::get_photometric_name(photometric).to_string()))?;

    let layout = StripLayout { width, height, color_space };
    let handler = CompressionFactory::create_handler(ifd.get_compression())?;

    let strip = tiff_reader.read_strip_data(&mut reader, ifd)?;
    debug!("Page {}: {} bytes of {} data", index, strip.len(), handler.name());

    let pixels = handler.decompress(&strip, &layout)?;
    if pixels.len() != layout.expected_len() {
        return Err(TiffError::GenericError(format!(
            "Page {} decoded to {} bytes, expected {}", index, pixels.len(), layout.expected_len())));
    }

    Ok((layout, pixels))
}
