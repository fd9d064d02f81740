//! Resolution metadata
//!
//! Finds the DPI recorded in a PNG `pHYs` chunk, a JPEG JFIF header or a
//! JPEG EXIF block. Anything missing, zero or malformed is reported as
//! absent so the caller can fall back to its default.

use std::fmt;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::str::FromStr;

use byteorder::{BigEndian, ReadBytesExt};
use log::debug;

use crate::tiff::constants::{resolution_unit, tags};
use crate::tiff::errors::TiffError;
use crate::tiff::reader::TiffReader;
use crate::utils::format_utils;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const INCHES_PER_METRE: f64 = 0.0254;
const CM_PER_INCH: f64 = 2.54;

// JPEG markers
const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;
const APP0: u8 = 0xE0;
const APP1: u8 = 0xE1;

/// Horizontal and vertical dots per inch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dpi {
    pub x: u32,
    pub y: u32,
}

impl Dpi {
    pub const fn new(x: u32, y: u32) -> Self {
        Dpi { x, y }
    }

    /// Rounds a measured resolution; `None` unless both axes round above zero
    pub fn from_float(x: f64, y: f64) -> Option<Self> {
        let round = |v: f64| -> Option<u32> {
            let r = v.round();
            (r.is_finite() && r >= 1.0 && r <= u32::MAX as f64).then_some(r as u32)
        };

        Some(Dpi::new(round(x)?, round(y)?))
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Dpi::new(100, 100)
    }
}

impl fmt::Display for Dpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

/// Parses `"X,Y"` (or a single `"N"` for both axes)
impl FromStr for Dpi {
    type Err = TiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| -> Result<u32, TiffError> {
            match part.trim().parse::<u32>() {
                Ok(v) if v > 0 => Ok(v),
                _ => Err(TiffError::ConfigError(format!("Invalid DPI value: '{}'", s))),
            }
        };

        match s.split_once(',') {
            Some((x, y)) => Ok(Dpi::new(parse(x)?, parse(y)?)),
            None => {
                let v = parse(s)?;
                Ok(Dpi::new(v, v))
            }
        }
    }
}

/// Looks for resolution metadata in an encoded PNG or JPEG file
pub fn read_embedded_dpi(data: &[u8]) -> Option<Dpi> {
    if data.starts_with(&PNG_SIGNATURE) {
        png_dpi(data)
    } else if data.len() >= 2 && data[0] == 0xFF && data[1] == SOI {
        jpeg_dpi(data)
    } else {
        None
    }
}

/// Reads the `pHYs` chunk; only the metre unit carries a physical size
fn png_dpi(data: &[u8]) -> Option<Dpi> {
    let mut cursor = Cursor::new(data);
    cursor.seek(SeekFrom::Start(PNG_SIGNATURE.len() as u64)).ok()?;

    loop {
        let length = cursor.read_u32::<BigEndian>().ok()?;
        let mut chunk_type = [0u8; 4];
        cursor.read_exact(&mut chunk_type).ok()?;

        match &chunk_type {
            b"pHYs" if length >= 9 => {
                let ppu_x = cursor.read_u32::<BigEndian>().ok()?;
                let ppu_y = cursor.read_u32::<BigEndian>().ok()?;
                let unit = cursor.read_u8().ok()?;
                debug!("PNG pHYs: {}x{} per unit, unit={}", ppu_x, ppu_y, unit);

                return match unit {
                    1 => Dpi::from_float(ppu_x as f64 * INCHES_PER_METRE, ppu_y as f64 * INCHES_PER_METRE),
                    _ => None,
                };
            },
            // pHYs must precede the image data
            b"IDAT" | b"IEND" => return None,
            _ => {
                cursor.seek(SeekFrom::Current(length as i64 + 4)).ok()?;
            }
        }
    }
}

/// Scans JPEG header segments for JFIF density, then EXIF resolution
fn jpeg_dpi(data: &[u8]) -> Option<Dpi> {
    let mut jfif = None;
    let mut exif = None;
    let mut pos = 2;

    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            debug!("JPEG marker expected at {}, stopping header scan", pos);
            break;
        }

        let marker = data[pos + 1];
        pos += 2;

        match marker {
            // Fill bytes
            0xFF => {
                pos -= 1;
                continue;
            },
            EOI | SOS => break,
            // Markers without a length field
            0x01 | 0xD0..=0xD7 => continue,
            _ => {}
        }

        if pos + 2 > data.len() {
            break;
        }
        let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        if length < 2 || pos + length > data.len() {
            break;
        }
        let segment = &data[pos + 2..pos + length];

        match marker {
            APP0 if jfif.is_none() => jfif = jfif_density(segment),
            APP1 if exif.is_none() && segment.starts_with(b"Exif\0\0") => exif = Some(&segment[6..]),
            _ => {}
        }

        pos += length;
    }

    jfif.or_else(|| exif.and_then(exif_resolution))
}

/// JFIF APP0: identifier, version, units, X density, Y density
fn jfif_density(segment: &[u8]) -> Option<Dpi> {
    if segment.len() < 12 || !segment.starts_with(b"JFIF\0") {
        return None;
    }

    let units = segment[7];
    let x = u16::from_be_bytes([segment[8], segment[9]]) as f64;
    let y = u16::from_be_bytes([segment[10], segment[11]]) as f64;
    debug!("JFIF density: {}x{}, units={}", x, y, units);

    match units {
        1 => Dpi::from_float(x, y),
        2 => Dpi::from_float(x * CM_PER_INCH, y * CM_PER_INCH),
        // 0 is a bare aspect ratio
        _ => None,
    }
}

/// EXIF IFD0 XResolution/YResolution with ResolutionUnit
fn exif_resolution(exif: &[u8]) -> Option<Dpi> {
    if !format_utils::has_tiff_header(exif) {
        return None;
    }

    let mut cursor = Cursor::new(exif);
    let mut reader = TiffReader::new();
    let tiff = match reader.read(&mut cursor) {
        Ok(tiff) => tiff,
        Err(e) => {
            debug!("Unreadable EXIF block: {}", e);
            return None;
        }
    };

    let ifd0 = tiff.main_ifd()?;
    let x = reader.read_resolution(&mut cursor, ifd0, tags::X_RESOLUTION)?;
    let y = reader.read_resolution(&mut cursor, ifd0, tags::Y_RESOLUTION)?;
    let unit = ifd0.get_tag_value(tags::RESOLUTION_UNIT)
        .map(|v| v as u16)
        .unwrap_or(resolution_unit::INCH);
    debug!("EXIF resolution: {}x{}, unit={}", x, y, unit);

    match unit {
        resolution_unit::INCH => Dpi::from_float(x, y),
        resolution_unit::CENTIMETER => Dpi::from_float(x * CM_PER_INCH, y * CM_PER_INCH),
        _ => None,
    }
}
