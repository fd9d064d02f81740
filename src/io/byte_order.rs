//! Byte order handling for TIFF structures
//!
//! TIFF files and the EXIF blocks embedded in JPEGs may be stored in either
//! byte order. The handler trait hides the difference from the readers.

use byteorder::{BigEndian, ByteOrder as _, LittleEndian, ReadBytesExt};
use std::io::Result;

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};

/// Byte order of a TIFF structure, as named by its two marker bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// "II", least significant byte first
    LittleEndian,
    /// "MM", most significant byte first
    BigEndian,
}

impl ByteOrder {
    /// Reads the two marker bytes that open every TIFF header
    pub fn detect(reader: &mut dyn SeekableReader) -> TiffResult<Self> {
        let mut marker = [0u8; 2];
        reader.read_exact(&mut marker)?;

        Self::from_marker(marker).ok_or_else(|| TiffError::InvalidByteOrder(u16::from_le_bytes(marker)))
    }

    pub fn from_marker(marker: [u8; 2]) -> Option<Self> {
        if marker == header::LITTLE_ENDIAN_MARKER {
            Some(ByteOrder::LittleEndian)
        } else if marker == header::BIG_ENDIAN_MARKER {
            Some(ByteOrder::BigEndian)
        } else {
            None
        }
    }

    pub fn marker(&self) -> [u8; 2] {
        match self {
            ByteOrder::LittleEndian => header::LITTLE_ENDIAN_MARKER,
            ByteOrder::BigEndian => header::BIG_ENDIAN_MARKER,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Handler that reads values in this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Reads multi-byte values in one fixed byte order
pub trait ByteOrderHandler: Send + Sync {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;

    /// Decodes a SHORT held in the first two bytes of a value field
    fn decode_u16(&self, bytes: [u8; 2]) -> u16;

    /// Decodes a LONG held in a value field
    fn decode_u32(&self, bytes: [u8; 4]) -> u32;

    /// RATIONAL as (numerator, denominator)
    fn read_rational(&self, reader: &mut dyn SeekableReader) -> Result<(u32, u32)> {
        let numerator = self.read_u32(reader)?;
        let denominator = self.read_u32(reader)?;
        Ok((numerator, denominator))
    }
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<LittleEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<LittleEndian>()
    }

    fn decode_u16(&self, bytes: [u8; 2]) -> u16 {
        LittleEndian::read_u16(&bytes)
    }

    fn decode_u32(&self, bytes: [u8; 4]) -> u32 {
        LittleEndian::read_u32(&bytes)
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<BigEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<BigEndian>()
    }

    fn decode_u16(&self, bytes: [u8; 2]) -> u16 {
        BigEndian::read_u16(&bytes)
    }

    fn decode_u32(&self, bytes: [u8; 4]) -> u32 {
        BigEndian::read_u32(&bytes)
    }
}
