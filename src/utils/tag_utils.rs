//! TIFF tag utilities
//!
//! Utilities for reading tag value arrays and for naming tags and codes.

use byteorder::ReadBytesExt;

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFDEntry;
use crate::tiff::validation;
use crate::tiff::constants::{field_types, tags, compression, photometric, resolution_unit};

/// Reads an array of integer tag values based on the field type
///
/// The reader must already be positioned at the value array. The count
/// comes from the file, so the buffer never reserves more values than the
/// remaining bytes can hold.
pub fn read_tag_value_array(
    reader: &mut dyn SeekableReader,
    entry: &IFDEntry,
    handler: &dyn ByteOrderHandler,
) -> TiffResult<Vec<u32>> {
    let position = reader.stream_position()?;
    let remaining = validation::get_file_size(reader)?.saturating_sub(position);
    let capacity = (entry.count as u64).min(remaining / entry.get_field_type_size() as u64);
    let mut values = Vec::with_capacity(capacity as usize);

    for _ in 0..entry.count {
        let value = match entry.field_type {
            field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED => reader.read_u8()? as u32,
            field_types::SHORT | field_types::SSHORT => handler.read_u16(reader)? as u32,
            field_types::LONG | field_types::SLONG => handler.read_u32(reader)?,
            _ => return Err(TiffError::UnsupportedFieldType(entry.field_type)),
        };

        values.push(value);
    }

    Ok(values)
}

/// Get the name of a TIFF tag
///
/// If the tag is not recognized, returns "Unknown".
pub fn get_tag_name(tag: u16) -> &'static str {
    match tag {
        tags::NEW_SUBFILE_TYPE => "NewSubfileType",
        tags::IMAGE_WIDTH => "ImageWidth",
        tags::IMAGE_LENGTH => "ImageLength",
        tags::BITS_PER_SAMPLE => "BitsPerSample",
        tags::COMPRESSION => "Compression",
        tags::PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        tags::STRIP_OFFSETS => "StripOffsets",
        tags::SAMPLES_PER_PIXEL => "SamplesPerPixel",
        tags::ROWS_PER_STRIP => "RowsPerStrip",
        tags::STRIP_BYTE_COUNTS => "StripByteCounts",
        tags::X_RESOLUTION => "XResolution",
        tags::Y_RESOLUTION => "YResolution",
        tags::PLANAR_CONFIGURATION => "PlanarConfiguration",
        tags::RESOLUTION_UNIT => "ResolutionUnit",
        tags::PAGE_NUMBER => "PageNumber",
        tags::SOFTWARE => "Software",
        tags::YCBCR_SUBSAMPLING => "YCbCrSubSampling",
        _ => "Unknown",
    }
}

/// Get the name of a TIFF field type
pub fn get_field_type_name(field_type: u16) -> &'static str {
    match field_type {
        field_types::BYTE => "BYTE",
        field_types::ASCII => "ASCII",
        field_types::SHORT => "SHORT",
        field_types::LONG => "LONG",
        field_types::RATIONAL => "RATIONAL",
        field_types::SBYTE => "SBYTE",
        field_types::UNDEFINED => "UNDEFINED",
        field_types::SSHORT => "SSHORT",
        field_types::SLONG => "SLONG",
        field_types::SRATIONAL => "SRATIONAL",
        field_types::FLOAT => "FLOAT",
        field_types::DOUBLE => "DOUBLE",
        _ => "Unknown",
    }
}

/// Get the name of a compression method
pub fn get_compression_name(compression_code: u16) -> &'static str {
    match compression_code {
        compression::NONE => "None",
        compression::LZW => "LZW",
        compression::JPEG_OLD => "Old JPEG",
        compression::JPEG => "JPEG",
        compression::DEFLATE => "Adobe Deflate",
        compression::ZSTD => "Zstandard",
        compression::PACKBITS => "PackBits",
        _ => "Unknown",
    }
}

/// Get the name of a photometric interpretation
pub fn get_photometric_name(photometric_code: u16) -> &'static str {
    match photometric_code {
        photometric::WHITE_IS_ZERO => "WhiteIsZero",
        photometric::BLACK_IS_ZERO => "BlackIsZero",
        photometric::RGB => "RGB",
        photometric::PALETTE => "Palette",
        photometric::CMYK => "CMYK",
        photometric::YCBCR => "YCbCr",
        _ => "Unknown",
    }
}

/// Get the name of a resolution unit
pub fn get_resolution_unit_name(unit: u16) -> &'static str {
    match unit {
        resolution_unit::NONE => "none",
        resolution_unit::INCH => "inch",
        resolution_unit::CENTIMETER => "cm",
        _ => "unknown",
    }
}

/// Formats a tag's raw value with a symbolic name where one exists
pub fn describe_value(tag: u16, value: u32) -> String {
    match tag {
        tags::COMPRESSION => format!("{} ({})", value, get_compression_name(value as u16)),
        tags::PHOTOMETRIC_INTERPRETATION => format!("{} ({})", value, get_photometric_name(value as u16)),
        tags::RESOLUTION_UNIT => format!("{} ({})", value, get_resolution_unit_name(value as u16)),
        _ => value.to_string(),
    }
}
