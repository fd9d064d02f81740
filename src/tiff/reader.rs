//! TIFF file reader implementation
//!
//! Reads the IFD chain of a classic TIFF in either byte order. It is used to
//! inspect written output and to pull resolution tags out of EXIF blocks.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, SeekFrom};
use std::path::Path;

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::tiff::constants::{field_types, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;
use crate::tiff::validation;
use crate::utils::format_utils;
use crate::utils::tag_utils;

/// Upper bound on IFDs followed in one chain
const MAX_IFDS: usize = 65_535;

/// Reader for classic TIFF structures
pub struct TiffReader {
    /// Current byte order handler
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Byte order of the structure being read
    byte_order: Option<ByteOrder>,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    /// Creates a new TIFF reader
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            byte_order: None,
        }
    }

    /// Returns the byte order handler, with proper error handling for None case
    fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler.as_deref()
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Byte order detected by the last call to `read`
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order
    }

    /// Loads a TIFF file from the given path
    pub fn load(&mut self, filepath: &Path) -> TiffResult<TIFF> {
        info!("Loading TIFF file: {}", filepath.display());

        let file = File::open(filepath)?;
        let mut reader = BufReader::with_capacity(1024 * 1024, file);

        self.read(&mut reader)
    }

    /// Reads a TIFF structure from the given reader
    ///
    /// 1. Detect byte order (little/big endian)
    /// 2. Check the version number (only classic TIFF is accepted)
    /// 3. Follow the IFD chain
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        reader.seek(SeekFrom::Start(0))?;

        let byte_order = ByteOrder::detect(reader)?;
        debug!("Detected byte order: {}", byte_order.name());
        self.byte_order = Some(byte_order);
        self.byte_order_handler = Some(byte_order.create_handler());

        let handler = self.handler()?;
        format_utils::check_tiff_version(reader, handler)?;

        let first_ifd_offset = handler.read_u32(reader)? as u64;
        debug!("First IFD offset: {}", first_ifd_offset);

        let file_size = validation::get_file_size(reader)?;
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        let mut tiff = TIFF::new();
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;

        debug!("Read {} IFDs", tiff.ifds.len());
        Ok(tiff)
    }

    /// Reads a chain of IFDs starting from the given offset
    ///
    /// A malformed link ends the chain with a warning instead of failing the
    /// whole read; the IFDs read so far are kept.
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first_ifd_offset: u64, file_size: u64) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut visited = HashSet::new();
        let mut ifd_offset = first_ifd_offset;
        let handler = self.handler()?;

        while ifd_offset != 0 && ifds.len() < MAX_IFDS {
            if !visited.insert(ifd_offset) {
                warn!("IFD chain loops back to offset {}, stopping", ifd_offset);
                break;
            }

            if ifd_offset >= file_size {
                warn!("IFD offset {} exceeds file size {}, stopping IFD chain", ifd_offset, file_size);
                break;
            }

            let ifd = match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok(ifd) => ifd,
                Err(e) => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
            };

            // read_ifd leaves the reader just past the last entry
            let next_ifd_offset = match handler.read_u32(reader) {
                Ok(offset) => offset as u64,
                Err(e) => {
                    warn!("Error reading next IFD offset: {}", e);
                    ifds.push(ifd);
                    break;
                }
            };

            debug!("Next IFD offset: {}", next_ifd_offset);
            ifds.push(ifd);

            if next_ifd_offset != 0 && validation::validate_ifd_offset(next_ifd_offset, file_size).is_err() {
                warn!("Invalid next IFD offset: {}, stopping IFD chain", next_ifd_offset);
                break;
            }
            ifd_offset = next_ifd_offset;
        }

        Ok(ifds)
    }

    /// Reads an IFD from the reader
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;

        let handler = self.handler()?;
        let entry_count = handler.read_u16(reader)?;
        debug!("IFD #{} at {} has {} entries", number, offset, entry_count);

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader)?;
            ifd.add_entry(entry);
        }

        Ok(ifd)
    }

    /// Reads a single IFD entry
    ///
    /// Inline values are decoded with the file's byte order, so a SHORT
    /// stored in a big-endian file reads back as the value itself.
    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> TiffResult<IFDEntry> {
        let handler = self.handler()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = handler.read_u32(reader)?;

        let mut raw = [0u8; 4];
        reader.read_exact(&mut raw)?;

        let mut entry = IFDEntry::new(tag, field_type, count, 0);
        entry.value_offset = match (entry.is_value_inline(), entry.get_field_type_size()) {
            (true, 1) => raw[0] as u32,
            (true, 2) => handler.decode_u16([raw[0], raw[1]]) as u32,
            _ => handler.decode_u32(raw),
        };

        Ok(entry)
    }

    /// Reads a tag's integer values
    ///
    /// For inline entries only the first value is returned, as that is all
    /// the normalised entry keeps.
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u32>> {
        let entry = ifd.get_entry(tag)
            .ok_or(TiffError::TagNotFound(tag))?;

        if entry.is_value_inline() {
            return Ok(vec![entry.value_offset]);
        }

        reader.seek(SeekFrom::Start(entry.value_offset as u64))?;
        tag_utils::read_tag_value_array(reader, entry, self.handler()?)
    }

    /// Reads a RATIONAL tag as numerator/denominator pairs
    pub fn read_rational_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<(u32, u32)>> {
        let entry = ifd.get_entry(tag)
            .ok_or(TiffError::TagNotFound(tag))?;

        if entry.field_type != field_types::RATIONAL {
            return Err(TiffError::UnsupportedFieldType(entry.field_type));
        }

        let handler = self.handler()?;
        reader.seek(SeekFrom::Start(entry.value_offset as u64))?;

        (0..entry.count)
            .map(|_| handler.read_rational(reader).map_err(TiffError::IoError))
            .collect()
    }

    /// Reads a resolution tag as a float, if present and well-formed
    pub fn read_resolution(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> Option<f64> {
        match self.read_rational_values(reader, ifd, tag) {
            Ok(values) => values.first()
                .filter(|(_, den)| *den != 0)
                .map(|(num, den)| *num as f64 / *den as f64),
            Err(e) => {
                debug!("No usable {} in IFD #{}: {}", tag_utils::get_tag_name(tag), ifd.number, e);
                None
            }
        }
    }

    /// Reads the raw (still compressed) strip data of an IFD
    ///
    /// All strips are concatenated in order.
    pub fn read_strip_data(&self, reader: &mut dyn SeekableReader, ifd: &IFD) -> TiffResult<Vec<u8>> {
        let offsets = self.read_tag_values(reader, ifd, tags::STRIP_OFFSETS)?;
        let byte_counts = self.read_tag_values(reader, ifd, tags::STRIP_BYTE_COUNTS)?;

        if offsets.len() != byte_counts.len() {
            return Err(TiffError::GenericError(format!(
                "IFD #{} has {} strip offsets but {} byte counts",
                ifd.number, offsets.len(), byte_counts.len())));
        }

        let file_size = validation::get_file_size(reader)?;
        let mut data = Vec::with_capacity(byte_counts.iter().map(|&c| c as usize).sum());

        for (&offset, &count) in offsets.iter().zip(byte_counts.iter()) {
            if offset as u64 + count as u64 > file_size {
                return Err(TiffError::GenericError(format!(
                    "Strip at {} ({} bytes) runs past end of file", offset, count)));
            }

            reader.seek(SeekFrom::Start(offset as u64))?;
            let start = data.len();
            data.resize(start + count as usize, 0);
            reader.read_exact(&mut data[start..])?;
        }

        Ok(data)
    }
}
