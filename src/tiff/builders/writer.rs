//! TIFF writing strategies
//!
//! This module handles writing assembled IFDs and their data to disk.
//! Writing a valid TIFF requires careful management of offsets, ordering,
//! and alignment so the file can be read by other software.

use crate::tiff::ifd::IFD;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::constants::{header, tags};
use crate::utils::write_utils;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Offsets of out-of-line data, keyed by (IFD index, tag)
type OffsetMap = BTreeMap<(usize, u16), u32>;

/// Handles writing TIFF files to disk
pub struct WriterBuilder;

impl WriterBuilder {
    /// Write a complete TIFF file to disk
    ///
    /// The file is assembled in a hidden sibling of `output_path` and renamed
    /// over the target only once it is complete, so an existing output is
    /// either fully replaced or left untouched. Every failure is reported as
    /// `TiffError::WriteError`.
    pub fn write(
        ifds: &[IFD],
        image_data: &BTreeMap<usize, Vec<u8>>,
        external_data: &BTreeMap<(usize, u16), Vec<u8>>,
        output_path: &Path
    ) -> TiffResult<()> {
        info!("Writing TIFF to {}", output_path.display());

        let temp_path = Self::temp_path_for(output_path)?;
        debug!("Staging output in {}", temp_path.display());

        let staged = Self::write_to(ifds, image_data, external_data, &temp_path)
            .and_then(|_| fs::rename(&temp_path, output_path).map_err(TiffError::from));

        if let Err(e) = staged {
            if temp_path.exists() {
                if let Err(cleanup) = fs::remove_file(&temp_path) {
                    warn!("Could not remove {}: {}", temp_path.display(), cleanup);
                }
            }
            return Err(match e {
                TiffError::WriteError(msg) => TiffError::WriteError(msg),
                other => TiffError::WriteError(format!("{}: {}", output_path.display(), other)),
            });
        }

        Ok(())
    }

    /// Hidden sibling file used while the TIFF is being assembled
    fn temp_path_for(output_path: &Path) -> TiffResult<PathBuf> {
        let file_name = output_path.file_name()
            .ok_or_else(|| TiffError::WriteError(format!(
                "Output path has no file name: {}", output_path.display())))?;

        Ok(output_path.with_file_name(format!(".{}.partial", file_name.to_string_lossy())))
    }

    /// Write the whole file at `path`
    fn write_to(
        ifds: &[IFD],
        image_data: &BTreeMap<usize, Vec<u8>>,
        external_data: &BTreeMap<(usize, u16), Vec<u8>>,
        path: &Path
    ) -> TiffResult<()> {
        // Sort IFD entries by tag number as required by the TIFF format
        let sorted_ifds = Self::prepare_sorted_ifds(ifds);

        // Calculate all offsets before touching the disk
        let (ifd_offsets, tag_data_offsets) = Self::calculate_offsets(
            &sorted_ifds, external_data, image_data)?;

        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(1024 * 1024, file);

        Self::write_header(&mut writer, ifd_offsets.first().copied().unwrap_or(0))?;
        Self::write_ifds(&mut writer, &sorted_ifds, &ifd_offsets, &tag_data_offsets)?;
        Self::write_external_data(&mut writer, external_data, &tag_data_offsets)?;
        Self::write_image_data(&mut writer, image_data, &tag_data_offsets)?;

        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }

    /// Prepare IFDs with entries in ascending tag order
    fn prepare_sorted_ifds(ifds: &[IFD]) -> Vec<IFD> {
        ifds.iter().map(|ifd| {
            let mut sorted_ifd = ifd.clone();
            sorted_ifd.entries = ifd.sorted_entries();
            sorted_ifd
        }).collect()
    }

    /// Calculate offsets for IFDs, external tag data and strip data
    ///
    /// Layout: header, all IFDs, all external tag data, all strip data.
    fn calculate_offsets(
        sorted_ifds: &[IFD],
        external_data: &BTreeMap<(usize, u16), Vec<u8>>,
        image_data: &BTreeMap<usize, Vec<u8>>
    ) -> TiffResult<(Vec<u32>, OffsetMap)> {
        let mut current_offset = header::HEADER_SIZE;
        let mut ifd_offsets = Vec::with_capacity(sorted_ifds.len());
        let mut tag_data_offsets = OffsetMap::new();

        // First pass: IFD offsets
        for ifd in sorted_ifds {
            ifd_offsets.push(Self::checked_offset(current_offset)?);
            current_offset += ifd.byte_size();
        }

        // Second pass: tag data that does not fit inline
        for ((ifd_index, tag), data) in external_data {
            tag_data_offsets.insert((*ifd_index, *tag), Self::checked_offset(current_offset)?);
            current_offset = write_utils::align_to_4_bytes(current_offset + data.len() as u64);
        }

        // Third pass: strip data, one strip per IFD
        for (ifd_index, data) in image_data {
            tag_data_offsets.insert((*ifd_index, tags::STRIP_OFFSETS), Self::checked_offset(current_offset)?);
            current_offset = write_utils::align_to_4_bytes(current_offset + data.len() as u64);
        }

        Self::checked_offset(current_offset)?;
        Ok((ifd_offsets, tag_data_offsets))
    }

    /// Classic TIFF addresses everything with 32-bit offsets
    fn checked_offset(offset: u64) -> TiffResult<u32> {
        u32::try_from(offset).map_err(|_| TiffError::WriteError(format!(
            "Output exceeds the 4 GiB classic TIFF limit (offset {})", offset)))
    }

    /// Write the TIFF header
    ///
    /// Byte order marker (always little-endian), version 42, and the offset
    /// of the first IFD.
    fn write_header(writer: &mut impl Write, first_ifd_offset: u32) -> TiffResult<()> {
        writer.write_all(&header::LITTLE_ENDIAN_MARKER)?;
        writer.write_all(&header::TIFF_VERSION.to_le_bytes())?;
        writer.write_all(&first_ifd_offset.to_le_bytes())?;
        Ok(())
    }

    /// Write all IFDs to the file, chained in page order
    fn write_ifds(
        writer: &mut (impl Write + Seek),
        sorted_ifds: &[IFD],
        ifd_offsets: &[u32],
        tag_data_offsets: &OffsetMap
    ) -> TiffResult<()> {
        for (i, ifd) in sorted_ifds.iter().enumerate() {
            // Offset to next IFD, or 0 for the last page
            let next_ifd_offset = ifd_offsets.get(i + 1).copied().unwrap_or(0);

            writer.seek(SeekFrom::Start(ifd_offsets[i] as u64))?;
            Self::write_ifd(writer, ifd, next_ifd_offset, tag_data_offsets, i)?;
        }

        Ok(())
    }

    /// Write all external tag data
    fn write_external_data(
        writer: &mut (impl Write + Seek),
        external_data: &BTreeMap<(usize, u16), Vec<u8>>,
        tag_data_offsets: &OffsetMap
    ) -> TiffResult<()> {
        for (key, data) in external_data {
            if let Some(offset) = tag_data_offsets.get(key) {
                writer.seek(SeekFrom::Start(*offset as u64))?;
                writer.write_all(data)?;
                write_utils::write_padding(writer, data.len())?;
            }
        }

        Ok(())
    }

    /// Write all strip data
    fn write_image_data(
        writer: &mut (impl Write + Seek),
        image_data: &BTreeMap<usize, Vec<u8>>,
        tag_data_offsets: &OffsetMap
    ) -> TiffResult<()> {
        for (ifd_index, data) in image_data {
            if let Some(offset) = tag_data_offsets.get(&(*ifd_index, tags::STRIP_OFFSETS)) {
                writer.seek(SeekFrom::Start(*offset as u64))?;
                writer.write_all(data)?;
                write_utils::write_padding(writer, data.len())?;
            }
        }

        Ok(())
    }

    /// Write one IFD: entry count, entries, next IFD offset
    fn write_ifd(
        writer: &mut (impl Write + Seek),
        ifd: &IFD,
        next_offset: u32,
        tag_offsets: &OffsetMap,
        ifd_index: usize
    ) -> TiffResult<()> {
        writer.write_all(&(ifd.entries.len() as u16).to_le_bytes())?;

        for entry in &ifd.entries {
            // External data and strips get their real offset here
            let value_offset = tag_offsets.get(&(ifd_index, entry.tag))
                .copied()
                .unwrap_or(entry.value_offset);

            writer.write_all(&entry.tag.to_le_bytes())?;
            writer.write_all(&entry.field_type.to_le_bytes())?;
            writer.write_all(&entry.count.to_le_bytes())?;
            writer.write_all(&value_offset.to_le_bytes())?;
        }

        writer.write_all(&next_offset.to_le_bytes())?;
        Ok(())
    }
}
