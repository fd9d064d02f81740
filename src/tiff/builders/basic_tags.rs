//! Basic TIFF tag strategies
//!
//! This module provides functionality for adding the baseline tags every
//! page needs: dimensions, color layout, strips, resolution and paging.

use std::collections::BTreeMap;

use crate::loader::{ColorSpace, Dpi};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::constants::{tags, field_types, photometric, planar_config, resolution_unit, new_subfile_type};
use crate::utils::write_utils;
use log::{debug, trace};

/// Out-of-line tag data, keyed by (IFD index, tag)
pub type ExternalData = BTreeMap<(usize, u16), Vec<u8>>;

/// Adds basic TIFF tags to an IFD
pub struct BasicTagsBuilder;

impl BasicTagsBuilder {
    /// Add bits per sample values for an IFD
    ///
    /// A single value fits in the entry itself; RGB and YCbCr pages need an
    /// array of three SHORTs stored outside the IFD.
    pub fn add_bits_per_sample(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        ifd_index: usize,
        bits_per_channel: &[u16]
    ) {
        debug!("Adding BitsPerSample: {:?}", bits_per_channel);

        let count = bits_per_channel.len() as u32;

        if count == 1 {
            ifd.add_entry(IFDEntry::new(
                tags::BITS_PER_SAMPLE,
                field_types::SHORT,
                1,
                bits_per_channel[0] as u32)
            );
        } else {
            let mut data = Vec::with_capacity(bits_per_channel.len() * 2);
            for &bits in bits_per_channel {
                data.extend_from_slice(&bits.to_le_bytes());
            }

            ifd.add_entry(IFDEntry::new(
                tags::BITS_PER_SAMPLE,
                field_types::SHORT,
                count,
                0)
            );
            external_data.insert((ifd_index, tags::BITS_PER_SAMPLE), data);
        }
    }

    /// Setup single strip for an IFD
    ///
    /// The strip offset is a placeholder until the writer lays out the file.
    pub fn setup_single_strip(
        ifd: &mut IFD,
        image_data: &mut BTreeMap<usize, Vec<u8>>,
        ifd_index: usize,
        strip_data: Vec<u8>
    ) {
        debug!("Setting up single strip for IFD #{}: {} bytes", ifd_index, strip_data.len());

        ifd.add_entry(IFDEntry::new(
            tags::STRIP_OFFSETS,
            field_types::LONG,
            1,
            0)
        );

        ifd.add_entry(IFDEntry::new(
            tags::STRIP_BYTE_COUNTS,
            field_types::LONG,
            1,
            strip_data.len() as u32)
        );

        // One strip covers every row
        if let Some((_, height)) = ifd.get_dimensions() {
            ifd.add_entry(IFDEntry::new(
                tags::ROWS_PER_STRIP,
                field_types::LONG,
                1,
                height)
            );
        }

        image_data.insert(ifd_index, strip_data);
    }

    /// Add the layout tags of an 8-bit page in `color_space`
    pub fn add_page_tags(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        ifd_index: usize,
        width: u32,
        height: u32,
        color_space: ColorSpace,
        compression_code: u16,
        photometric_code: u16
    ) {
        debug!("Adding page tags for {}x{} {} image (photometric {})",
               width, height, color_space, photometric_code);

        ifd.add_entry(IFDEntry::new(tags::IMAGE_WIDTH, field_types::LONG, 1, width));
        ifd.add_entry(IFDEntry::new(tags::IMAGE_LENGTH, field_types::LONG, 1, height));

        let channels = color_space.channels();
        Self::add_bits_per_sample(ifd, external_data, ifd_index, &vec![8u16; channels]);

        ifd.add_entry(IFDEntry::new(
            tags::COMPRESSION,
            field_types::SHORT,
            1,
            compression_code as u32)
        );

        ifd.add_entry(IFDEntry::new(
            tags::PHOTOMETRIC_INTERPRETATION,
            field_types::SHORT,
            1,
            photometric_code as u32)
        );

        ifd.add_entry(IFDEntry::new(
            tags::SAMPLES_PER_PIXEL,
            field_types::SHORT,
            1,
            channels as u32)
        );

        // Samples are interleaved (YCbCrYCbCr...)
        ifd.add_entry(IFDEntry::new(
            tags::PLANAR_CONFIGURATION,
            field_types::SHORT,
            1,
            planar_config::CHUNKY as u32)
        );

        // Chroma is stored at full resolution
        if photometric_code == photometric::YCBCR {
            ifd.add_entry(IFDEntry::new(
                tags::YCBCR_SUBSAMPLING,
                field_types::SHORT,
                2,
                write_utils::pack_shorts(1, 1))
            );
        }
    }

    /// Add XResolution/YResolution in dots per inch
    pub fn add_resolution(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        ifd_index: usize,
        dpi: Dpi
    ) {
        trace!("Adding resolution {} to IFD #{}", dpi, ifd_index);

        for (tag, value) in [(tags::X_RESOLUTION, dpi.x), (tags::Y_RESOLUTION, dpi.y)] {
            ifd.add_entry(IFDEntry::new(tag, field_types::RATIONAL, 1, 0));
            external_data.insert((ifd_index, tag), write_utils::rational_le_bytes(value, 1).to_vec());
        }

        ifd.add_entry(IFDEntry::new(
            tags::RESOLUTION_UNIT,
            field_types::SHORT,
            1,
            resolution_unit::INCH as u32)
        );
    }

    /// Add PageNumber (0-based index, total) and mark multi-page members
    pub fn add_page_number(ifd: &mut IFD, page: u16, total: u16) {
        ifd.add_entry(IFDEntry::new(
            tags::PAGE_NUMBER,
            field_types::SHORT,
            2,
            write_utils::pack_shorts(page, total))
        );

        if total > 1 {
            ifd.add_entry(IFDEntry::new(
                tags::NEW_SUBFILE_TYPE,
                field_types::LONG,
                1,
                new_subfile_type::SINGLE_PAGE)
            );
        }
    }

    /// Add a NUL-terminated ASCII tag
    pub fn add_ascii(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        ifd_index: usize,
        tag: u16,
        text: &str
    ) {
        let mut data = text.as_bytes().to_vec();
        data.push(0);

        if data.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..data.len()].copy_from_slice(&data);
            ifd.add_entry(IFDEntry::new(tag, field_types::ASCII, data.len() as u32, u32::from_le_bytes(inline)));
        } else {
            ifd.add_entry(IFDEntry::new(tag, field_types::ASCII, data.len() as u32, 0));
            external_data.insert((ifd_index, tag), data);
        }
    }
}
