//! TIFF file construction utilities
//!
//! Collects IFDs, their strips and out-of-line tag data, then hands the
//! lot to the writer.

use std::collections::BTreeMap;
use std::path::Path;
use log::{debug, info};

use crate::loader::{ColorSpace, Dpi};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;

use crate::tiff::builders::basic_tags::{BasicTagsBuilder, ExternalData};
use crate::tiff::builders::writer::WriterBuilder;

/// Builder for creating TIFF files
#[derive(Debug, Default)]
pub struct TiffBuilder {
    pub ifds: Vec<IFD>,
    image_data: BTreeMap<usize, Vec<u8>>,
    external_data: ExternalData,
}

impl TiffBuilder {
    /// Create a new TIFF builder
    pub fn new() -> Self {
        debug!("Creating new TiffBuilder");
        TiffBuilder::default()
    }

    /// Add an IFD to the TIFF
    pub fn add_ifd(&mut self, ifd: IFD) -> usize {
        let ifd_index = self.ifds.len();
        debug!("Adding IFD #{} to TiffBuilder", ifd_index);
        self.ifds.push(ifd);
        ifd_index
    }

    /// Add dimension, sample layout and compression tags
    pub fn add_page_tags(
        &mut self,
        ifd_index: usize,
        width: u32,
        height: u32,
        color_space: ColorSpace,
        compression_code: u16,
        photometric_code: u16
    ) -> TiffResult<()> {
        let ifd = ifd_at(&mut self.ifds, ifd_index)?;

        BasicTagsBuilder::add_page_tags(
            ifd,
            &mut self.external_data,
            ifd_index,
            width,
            height,
            color_space,
            compression_code,
            photometric_code
        );
        Ok(())
    }

    /// Set up a single strip for image data
    pub fn setup_single_strip(&mut self, ifd_index: usize, strip_data: Vec<u8>) -> TiffResult<()> {
        let ifd = ifd_at(&mut self.ifds, ifd_index)?;

        BasicTagsBuilder::setup_single_strip(ifd, &mut self.image_data, ifd_index, strip_data);
        Ok(())
    }

    /// Record the page resolution
    pub fn add_resolution(&mut self, ifd_index: usize, dpi: Dpi) -> TiffResult<()> {
        let ifd = ifd_at(&mut self.ifds, ifd_index)?;

        BasicTagsBuilder::add_resolution(ifd, &mut self.external_data, ifd_index, dpi);
        Ok(())
    }

    /// Record the page position within the document
    pub fn add_page_number(&mut self, ifd_index: usize, page: u16, total: u16) -> TiffResult<()> {
        BasicTagsBuilder::add_page_number(ifd_at(&mut self.ifds, ifd_index)?, page, total);
        Ok(())
    }

    /// Add an ASCII tag such as Software
    pub fn add_ascii_tag(&mut self, ifd_index: usize, tag: u16, text: &str) -> TiffResult<()> {
        let ifd = ifd_at(&mut self.ifds, ifd_index)?;

        BasicTagsBuilder::add_ascii(ifd, &mut self.external_data, ifd_index, tag, text);
        Ok(())
    }

    /// Write the TIFF file to disk
    pub fn write(&self, output_path: &Path) -> TiffResult<()> {
        info!("Writing {} IFDs to {}", self.ifds.len(), output_path.display());

        WriterBuilder::write(
            &self.ifds,
            &self.image_data,
            &self.external_data,
            output_path
        )
    }
}

/// Borrows one IFD, separately from the builder's data maps
fn ifd_at(ifds: &mut [IFD], ifd_index: usize) -> TiffResult<&mut IFD> {
    let count = ifds.len();
    ifds.get_mut(ifd_index).ok_or_else(|| TiffError::GenericError(format!(
        "Invalid IFD index {}, only have {} IFDs", ifd_index, count)))
}
