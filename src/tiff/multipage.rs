//! Multi-page TIFF writer
//!
//! Turns a batch of loaded images into one TIFF, one page per image in
//! batch order, all pages sharing one compression scheme.

use std::path::Path;

use log::{debug, info};

use crate::compression::{CompressionFactory, CompressionHandler, StripLayout};
use crate::loader::LoadedImage;
use crate::tiff::builder::TiffBuilder;
use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;

/// Writes loaded images as the pages of a single TIFF
pub struct MultiPageWriter {
    handler: Box<dyn CompressionHandler>,
}

impl MultiPageWriter {
    /// Resolve the compression scheme by name
    ///
    /// `quality` only affects JPEG. An unknown name is a `WriteError`.
    pub fn new(compression: &str, quality: u8) -> TiffResult<Self> {
        let handler = CompressionFactory::get_handler_by_name(compression, quality)
            .map_err(|e| TiffError::WriteError(format!(
                "{} (expected one of: {})", e, CompressionFactory::available_names().join(", "))))?;

        debug!("Page compression: {} (code {})", handler.name(), handler.code());
        Ok(MultiPageWriter { handler })
    }

    pub fn compression_name(&self) -> &'static str {
        self.handler.name()
    }

    /// Write every image as one page of `output`, returning the page count
    ///
    /// Nothing is written for an empty batch. Any encoder or I/O failure is
    /// a `WriteError` and leaves an existing `output` in place.
    pub fn write(&self, images: &[LoadedImage], output: &Path) -> TiffResult<usize> {
        if images.is_empty() {
            return Err(TiffError::EmptyBatch);
        }

        let total = u16::try_from(images.len()).map_err(|_| TiffError::WriteError(format!(
            "{} pages exceed the PageNumber limit of {}", images.len(), u16::MAX)))?;

        let mut builder = TiffBuilder::new();
        let software = format!("tiffstack {}", env!("CARGO_PKG_VERSION"));

        for (page, image) in images.iter().enumerate() {
            let strip = self.encode_page(image)?;

            let ifd_index = builder.add_ifd(IFD::new(page, 0));
            builder.add_page_tags(
                ifd_index,
                image.width,
                image.height,
                image.color_space,
                self.handler.code(),
                self.handler.photometric(image.color_space),
            )?;
            builder.setup_single_strip(ifd_index, strip)?;
            builder.add_resolution(ifd_index, image.dpi)?;
            builder.add_page_number(ifd_index, page as u16, total)?;
            builder.add_ascii_tag(ifd_index, tags::SOFTWARE, &software)?;

            debug!("Page {}: {} ({}x{}, {} dpi)", page + 1, image.source_name, image.width, image.height, image.dpi);
        }

        builder.write(output)?;

        info!("Wrote {} pages to {} ({})", images.len(), output.display(), self.handler.name());
        Ok(images.len())
    }

    /// Compress one image into its strip
    fn encode_page(&self, image: &LoadedImage) -> TiffResult<Vec<u8>> {
        if image.width == 0 || image.height == 0 {
            return Err(TiffError::WriteError(format!(
                "{} has no pixels ({}x{})", image.source_name, image.width, image.height)));
        }

        let layout = StripLayout {
            width: image.width,
            height: image.height,
            color_space: image.color_space,
        };

        if image.pixels.len() != layout.expected_len() {
            return Err(TiffError::WriteError(format!(
                "{} holds {} bytes, expected {}", image.source_name, image.pixels.len(), layout.expected_len())));
        }

        self.handler.compress(&image.pixels, &layout)
            .map_err(|e| TiffError::WriteError(format!("{}: {}", image.source_name, e)))
    }
}
