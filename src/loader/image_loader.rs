//! JPEG/PNG loader

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};
use log::debug;

use crate::loader::{color, dpi, ColorSpace, Dpi, LoadedImage};
use crate::tiff::errors::{TiffError, TiffResult};

/// Loads single images for the page writer
///
/// Color space and fallback DPI are fixed for the whole batch.
#[derive(Debug, Clone, Copy)]
pub struct ImageLoader {
    color_space: ColorSpace,
    default_dpi: Dpi,
}

impl ImageLoader {
    pub fn new(color_space: ColorSpace, default_dpi: Dpi) -> Self {
        ImageLoader { color_space, default_dpi }
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Decode, convert and resolve the DPI of one file
    ///
    /// Every failure is an `ImageDecodeError` naming the file; the source
    /// file is only read.
    pub fn load(&self, path: &Path) -> TiffResult<LoadedImage> {
        let source_name = path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let decode_error = |reason: String| TiffError::ImageDecodeError {
            file: source_name.clone(),
            reason,
        };

        let data = fs::read(path).map_err(|e| decode_error(e.to_string()))?;

        let reader = ImageReader::new(Cursor::new(data.as_slice()))
            .with_guessed_format()
            .map_err(|e| decode_error(e.to_string()))?;

        match reader.format() {
            Some(ImageFormat::Jpeg) | Some(ImageFormat::Png) => {},
            Some(other) => return Err(decode_error(format!("unsupported image format {:?}", other))),
            None => return Err(decode_error("unrecognized image format".to_string())),
        }

        let image = reader.decode().map_err(|e| decode_error(e.to_string()))?;
        let (width, height) = (image.width(), image.height());
        let pixels = color::convert(&image, self.color_space);

        let dpi = match dpi::read_embedded_dpi(&data) {
            Some(found) => found,
            None => {
                debug!("{} carries no usable DPI, using {}", source_name, self.default_dpi);
                self.default_dpi
            }
        };

        debug!("Loaded {} ({}x{}, {}, {} dpi)", source_name, width, height, self.color_space, dpi);

        Ok(LoadedImage {
            width,
            height,
            pixels,
            color_space: self.color_space,
            dpi,
            source_name,
        })
    }
}
