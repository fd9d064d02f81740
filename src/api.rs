use std::path::Path;
use log::info;

use crate::config::ConversionConfig;
use crate::pipeline::{ConversionPipeline, ConversionResult};
use crate::tiff::errors::TiffResult;
use crate::tiff::pages::{self, PageInfo};
use crate::utils::logger::{Logger, DEFAULT_LOG_FILE};

/// Main interface to the tiffstack library
pub struct TiffStack {
    logger: Logger,
}

impl TiffStack {
    /// Create a new TiffStack instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to log file, defaults to "tiffstack.log"
    ///
    /// # Returns
    /// A TiffStack instance or an error if initialization fails
    pub fn new(log_file: Option<&str>) -> TiffResult<Self> {
        let log_path = log_file.unwrap_or(DEFAULT_LOG_FILE);
        let logger = Logger::new(log_path)?;
        Ok(TiffStack { logger })
    }

    /// Convert a directory of images into one multi-page TIFF
    ///
    /// Files that fail to decode are skipped and listed in the result.
    pub fn convert(&self, config: &ConversionConfig) -> TiffResult<ConversionResult> {
        config.validate()?;

        let result = ConversionPipeline::new(config)
            .with_logger(&self.logger)
            .run()?;

        info!("Converted {} pages into {}", result.pages_written, result.output_path.display());
        Ok(result)
    }

    /// Describe the pages of a TIFF file
    pub fn inspect<P: AsRef<Path>>(&self, input_path: P) -> TiffResult<Vec<PageInfo>> {
        let input_path = input_path.as_ref();
        let pages = pages::read_pages(input_path)?;

        self.logger.log(&format!("{}: {} pages", input_path.display(), pages.len()))?;
        Ok(pages)
    }

    /// Decode one page back to interleaved samples
    pub fn page_pixels<P: AsRef<Path>>(&self, input_path: P, index: usize) -> TiffResult<Vec<u8>> {
        let (_, pixels) = pages::read_page_pixels(input_path.as_ref(), index)?;
        Ok(pixels)
    }
}
