//! Pipeline state machine
//!
//! `Idle -> Scanning -> Loading -> Writing -> Done`, or `Failed` from
//! `Scanning` or `Writing`. Files that fail to load are logged and left out;
//! no step is retried.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::config::ConversionConfig;
use crate::loader::{ImageLoader, LoadedImage};
use crate::source;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::multipage::MultiPageWriter;
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Scanning,
    Loading,
    Writing,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Scanning => "scanning",
            PipelineState::Loading => "loading",
            PipelineState::Writing => "writing",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    /// Pages in the written TIFF
    pub pages_written: usize,
    pub output_path: PathBuf,
    /// Names of the files that could not be loaded
    pub skipped_files: Vec<String>,
}

/// Runs one conversion with a fixed configuration
pub struct ConversionPipeline<'a> {
    config: &'a ConversionConfig,
    logger: Option<&'a Logger>,
    show_progress: bool,
    state: PipelineState,
}

impl<'a> ConversionPipeline<'a> {
    pub fn new(config: &'a ConversionConfig) -> Self {
        ConversionPipeline {
            config,
            logger: None,
            show_progress: false,
            state: PipelineState::Idle,
        }
    }

    /// Also write run summary lines to `logger`
    pub fn with_logger(mut self, logger: &'a Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Draw a progress bar while loading
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("Pipeline {} -> {}", self.state, next);
        self.state = next;
    }

    /// Enter `Failed` and hand the error back
    fn fail(&mut self, error: TiffError) -> TiffError {
        self.transition(PipelineState::Failed);
        self.summary(&format!("Conversion failed: {}", error));
        error
    }

    fn summary(&self, line: &str) {
        if let Some(logger) = self.logger {
            if let Err(e) = logger.log(line) {
                debug!("Could not write run summary: {}", e);
            }
        }
    }

    /// Scan, load and write
    ///
    /// Calling it again repeats the whole conversion.
    pub fn run(&mut self) -> TiffResult<ConversionResult> {
        let config = self.config;
        info!("Starting conversion: {}", config);
        self.summary(&format!("Converting {}", config));

        self.transition(PipelineState::Scanning);
        let files = match source::scan_directory(&config.input_directory) {
            Ok(files) => files,
            Err(e) => return Err(self.fail(e)),
        };

        self.transition(PipelineState::Loading);
        let (images, skipped_files) = self.load_all(&files);

        self.transition(PipelineState::Writing);
        let pages_written = match self.write_all(&images, &config.output_file) {
            Ok(pages) => pages,
            Err(e) => return Err(self.fail(e)),
        };

        self.transition(PipelineState::Done);
        self.summary(&format!("Wrote {} pages to {} ({} skipped)",
                              pages_written, config.output_file.display(), skipped_files.len()));

        Ok(ConversionResult {
            pages_written,
            output_path: config.output_file.clone(),
            skipped_files,
        })
    }

    /// Loads every file; failures are logged and collected by name
    fn load_all(&self, files: &[PathBuf]) -> (Vec<LoadedImage>, Vec<String>) {
        let loader = ImageLoader::new(self.config.color_space, self.config.dpi);
        let progress = if self.show_progress {
            ProgressTracker::new(files.len() as u64, "Loading images")
        } else {
            ProgressTracker::hidden(files.len() as u64)
        };

        let results: Vec<TiffResult<LoadedImage>> = files.iter()
            .map(|path| {
                let result = loader.load(path);
                progress.increment(1);
                result
            })
            .collect();
        progress.finish();

        let mut images = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();

        for result in results {
            match result {
                Ok(image) => images.push(image),
                Err(e) => {
                    error!("Error loading image {}", e);
                    skipped.push(match e {
                        TiffError::ImageDecodeError { file, .. } => file,
                        other => other.to_string(),
                    });
                }
            }
        }

        info!("Loaded {} of {} images", images.len(), files.len());
        (images, skipped)
    }

    fn write_all(&self, images: &[LoadedImage], output: &Path) -> TiffResult<usize> {
        if images.is_empty() {
            return Err(TiffError::EmptyBatch);
        }

        let writer = MultiPageWriter::new(&self.config.compression, self.config.quality)?;
        writer.write(images, output)
    }
}
