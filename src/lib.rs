pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod loader;
pub mod source;
pub mod config;
pub mod pipeline;
pub mod commands;
pub mod api;

pub use crate::api::TiffStack;

pub use config::ConversionConfig;
pub use loader::{ColorSpace, Dpi, ImageLoader, LoadedImage};
pub use pipeline::{ConversionPipeline, ConversionResult, PipelineState};
pub use tiff::{MultiPageWriter, TiffError, TiffReader, TiffResult};
