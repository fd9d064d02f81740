//! Conversion pipeline
//!
//! Drives one run from directory scan to written TIFF.

mod orchestrator;


pub use orchestrator::{ConversionPipeline, ConversionResult, PipelineState};
