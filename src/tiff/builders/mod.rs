//! TIFF builder strategy modules
//!
//! Strategy implementations for the TiffBuilder: tag assembly and the
//! on-disk layout.

pub mod basic_tags;
pub mod writer;
