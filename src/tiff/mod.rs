//! TIFF file format module
//!
//! This module provides structures and functions for reading classic TIFF
//! files and for writing multi-page TIFF output.

pub mod errors;
pub mod ifd;
pub(crate) mod types;
pub mod reader;
#[cfg(test)]
mod tests;
pub mod builder;
mod builders;
pub(crate) mod constants;
pub(crate) mod validation;
pub mod multipage;
pub mod pages;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use types::TIFF;
pub use builder::TiffBuilder;
pub use multipage::MultiPageWriter;
pub use pages::{read_page_pixels, read_pages, PageInfo};
