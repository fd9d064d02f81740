//! I/O utilities for file handling
//!
//! Byte-order aware readers shared by the TIFF page reader and the
//! EXIF resolution lookup in the image loader.

pub mod seekable;
pub mod byte_order;
