//! Seekable reader trait
//!
//! Everything that parses TIFF structures works against this trait, so the
//! same code reads TIFF files from disk and EXIF blocks from memory.

use std::io::{Read, Seek};

/// Trait for readers that can both read and seek
pub trait SeekableReader: Read + Seek {}

// Files, buffered files and in-memory cursors all qualify
impl<T: Read + Seek> SeekableReader for T {}
