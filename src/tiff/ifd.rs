//! Image File Directory (IFD) structures and methods
//!
//! Every page of a multi-page TIFF is described by one IFD: a list of tag
//! entries plus the offset of the next IFD in the chain.

use std::collections::HashMap;
use std::fmt;
use crate::tiff::constants::{field_types, tags};
use log::trace;
use crate::utils::tag_utils;

/// Represents an Image File Directory (IFD) in a TIFF file
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in this IFD
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based page index)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Cached tag values for quick lookup
    tag_map: HashMap<u16, IFDEntry>,
}

/// Represents an entry in an Image File Directory (IFD)
///
/// For values that fit in four bytes `value_offset` holds the value itself,
/// otherwise it holds the file offset of the value array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u32,
    /// Value or offset to values
    pub value_offset: u32,
}

impl IFDEntry {
    /// Creates a new IFD entry
    pub fn new(tag: u16, field_type: u16, count: u32, value_offset: u32) -> Self {
        trace!("New IFD entry: tag={} ({}), type={} ({}), count={}, value/offset={}",
               tag, tag_utils::get_tag_name(tag),
               field_type, tag_utils::get_field_type_name(field_type),
               count, value_offset);

        Self {
            tag,
            field_type,
            count,
            value_offset,
        }
    }

    /// Get the size in bytes of a single value of this entry's field type
    pub fn get_field_type_size(&self) -> usize {
        match self.field_type {
            field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
            field_types::SHORT | field_types::SSHORT => 2,
            field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
            field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
            _ => 1,
        }
    }

    /// Determines if the value is stored inline in value_offset
    pub fn is_value_inline(&self) -> bool {
        self.get_field_type_size() * self.count as usize <= 4
    }

    /// Returns a human-readable description of this entry
    pub fn description(&self) -> String {
        let tag_name = tag_utils::get_tag_name(self.tag);
        let field_type_name = tag_utils::get_field_type_name(self.field_type);

        format!("Tag: {} ({}), Type: {} ({}), Count: {}, Value/Offset: {}",
                self.tag, tag_name, self.field_type, field_type_name, self.count,
                tag_utils::describe_value(self.tag, self.value_offset))
    }
}

impl IFD {
    /// Creates a new, empty IFD
    pub fn new(number: usize, offset: u64) -> Self {
        Self {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry to this IFD
    ///
    /// A later entry for the same tag replaces the earlier one.
    pub fn add_entry(&mut self, entry: IFDEntry) {
        trace!("Adding entry to IFD #{}: {}", self.number, entry.description());

        self.entries.retain(|e| e.tag != entry.tag);
        self.tag_map.insert(entry.tag, entry.clone());
        self.entries.push(entry);
    }

    /// Gets a tag value (value_offset) directly
    pub fn get_tag_value(&self, tag: u16) -> Option<u32> {
        self.tag_map.get(&tag).map(|entry| entry.value_offset)
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag)
    }

    /// Gets the dimensions of the image described by this IFD
    pub fn get_dimensions(&self) -> Option<(u32, u32)> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some((width, height))
    }

    /// Returns number of samples per pixel (default 1 if not specified)
    pub fn get_samples_per_pixel(&self) -> u32 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    /// Returns the compression code (default 1, uncompressed)
    pub fn get_compression(&self) -> u16 {
        self.get_tag_value(tags::COMPRESSION).unwrap_or(1) as u16
    }

    /// Returns the photometric interpretation, if present
    pub fn get_photometric(&self) -> Option<u16> {
        self.get_tag_value(tags::PHOTOMETRIC_INTERPRETATION).map(|v| v as u16)
    }

    /// Entries sorted by tag number, as the TIFF format requires on disk
    pub fn sorted_entries(&self) -> Vec<IFDEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|entry| entry.tag);
        sorted
    }

    /// Size of this IFD on disk: count, 12 bytes per entry, next offset
    pub fn byte_size(&self) -> u64 {
        2 + (12 * self.entries.len() as u64) + 4
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;

        if let Some((width, height)) = self.get_dimensions() {
            writeln!(f, "  Dimensions: {}x{}", width, height)?;
        }

        writeln!(f, "  Samples per pixel: {}", self.get_samples_per_pixel())?;

        writeln!(f, "  Tags:")?;
        for entry in &self.sorted_entries() {
            writeln!(f, "    {} ({}): {} [{}]",
                     entry.tag,
                     tag_utils::get_tag_name(entry.tag),
                     tag_utils::describe_value(entry.tag, entry.value_offset),
                     tag_utils::get_field_type_name(entry.field_type))?;
        }

        Ok(())
    }
}
