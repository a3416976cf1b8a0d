//! Image File Directory (IFD) structures and methods
//!
//! This module implements the core TIFF IFD (Image File Directory) structures
//! that describe one page of a TIFF file. Each entry keeps its complete value
//! bytes in the byte order of the file it came from, so a page can be written
//! back out without re-reading the source.

use std::collections::HashMap;
use std::fmt;

use log::trace;

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{field_types, tags};
use crate::utils::tag_utils;

/// Represents an Image File Directory (IFD) in a TIFF file
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in this IFD, in file order
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Byte order of the entry data
    pub byte_order: ByteOrder,
    /// Index into `entries` by tag
    tag_map: HashMap<u16, usize>,
}

/// Represents an entry in an Image File Directory (IFD)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Raw value/offset field as found in the directory
    pub value_offset: u64,
    /// Full value bytes, wherever they were stored
    pub data: Vec<u8>,
}

impl IFDEntry {
    /// Creates an entry from its value bytes
    ///
    /// Used when building directories for output; the value/offset field is
    /// computed by the writer.
    pub fn new(tag: u16, field_type: u16, count: u64, data: Vec<u8>) -> Self {
        Self {
            tag,
            field_type,
            count,
            value_offset: 0,
            data,
        }
    }

    /// Creates a SHORT entry from values in the given byte order
    pub fn from_shorts(tag: u16, values: &[u16], byte_order: ByteOrder) -> Self {
        Self::new(tag, field_types::SHORT, values.len() as u64, byte_order.u16_bytes(values))
    }

    /// Determines if the value fits inline in the value/offset field
    pub fn is_value_inline(&self, is_big_tiff: bool) -> bool {
        let inline_size = if is_big_tiff { 8 } else { 4 };
        self.data.len() <= inline_size
    }

    /// Decodes the entry as unsigned integers
    pub fn values(&self, byte_order: ByteOrder) -> Vec<u64> {
        tag_utils::decode_tag_values(self.field_type, &self.data, byte_order)
    }

    /// Returns a human-readable description of this entry
    pub fn description(&self, byte_order: ByteOrder) -> String {
        let tag_name = tag_utils::get_tag_name(self.tag);
        let field_type_name = tag_utils::get_field_type_name(self.field_type);
        let first = self.values(byte_order).first().copied();

        let value_display = match (self.tag, first) {
            (tags::COMPRESSION, Some(v)) => format!("{} ({})", v, tag_utils::get_compression_name(v)),
            (tags::PHOTOMETRIC_INTERPRETATION, Some(v)) => {
                format!("{} ({})", v, tag_utils::get_photometric_name(v))
            }
            (tags::SAMPLE_FORMAT, Some(v)) => format!("{} ({})", v, tag_utils::get_sample_format_name(v)),
            (_, Some(v)) if self.count == 1 => v.to_string(),
            _ => format!("{} bytes", self.data.len()),
        };

        format!("Tag: {} ({}), Type: {} ({}), Count: {}, Value: {}",
                self.tag, tag_name, self.field_type, field_type_name, self.count, value_display)
    }
}

impl IFD {
    /// Creates a new empty IFD
    pub fn new(number: usize, offset: u64, byte_order: ByteOrder) -> Self {
        trace!("Creating new IFD #{} at offset {}", number, offset);

        Self {
            entries: Vec::new(),
            number,
            offset,
            byte_order,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry to this IFD
    ///
    /// A later entry with the same tag replaces the earlier one for lookups.
    pub fn add_entry(&mut self, entry: IFDEntry) {
        trace!("Adding entry to IFD #{}: {}", self.number, entry.description(self.byte_order));

        self.tag_map.insert(entry.tag, self.entries.len());
        self.entries.push(entry);
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|&i| &self.entries[i])
    }

    /// Gets the first value of an integer tag
    pub fn tag_value(&self, tag: u16) -> Option<u64> {
        self.get_entry(tag)
            .and_then(|entry| entry.values(self.byte_order).first().copied())
    }

    /// Gets all values of an integer tag
    pub fn tag_values(&self, tag: u16) -> Option<Vec<u64>> {
        self.get_entry(tag).map(|entry| entry.values(self.byte_order))
    }

    /// Gets the dimensions of the image described by this IFD
    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        let width = self.tag_value(tags::IMAGE_WIDTH)?;
        let height = self.tag_value(tags::IMAGE_LENGTH)?;
        Some((width, height))
    }

    /// Returns number of samples per pixel (default 1 if not specified)
    pub fn get_samples_per_pixel(&self) -> u64 {
        self.tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    /// Gets the number of entries in this IFD
    pub fn entry_count(&self) -> usize {
        self.entries.len()
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
        for entry in &self.entries {
            writeln!(f, "    {}", entry.description(self.byte_order))?;
        }

        Ok(())
    }
}
