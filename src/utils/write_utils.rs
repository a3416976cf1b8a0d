//! TIFF writing utilities
//!
//! Helper functions for laying out TIFF structures in an output buffer,
//! handling alignment and tag ordering.

use crate::tiff::errors::TiffResult;
use crate::tiff::ifd::IFDEntry;
use std::collections::HashSet;
use std::io::Write;

/// Align an offset to a 4-byte boundary
///
/// TIFF requires IFDs and out-of-line values to start on a word boundary.
pub fn align_to_4_bytes(offset: u64) -> u64 {
    let remainder = offset % 4;
    if remainder == 0 {
        offset
    } else {
        offset + (4 - remainder)
    }
}

/// Write padding bytes so that `position` becomes 4-byte aligned
pub fn write_padding(writer: &mut impl Write, position: u64) -> TiffResult<()> {
    let padding = (align_to_4_bytes(position) - position) as usize;
    if padding > 0 {
        writer.write_all(&vec![0u8; padding])?;
    }
    Ok(())
}

/// Get a list of IFD entries sorted by tag number with duplicates removed
///
/// If multiple entries have the same tag ID, only the last occurrence is kept.
pub fn get_unique_sorted_entries(entries: &[IFDEntry]) -> Vec<IFDEntry> {
    let mut unique_entries = Vec::with_capacity(entries.len());
    let mut seen_tags = HashSet::new();

    for entry in entries.iter().rev() {
        if seen_tags.insert(entry.tag) {
            unique_entries.push(entry.clone());
        }
    }

    // Stable sort keeps the chosen occurrence for each tag
    unique_entries.sort_by_key(|entry| entry.tag);
    unique_entries
}

/// Pads `data` with zeros to the inline value size of the container
pub fn inline_value_bytes(data: &[u8], is_big_tiff: bool) -> Vec<u8> {
    let size = if is_big_tiff { 8 } else { 4 };
    let mut field = vec![0u8; size];
    field[..data.len()].copy_from_slice(data);
    field
}
