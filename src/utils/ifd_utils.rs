//! IFD utilities
//!
//! Utilities for working with Image File Directories (IFDs) in TIFF files.

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::{TiffError, TiffResult};

/// Reads an IFD offset (header or next-IFD pointer)
///
/// The pointer is 8 bytes wide in BigTIFF and 4 bytes in classic TIFF.
pub fn read_ifd_offset(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    byte_order_handler: &dyn ByteOrderHandler
) -> TiffResult<u64> {
    if is_big_tiff {
        byte_order_handler.read_u64(reader).map_err(TiffError::IoError)
    } else {
        byte_order_handler.read_u32(reader)
            .map(|v| v as u64)
            .map_err(TiffError::IoError)
    }
}

/// Size in bytes of one directory entry
pub fn entry_size(is_big_tiff: bool) -> u64 {
    if is_big_tiff { 20 } else { 12 }
}

/// Calculates the size of an IFD in bytes from its entry count
///
/// Includes the entry count field and the trailing next-IFD pointer.
pub fn calculate_ifd_size(entry_count: u64, is_big_tiff: bool) -> u64 {
    if is_big_tiff {
        // 8 (entry count) + 20 (each entry) + 8 (next IFD offset)
        (20u64.saturating_mul(entry_count)).saturating_add(16)
    } else {
        // 2 (entry count) + 12 (each entry) + 4 (next IFD offset)
        (12u64.saturating_mul(entry_count)).saturating_add(6)
    }
}
