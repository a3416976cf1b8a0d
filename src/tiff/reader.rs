//! TIFF buffer reader implementation
//!
//! This module implements the TIFF/BigTIFF reader that uses the Strategy
//! pattern to handle different byte orders. Every offset found in the file
//! is checked against the buffer size before it is followed.

use log::{debug, warn};
use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;
use crate::tiff::validation;
use crate::utils::format_utils::{self, TiffHeader};
use crate::utils::{ifd_utils, tag_utils};

/// Reader for TIFF and BigTIFF data
pub struct TiffReader {
    /// Maximum number of IFDs to follow before giving up on the chain
    max_ifds: usize,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    /// Creates a new TIFF reader
    pub fn new() -> Self {
        TiffReader {
            max_ifds: header::MAX_IFDS,
        }
    }

    /// Overrides the IFD chain limit
    pub fn with_max_ifds(mut self, max_ifds: usize) -> Self {
        self.max_ifds = max_ifds;
        self
    }

    /// Loads a TIFF file from the given path into memory and reads it
    pub fn load(&self, path: &Path) -> TiffResult<TIFF> {
        debug!("Loading TIFF file: {}", path.display());
        let bytes = fs::read(path)?;
        self.read_bytes(&bytes)
    }

    /// Reads TIFF structure from an in-memory buffer
    pub fn read_bytes(&self, bytes: &[u8]) -> TiffResult<TIFF> {
        let mut cursor = Cursor::new(bytes);
        self.read(&mut cursor)
    }

    /// Reads a TIFF from the given reader
    ///
    /// Reads the header, then every IFD of the chain with its tag values.
    pub fn read(&self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        let file_size = reader.byte_len()?;
        if file_size < 8 {
            return Err(TiffError::InvalidHeader);
        }

        let TiffHeader { handler, is_big_tiff, first_ifd_offset } = format_utils::read_header(reader)?;
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        let mut tiff = TIFF::new(is_big_tiff, handler.byte_order());
        tiff.ifds = self.read_ifd_chain(reader, handler.as_ref(), is_big_tiff, first_ifd_offset, file_size)?;

        debug!("Read {} IFDs", tiff.ifds.len());
        Ok(tiff)
    }

    /// Reads a chain of IFDs starting from the given offset
    ///
    /// Any damaged link fails the whole read, so a document never comes
    /// back with fewer pages than the file holds.
    fn read_ifd_chain(
        &self,
        reader: &mut dyn SeekableReader,
        handler: &dyn ByteOrderHandler,
        is_big_tiff: bool,
        first_ifd_offset: u64,
        file_size: u64,
    ) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut visited = HashSet::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 {
            if ifds.len() >= self.max_ifds {
                return Err(TiffError::TooManyIfds(self.max_ifds));
            }
            if !visited.insert(ifd_offset) {
                return Err(TiffError::IfdLoop(ifd_offset));
            }

            let (ifd, next_offset) = self
                .read_ifd(reader, handler, is_big_tiff, ifd_offset, ifds.len(), file_size)
                .map_err(|e| {
                    warn!("Cannot read IFD {} at offset {}: {}", ifds.len(), ifd_offset, e);
                    e
                })?;
            ifds.push(ifd);

            if next_offset != 0 {
                validation::validate_ifd_offset(next_offset, file_size)?;
            }
            ifd_offset = next_offset;
        }

        Ok(ifds)
    }

    /// Reads one IFD and the offset of the next one
    fn read_ifd(
        &self,
        reader: &mut dyn SeekableReader,
        handler: &dyn ByteOrderHandler,
        is_big_tiff: bool,
        offset: u64,
        number: usize,
        file_size: u64,
    ) -> TiffResult<(IFD, u64)> {
        reader.seek(SeekFrom::Start(offset))?;

        let entry_count = if is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };
        debug!("IFD #{} at {} has {} entries", number, offset, entry_count);

        let ifd_size = ifd_utils::calculate_ifd_size(entry_count, is_big_tiff);
        validation::validate_region("IFD", offset, ifd_size, file_size)?;

        let mut ifd = IFD::new(number, offset, handler.byte_order());
        let entry_size = ifd_utils::entry_size(is_big_tiff);
        let entries_start = reader.stream_position()?;

        for i in 0..entry_count {
            reader.seek(SeekFrom::Start(entries_start + i * entry_size))?;
            if let Some(entry) = self.read_ifd_entry(reader, handler, is_big_tiff, file_size)? {
                ifd.add_entry(entry);
            }
        }

        reader.seek(SeekFrom::Start(entries_start + entry_count * entry_size))?;
        let next_offset = ifd_utils::read_ifd_offset(reader, is_big_tiff, handler)?;

        Ok((ifd, next_offset))
    }

    /// Reads a single IFD entry together with its value bytes
    ///
    /// Entries with a field type this reader cannot size are skipped,
    /// since their values could not be relocated when the page is written.
    fn read_ifd_entry(
        &self,
        reader: &mut dyn SeekableReader,
        handler: &dyn ByteOrderHandler,
        is_big_tiff: bool,
        file_size: u64,
    ) -> TiffResult<Option<IFDEntry>> {
        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let inline_size = if is_big_tiff { 8 } else { 4 };
        let mut field = vec![0u8; inline_size];
        reader.read_exact(&mut field)?;

        let value_size = match tag_utils::field_type_size(field_type) {
            Some(size) => size as u64,
            None => {
                debug!("Skipping tag {} with unknown field type {}", tag, field_type);
                return Ok(None);
            }
        };

        let total = count.checked_mul(value_size).ok_or_else(|| TiffError::OutOfBounds {
            what: format!("tag {} values", tag),
            offset: 0,
            len: u64::MAX,
            size: file_size,
        })?;

        let byte_order = handler.byte_order();
        let value_offset = if is_big_tiff {
            byte_order.u64_from(&field)
        } else {
            byte_order.u32_from(&field) as u64
        };

        let data = if total <= inline_size as u64 {
            field.truncate(total as usize);
            field
        } else {
            validation::validate_region(&format!("tag {} values", tag), value_offset, total, file_size)?;
            reader.seek(SeekFrom::Start(value_offset))?;
            let mut data = vec![0u8; total as usize];
            reader.read_exact(&mut data)?;
            data
        };

        Ok(Some(IFDEntry {
            tag,
            field_type,
            count,
            value_offset,
            data,
        }))
    }
}

/// Copies `len` bytes at `offset` out of `bytes` with a bounds check
pub fn read_block(bytes: &[u8], offset: u64, len: u64, what: &str) -> TiffResult<Vec<u8>> {
    validation::validate_region(what, offset, len, bytes.len() as u64)?;
    let start = offset as usize;
    Ok(bytes[start..start + len as usize].to_vec())
}
