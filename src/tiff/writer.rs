//! In-memory TIFF writer
//!
//! Writing a valid TIFF requires careful management of offsets, ordering,
//! and alignment. `TiffWriter` appends one IFD at a time to a growing
//! buffer: first the data blocks the IFD points at, then any tag values too
//! large to sit inline, then the directory itself, and finally it links the
//! directory into the chain by patching the previous next-IFD pointer.

use log::{debug, trace};
use std::io::{Cursor, Seek, SeekFrom, Write};

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::tiff::constants::{field_types, header};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFDEntry;
use crate::utils::{tag_utils, write_utils};

/// A set of data blocks referenced by an offsets tag
///
/// The writer stores the blocks, then emits `offsets_tag` with their new
/// positions and, when `counts_tag` is set, a companion tag with their
/// lengths. Strips (273/279), tiles (324/325), the old-style JPEG stream
/// (513/514) and its tables (519-521) are all expressed this way.
#[derive(Debug, Clone)]
pub struct BlockGroup {
    /// Tag receiving the block offsets
    pub offsets_tag: u16,
    /// Tag receiving the block lengths, if the format has one
    pub counts_tag: Option<u16>,
    /// Block contents in tag order
    pub blocks: Vec<Vec<u8>>,
}

impl BlockGroup {
    /// Creates a block group with an offsets tag and a byte count tag
    pub fn with_counts(offsets_tag: u16, counts_tag: u16, blocks: Vec<Vec<u8>>) -> Self {
        BlockGroup { offsets_tag, counts_tag: Some(counts_tag), blocks }
    }

    /// Creates a block group whose lengths are implied by the format
    pub fn offsets_only(offsets_tag: u16, blocks: Vec<Vec<u8>>) -> Self {
        BlockGroup { offsets_tag, counts_tag: None, blocks }
    }
}

/// Writes a TIFF or BigTIFF structure into memory
pub struct TiffWriter {
    cursor: Cursor<Vec<u8>>,
    handler: Box<dyn ByteOrderHandler>,
    is_big_tiff: bool,
    /// Position of the pointer that the next IFD offset must be patched into
    link_position: u64,
    ifd_count: usize,
}

impl TiffWriter {
    /// Creates a writer and emits the header
    pub fn new(byte_order: ByteOrder, is_big_tiff: bool) -> TiffResult<Self> {
        let mut writer = TiffWriter {
            cursor: Cursor::new(Vec::new()),
            handler: byte_order.create_handler(),
            is_big_tiff,
            link_position: 0,
            ifd_count: 0,
        };
        writer.write_header()?;
        Ok(writer)
    }

    /// Byte order of the output
    pub fn byte_order(&self) -> ByteOrder {
        self.handler.byte_order()
    }

    /// Whether the output is BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Number of IFDs written so far
    pub fn ifd_count(&self) -> usize {
        self.ifd_count
    }

    /// Writes the TIFF header
    ///
    /// The first IFD pointer is left as zero and patched when the first
    /// directory is appended.
    fn write_header(&mut self) -> TiffResult<()> {
        let byte_order = self.byte_order();
        self.cursor.write_all(&byte_order.marker())?;

        if self.is_big_tiff {
            self.handler.write_u16(&mut self.cursor, header::BIG_TIFF_VERSION)?;
            self.handler.write_u16(&mut self.cursor, header::BIGTIFF_OFFSET_SIZE)?;
            self.handler.write_u16(&mut self.cursor, 0)?;
            self.link_position = self.cursor.position();
            self.handler.write_u64(&mut self.cursor, 0)?;
        } else {
            self.handler.write_u16(&mut self.cursor, header::TIFF_VERSION)?;
            self.link_position = self.cursor.position();
            self.handler.write_u32(&mut self.cursor, 0)?;
        }

        Ok(())
    }

    /// Checks that every entry can be stored in this container
    pub fn check_entries(&self, entries: &[IFDEntry]) -> TiffResult<()> {
        if self.is_big_tiff {
            return Ok(());
        }
        match entries.iter().find(|entry| tag_utils::is_big_tiff_only(entry.field_type)) {
            Some(entry) => Err(TiffError::IncompatibleFieldType {
                tag: entry.tag,
                field_type: entry.field_type,
            }),
            None => Ok(()),
        }
    }

    /// Appends one IFD with its data blocks
    ///
    /// Entry values must already be in the writer's byte order. Tags named
    /// by a block group are replaced by freshly computed offsets and counts.
    ///
    /// # Returns
    /// The offset at which the IFD was written
    pub fn append_ifd(&mut self, entries: &[IFDEntry], groups: &[BlockGroup]) -> TiffResult<u64> {
        self.check_entries(entries)?;

        let mut all_entries: Vec<IFDEntry> = entries.to_vec();
        for group in groups {
            let offsets = self.write_blocks(&group.blocks)?;
            all_entries.push(self.offsets_entry(group.offsets_tag, &offsets)?);

            if let Some(counts_tag) = group.counts_tag {
                let lengths: Vec<u64> = group.blocks.iter().map(|b| b.len() as u64).collect();
                all_entries.push(self.offsets_entry(counts_tag, &lengths)?);
            }
        }

        let sorted = write_utils::get_unique_sorted_entries(&all_entries);
        let value_fields = self.write_external_values(&sorted)?;
        let ifd_offset = self.write_directory(&sorted, &value_fields)?;

        self.ifd_count += 1;
        debug!("Wrote IFD #{} with {} entries at offset {}", self.ifd_count - 1, sorted.len(), ifd_offset);
        Ok(ifd_offset)
    }

    /// Returns the finished buffer
    pub fn finish(self) -> TiffResult<Vec<u8>> {
        if self.ifd_count == 0 {
            return Err(TiffError::GenericError("No IFDs were written".to_string()));
        }
        Ok(self.cursor.into_inner())
    }

    /// Aligns the end of the buffer and returns the aligned position
    fn align_end(&mut self) -> TiffResult<u64> {
        let end = self.cursor.seek(SeekFrom::End(0))?;
        write_utils::write_padding(&mut self.cursor, end)?;
        Ok(self.cursor.position())
    }

    /// Writes data blocks at the end of the buffer
    fn write_blocks(&mut self, blocks: &[Vec<u8>]) -> TiffResult<Vec<u64>> {
        let mut offsets = Vec::with_capacity(blocks.len());
        for block in blocks {
            let offset = self.align_end()?;
            self.cursor.write_all(block)?;
            offsets.push(offset);
        }
        Ok(offsets)
    }

    /// Builds an offsets or counts entry sized for the container
    fn offsets_entry(&self, tag: u16, values: &[u64]) -> TiffResult<IFDEntry> {
        let byte_order = self.byte_order();
        if self.is_big_tiff {
            return Ok(IFDEntry::new(tag, field_types::LONG8, values.len() as u64, byte_order.u64_bytes(values)));
        }

        let narrow = values
            .iter()
            .map(|&v| u32::try_from(v).map_err(|_| {
                TiffError::GenericError(format!("Value {} for tag {} exceeds classic TIFF limits", v, tag))
            }))
            .collect::<TiffResult<Vec<u32>>>()?;
        Ok(IFDEntry::new(tag, field_types::LONG, narrow.len() as u64, byte_order.u32_bytes(&narrow)))
    }

    /// Writes values too large to sit inline and returns each entry's value field
    fn write_external_values(&mut self, entries: &[IFDEntry]) -> TiffResult<Vec<Vec<u8>>> {
        let mut fields = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.is_value_inline(self.is_big_tiff) {
                fields.push(write_utils::inline_value_bytes(&entry.data, self.is_big_tiff));
                continue;
            }

            let offset = self.align_end()?;
            self.cursor.write_all(&entry.data)?;
            trace!("Tag {} values written at {}", entry.tag, offset);

            let field = if self.is_big_tiff {
                self.byte_order().u64_bytes(&[offset])
            } else {
                let narrow = u32::try_from(offset).map_err(|_| {
                    TiffError::GenericError(format!("Offset {} exceeds classic TIFF limits", offset))
                })?;
                self.byte_order().u32_bytes(&[narrow])
            };
            fields.push(field);
        }
        Ok(fields)
    }

    /// Writes the directory and links it into the chain
    fn write_directory(&mut self, entries: &[IFDEntry], value_fields: &[Vec<u8>]) -> TiffResult<u64> {
        let ifd_offset = self.align_end()?;
        if !self.is_big_tiff && ifd_offset > u32::MAX as u64 {
            return Err(TiffError::GenericError(format!("IFD offset {} exceeds classic TIFF limits", ifd_offset)));
        }

        if self.is_big_tiff {
            self.handler.write_u64(&mut self.cursor, entries.len() as u64)?;
        } else {
            let count = u16::try_from(entries.len())
                .map_err(|_| TiffError::GenericError(format!("Too many entries: {}", entries.len())))?;
            self.handler.write_u16(&mut self.cursor, count)?;
        }

        for (entry, field) in entries.iter().zip(value_fields) {
            self.handler.write_u16(&mut self.cursor, entry.tag)?;
            self.handler.write_u16(&mut self.cursor, entry.field_type)?;
            if self.is_big_tiff {
                self.handler.write_u64(&mut self.cursor, entry.count)?;
            } else {
                self.handler.write_u32(&mut self.cursor, entry.count as u32)?;
            }
            self.cursor.write_all(field)?;
        }

        // Next IFD pointer, patched if another directory follows
        let next_link = self.cursor.position();
        if self.is_big_tiff {
            self.handler.write_u64(&mut self.cursor, 0)?;
        } else {
            self.handler.write_u32(&mut self.cursor, 0)?;
        }

        self.cursor.seek(SeekFrom::Start(self.link_position))?;
        if self.is_big_tiff {
            self.handler.write_u64(&mut self.cursor, ifd_offset)?;
        } else {
            self.handler.write_u32(&mut self.cursor, ifd_offset as u32)?;
        }
        self.cursor.seek(SeekFrom::End(0))?;
        self.link_position = next_link;

        Ok(ifd_offset)
    }
}
