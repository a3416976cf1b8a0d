//! IFD-level codec
//!
//! The container backend never touches pixels. A page is isolated by
//! copying its directory entries and the data blocks they point at (strips,
//! tiles, the old-style JPEG stream and its tables), and a document is
//! assembled by writing those directories into a fresh chain. Compression
//! therefore survives byte for byte unless a policy forces a transcode.

use log::{debug, trace};

use crate::codec::{CodecError, DecodeFailure, Frame, FrameEncoder, TiffCodec};
use crate::compression::{CompressionFactory, CompressionKind, CompressionPolicy};
use crate::io::byte_order::ByteOrder;
use crate::model::Document;
use crate::tiff::constants::{field_types, header, predictor, tags};
use crate::tiff::errors::TiffError;
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::reader::{self, TiffReader};
use crate::tiff::writer::{BlockGroup, TiffWriter};
use crate::tiff::PageInfo;
use crate::utils::tag_utils;

/// Tags whose values are rebuilt from block groups
const BLOCK_TAGS: [u16; 9] = [
    tags::STRIP_OFFSETS,
    tags::STRIP_BYTE_COUNTS,
    tags::TILE_OFFSETS,
    tags::TILE_BYTE_COUNTS,
    tags::JPEG_INTERCHANGE_FORMAT,
    tags::JPEG_INTERCHANGE_FORMAT_LENGTH,
    tags::JPEG_Q_TABLES,
    tags::JPEG_DC_TABLES,
    tags::JPEG_AC_TABLES,
];

/// Tags dropped from isolated pages: free space and pointers to child IFDs
const DROPPED_TAGS: [u16; 6] = [
    tags::FREE_OFFSETS,
    tags::FREE_BYTE_COUNTS,
    tags::SUB_IFDS,
    tags::EXIF_IFD,
    tags::GPS_IFD,
    tags::INTEROPERABILITY_IFD,
];

/// Size of one old-style JPEG quantization table
const JPEG_Q_TABLE_LEN: u64 = 64;

/// One page isolated at the directory level
#[derive(Debug, Clone)]
pub struct IfdFrame {
    info: PageInfo,
    byte_order: ByteOrder,
    is_big_tiff: bool,
    entries: Vec<IFDEntry>,
    groups: Vec<BlockGroup>,
}

impl IfdFrame {
    /// Isolates one IFD and the data blocks it references
    pub fn from_ifd(ifd: &IFD, bytes: &[u8], is_big_tiff: bool) -> Result<Self, CodecError> {
        let info = PageInfo::from_ifd(ifd).map_err(CodecError::invalid_container)?;

        let entries = ifd
            .entries
            .iter()
            .filter(|entry| !BLOCK_TAGS.contains(&entry.tag) && !DROPPED_TAGS.contains(&entry.tag))
            .filter(|entry| !matches!(entry.field_type, field_types::IFD | field_types::IFD8))
            .cloned()
            .collect();

        let mut groups = Vec::new();
        if let Some(group) = counted_group(ifd, bytes, tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS)? {
            groups.push(group);
        }
        if let Some(group) = counted_group(ifd, bytes, tags::TILE_OFFSETS, tags::TILE_BYTE_COUNTS)? {
            groups.push(group);
        }
        if let Some(group) = interchange_group(ifd, bytes)? {
            groups.push(group);
        }
        for tag in [tags::JPEG_Q_TABLES, tags::JPEG_DC_TABLES, tags::JPEG_AC_TABLES] {
            if let Some(group) = jpeg_table_group(ifd, bytes, tag)? {
                groups.push(group);
            }
        }

        if groups.is_empty() {
            return Err(CodecError::decode(
                DecodeFailure::InvalidContainer,
                format!("IFD #{} has no image data", ifd.number),
            ));
        }

        trace!("Isolated IFD #{}: {} entries, {} block groups", ifd.number, ifd.entry_count(), groups.len());
        Ok(IfdFrame {
            info,
            byte_order: ifd.byte_order,
            is_big_tiff,
            entries,
            groups,
        })
    }

    /// Entries written verbatim
    pub fn entries(&self) -> &[IFDEntry] {
        &self.entries
    }

    /// Data blocks written with fresh offsets
    pub fn groups(&self) -> &[BlockGroup] {
        &self.groups
    }

    /// Byte order of the entry values
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Whether the frame was read from a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Recompresses strips or tiles to `target`
    fn transcode(&mut self, target: CompressionKind) -> Result<(), CodecError> {
        let source = self.info.compression;
        if source == target {
            return Ok(());
        }
        if !CompressionFactory::has_handler(source) || !CompressionFactory::has_handler(target) {
            return Err(CodecError::UnsupportedOperation(format!(
                "container backend cannot transcode {} to {}", source, target
            )));
        }

        let predictor = self
            .entries
            .iter()
            .find(|e| e.tag == tags::PREDICTOR)
            .and_then(|e| e.values(self.byte_order).first().copied())
            .unwrap_or(predictor::NONE as u64);
        if predictor != predictor::NONE as u64 && target == CompressionKind::Uncompressed {
            return Err(CodecError::UnsupportedOperation(format!(
                "container backend cannot undo predictor {} when decompressing", predictor
            )));
        }

        for group in &mut self.groups {
            if group.offsets_tag != tags::STRIP_OFFSETS && group.offsets_tag != tags::TILE_OFFSETS {
                continue;
            }
            for block in &mut group.blocks {
                *block = CompressionFactory::convert_data(block, source, target)
                    .map_err(|e| CodecError::decode(DecodeFailure::CorruptData, e.to_string()))?;
            }
        }

        self.entries.retain(|e| e.tag != tags::COMPRESSION);
        self.entries.push(IFDEntry::from_shorts(tags::COMPRESSION, &[target.tag_value()], self.byte_order));
        self.info.compression = target;
        debug!("Transcoded page from {} to {}", source, target);
        Ok(())
    }
}

impl Frame for IfdFrame {
    fn info(&self) -> &PageInfo {
        &self.info
    }
}

/// Reads an offsets tag and its byte counts into a block group
fn counted_group(ifd: &IFD, bytes: &[u8], offsets_tag: u16, counts_tag: u16) -> Result<Option<BlockGroup>, CodecError> {
    let offsets = match ifd.tag_values(offsets_tag) {
        Some(offsets) => offsets,
        None => return Ok(None),
    };
    let counts = ifd.tag_values(counts_tag).ok_or_else(|| {
        CodecError::invalid_container(TiffError::TagNotFound(counts_tag))
    })?;
    if offsets.len() != counts.len() {
        return Err(CodecError::decode(
            DecodeFailure::InvalidContainer,
            format!("tag {} has {} offsets but {} byte counts", offsets_tag, offsets.len(), counts.len()),
        ));
    }

    let blocks = offsets
        .iter()
        .zip(&counts)
        .map(|(&offset, &count)| reader::read_block(bytes, offset, count, "image block"))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CodecError::decode(DecodeFailure::CorruptData, e.to_string()))?;

    Ok(Some(BlockGroup::with_counts(offsets_tag, counts_tag, blocks)))
}

/// Reads the old-style JPEG interchange stream
///
/// Writers that omit the length tag leave the stream running to the end
/// of the file.
fn interchange_group(ifd: &IFD, bytes: &[u8]) -> Result<Option<BlockGroup>, CodecError> {
    let offset = match ifd.tag_value(tags::JPEG_INTERCHANGE_FORMAT) {
        Some(offset) => offset,
        None => return Ok(None),
    };
    let length = ifd
        .tag_value(tags::JPEG_INTERCHANGE_FORMAT_LENGTH)
        .unwrap_or_else(|| (bytes.len() as u64).saturating_sub(offset));

    let block = reader::read_block(bytes, offset, length, "JPEG interchange stream")
        .map_err(|e| CodecError::decode(DecodeFailure::CorruptData, e.to_string()))?;
    Ok(Some(BlockGroup::with_counts(
        tags::JPEG_INTERCHANGE_FORMAT,
        tags::JPEG_INTERCHANGE_FORMAT_LENGTH,
        vec![block],
    )))
}

/// Reads old-style JPEG quantization or Huffman tables
fn jpeg_table_group(ifd: &IFD, bytes: &[u8], tag: u16) -> Result<Option<BlockGroup>, CodecError> {
    let offsets = match ifd.tag_values(tag) {
        Some(offsets) => offsets,
        None => return Ok(None),
    };

    let mut blocks = Vec::with_capacity(offsets.len());
    for offset in offsets {
        let len = if tag == tags::JPEG_Q_TABLES {
            JPEG_Q_TABLE_LEN
        } else {
            // 16 code length counts followed by that many symbol values
            let counts = reader::read_block(bytes, offset, 16, "JPEG Huffman table")
                .map_err(|e| CodecError::decode(DecodeFailure::CorruptData, e.to_string()))?;
            16 + counts.iter().map(|&c| c as u64).sum::<u64>()
        };
        let block = reader::read_block(bytes, offset, len, "JPEG table")
            .map_err(|e| CodecError::decode(DecodeFailure::CorruptData, e.to_string()))?;
        blocks.push(block);
    }

    Ok(Some(BlockGroup::offsets_only(tag, blocks)))
}

/// Directory-level backend built on the crate's own TIFF reader and writer
#[derive(Debug, Clone)]
pub struct ContainerCodec {
    max_ifds: usize,
}

impl ContainerCodec {
    /// Creates the backend with the default IFD chain limit
    pub fn new() -> Self {
        ContainerCodec { max_ifds: header::MAX_IFDS }
    }
}

impl Default for ContainerCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffCodec for ContainerCodec {
    type Frame = IfdFrame;
    type Encoder = ContainerEncoder;

    fn label(&self) -> &str {
        "Container"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document<IfdFrame>, CodecError> {
        let tiff = TiffReader::new()
            .with_max_ifds(self.max_ifds)
            .read_bytes(bytes)
            .map_err(CodecError::invalid_container)?;

        if tiff.ifds.is_empty() {
            return Err(CodecError::decode(DecodeFailure::InvalidContainer, "no IFDs found"));
        }

        tiff.ifds
            .iter()
            .map(|ifd| IfdFrame::from_ifd(ifd, bytes, tiff.is_big_tiff))
            .collect()
    }

    fn encoder(&self, policy: CompressionPolicy) -> Result<ContainerEncoder, CodecError> {
        Ok(ContainerEncoder {
            policy,
            frames: Vec::new(),
        })
    }

    fn merge_policy(&self) -> CompressionPolicy {
        CompressionPolicy::Preserve
    }

    fn legacy_jpeg_fallback(&self) -> CompressionPolicy {
        CompressionPolicy::Preserve
    }
}

/// Encoding session of the container backend
///
/// Frames are validated and transcoded as they are appended; the IFD chain
/// is written on `finish`, once the page count is known.
pub struct ContainerEncoder {
    policy: CompressionPolicy,
    frames: Vec<IfdFrame>,
}

impl FrameEncoder for ContainerEncoder {
    type Frame = IfdFrame;

    fn append(&mut self, mut frame: IfdFrame) -> Result<(), CodecError> {
        if let Some(base) = self.frames.first() {
            if frame.byte_order != base.byte_order {
                return Err(CodecError::Encode(TiffError::ByteOrderMismatch.to_string()));
            }
            if !base.is_big_tiff {
                if let Some(entry) = frame.entries.iter().find(|e| tag_utils::is_big_tiff_only(e.field_type)) {
                    let error = TiffError::IncompatibleFieldType { tag: entry.tag, field_type: entry.field_type };
                    return Err(CodecError::Encode(error.to_string()));
                }
            }
        }

        if let Some(target) = self.policy.forced_kind() {
            frame.transcode(target)?;
        }

        self.frames.push(frame);
        Ok(())
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn finish(self) -> Result<Vec<u8>, CodecError> {
        let base = self
            .frames
            .first()
            .ok_or_else(|| CodecError::Encode("no pages were appended".to_string()))?;
        let mut writer = TiffWriter::new(base.byte_order, base.is_big_tiff)
            .map_err(|e| CodecError::Encode(e.to_string()))?;

        let total = self.frames.len() as u16;
        for (index, frame) in self.frames.iter().enumerate() {
            let mut entries = frame.entries.clone();
            if let Some(entry) = entries.iter_mut().find(|e| e.tag == tags::PAGE_NUMBER) {
                *entry = IFDEntry::from_shorts(tags::PAGE_NUMBER, &[index as u16, total], frame.byte_order);
            }
            writer
                .append_ifd(&entries, &frame.groups)
                .map_err(|e| CodecError::Encode(format!("page {}: {}", index, e)))?;
        }

        writer.finish().map_err(|e| CodecError::Encode(e.to_string()))
    }
}
