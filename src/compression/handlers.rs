//! Block handlers for the kinds the container backend can transcode

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{debug, warn};

use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;
use super::kind::CompressionKind;

/// Blocks stored as raw samples (tag value 1)
pub struct UncompressedHandler;

impl CompressionHandler for UncompressedHandler {
    fn decode_block(&self, block: &[u8]) -> TiffResult<Vec<u8>> {
        Ok(block.to_vec())
    }

    fn encode_block(&self, raw: &[u8]) -> TiffResult<Vec<u8>> {
        Ok(raw.to_vec())
    }

    fn kind(&self) -> CompressionKind {
        CompressionKind::Uncompressed
    }
}

/// Zlib blocks, read under either Deflate code and written as 8
pub struct DeflateHandler {
    level: Compression,
}

impl DeflateHandler {
    pub fn new() -> Self {
        DeflateHandler { level: Compression::default() }
    }

    /// Deflate level from 0 (store) to 9 (best)
    pub fn with_level(level: u32) -> Self {
        DeflateHandler { level: Compression::new(level.min(9)) }
    }
}

impl Default for DeflateHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for DeflateHandler {
    fn decode_block(&self, block: &[u8]) -> TiffResult<Vec<u8>> {
        let mut raw = Vec::new();
        ZlibDecoder::new(block).read_to_end(&mut raw)?;
        Ok(raw)
    }

    fn encode_block(&self, raw: &[u8]) -> TiffResult<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(raw.len() / 2), self.level);
        encoder.write_all(raw)?;
        Ok(encoder.finish()?)
    }

    fn kind(&self) -> CompressionKind {
        CompressionKind::Deflate
    }
}

/// Zstandard blocks (tag value 50000)
pub struct ZstdHandler {
    level: i32,
}

impl ZstdHandler {
    pub fn new() -> Self {
        ZstdHandler { level: 3 }
    }

    /// Level between 1 and 22
    pub fn with_level(level: i32) -> Self {
        ZstdHandler { level: level.clamp(1, 22) }
    }
}

impl Default for ZstdHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for ZstdHandler {
    fn decode_block(&self, block: &[u8]) -> TiffResult<Vec<u8>> {
        if block.is_empty() {
            return Ok(Vec::new());
        }
        zstd::decode_all(block).map_err(|e| {
            warn!("Zstd block of {} bytes does not decode: {}", block.len(), e);
            TiffError::IoError(e)
        })
    }

    fn encode_block(&self, raw: &[u8]) -> TiffResult<Vec<u8>> {
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let encoded = zstd::encode_all(raw, self.level)
            .map_err(|e| TiffError::GenericError(format!("zstd level {}: {}", self.level, e)))?;
        debug!("Zstd block {} -> {} bytes", raw.len(), encoded.len());
        Ok(encoded)
    }

    fn kind(&self) -> CompressionKind {
        CompressionKind::Zstd
    }
}
