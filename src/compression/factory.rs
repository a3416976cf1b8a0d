//! Handler lookup by compression kind

use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;
use super::handlers::{DeflateHandler, UncompressedHandler, ZstdHandler};
use super::kind::CompressionKind;

pub struct CompressionFactory;

impl CompressionFactory {
    /// Handler for blocks of `kind`
    ///
    /// Fails with `UnsupportedCompression` for kinds the container backend
    /// carries through untouched but cannot transcode.
    pub fn create_handler(kind: CompressionKind) -> TiffResult<Box<dyn CompressionHandler>> {
        match kind {
            CompressionKind::Uncompressed => Ok(Box::new(UncompressedHandler)),
            CompressionKind::Deflate => Ok(Box::new(DeflateHandler::new())),
            CompressionKind::Zstd => Ok(Box::new(ZstdHandler::new())),
            other => Err(TiffError::UnsupportedCompression(other.tag_value())),
        }
    }

    pub fn has_handler(kind: CompressionKind) -> bool {
        Self::create_handler(kind).is_ok()
    }

    /// Moves one strip or tile from `source` to `target` compression
    pub fn convert_data(block: &[u8], source: CompressionKind, target: CompressionKind) -> TiffResult<Vec<u8>> {
        if source == target {
            return Ok(block.to_vec());
        }
        let raw = Self::create_handler(source)?.decode_block(block)?;
        Self::create_handler(target)?.encode_block(&raw)
    }

    /// Kinds that can be both read and written block by block
    pub fn transcodable_kinds() -> Vec<CompressionKind> {
        vec![CompressionKind::Uncompressed, CompressionKind::Deflate, CompressionKind::Zstd]
    }
}
