//! Block compression strategy
//!
//! A handler knows how to inflate and deflate one strip or tile of a page.
//! The container backend chains two handlers to move a block from one
//! compression kind to another without touching its pixels.

use crate::tiff::errors::TiffResult;
use super::kind::CompressionKind;

pub trait CompressionHandler: Send + Sync {
    /// Inflates one stored block into raw sample bytes
    fn decode_block(&self, block: &[u8]) -> TiffResult<Vec<u8>>;

    /// Compresses raw sample bytes into one stored block
    fn encode_block(&self, raw: &[u8]) -> TiffResult<Vec<u8>>;

    /// Kind written to tag 259 for blocks this handler produces
    fn kind(&self) -> CompressionKind;

    fn name(&self) -> &'static str {
        self.kind().name()
    }
}
