//! Split engine

use log::{debug, info};

use crate::codec::{CodecError, DecodeFailure, FrameEncoder, TiffCodec};
use crate::model::{CompressionPolicy, Page};

/// Decomposes a multi-page TIFF into standalone single-page TIFFs
pub trait TiffSplit {
    /// Splits `source` into one buffer per page, in document order
    fn split(&self, source: &[u8]) -> Result<Vec<Page>, CodecError>;
}

/// Split engine over a codec backend
#[derive(Debug, Clone, Default)]
pub struct Splitter<C> {
    codec: C,
}

impl<C: TiffCodec> Splitter<C> {
    pub fn new(codec: C) -> Self {
        Splitter { codec }
    }

    /// The backend this engine uses
    pub fn codec(&self) -> &C {
        &self.codec
    }
}

impl<C: TiffCodec> TiffSplit for Splitter<C> {
    fn split(&self, source: &[u8]) -> Result<Vec<Page>, CodecError> {
        let document = self.codec.decode(source)?;

        match document.len() {
            0 => Err(CodecError::decode(DecodeFailure::InvalidContainer, "document has no pages")),
            1 => {
                debug!("{}: single page, returning source bytes", self.codec.label());
                Ok(vec![Page::new(source.to_vec())])
            }
            count => {
                let mut pages = Vec::with_capacity(count);
                for (index, frame) in document.into_iter().enumerate() {
                    let mut encoder = self.codec.encoder(CompressionPolicy::Preserve)?;
                    encoder.append(frame)?;
                    let bytes = encoder.finish()?;
                    debug!("{}: page {} re-encoded to {} bytes", self.codec.label(), index, bytes.len());
                    pages.push(Page::new(bytes));
                }
                info!("{}: split {} pages", self.codec.label(), count);
                Ok(pages)
            }
        }
    }
}
