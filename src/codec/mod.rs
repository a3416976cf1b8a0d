//! Codec backends
//!
//! A backend implements `TiffCodec`: it decodes a TIFF buffer into a
//! document of its own frame type and encodes frames back into a TIFF
//! buffer under a `CompressionPolicy`. The engines and the harness are
//! generic over the trait, so a backend is chosen by construction.

mod error;
pub mod container;
pub mod raster;
pub mod tools;

pub use container::{ContainerCodec, IfdFrame};
pub use error::{CodecError, DecodeFailure, ErrorKind};
pub use raster::{RasterCodec, RasterFrame};
pub use tools::{ToolFrame, ToolsCodec};

use crate::model::{CompressionPolicy, Document, PageInfo};

/// Access to the metadata of a decoded frame
pub trait Frame {
    /// Metadata of the IFD the frame came from
    fn info(&self) -> &PageInfo;
}

/// An open multi-frame encoding session
pub trait FrameEncoder {
    type Frame: Frame;

    /// Appends one frame as the next page
    fn append(&mut self, frame: Self::Frame) -> Result<(), CodecError>;

    /// Number of frames appended so far
    fn frame_count(&self) -> usize;

    /// Finishes the document and returns its bytes
    fn finish(self) -> Result<Vec<u8>, CodecError>;
}

/// Contract every TIFF backend satisfies
pub trait TiffCodec {
    type Frame: Frame;
    type Encoder: FrameEncoder<Frame = Self::Frame>;

    /// Backend label used in artifact paths and reports
    fn label(&self) -> &str;

    /// Fails with `PlatformUnsupported` when the backend cannot run here
    fn check_platform(&self) -> Result<(), CodecError> {
        Ok(())
    }

    /// Decodes every page of a TIFF buffer
    fn decode(&self, bytes: &[u8]) -> Result<Document<Self::Frame>, CodecError>;

    /// Opens an encoding session
    fn encoder(&self, policy: CompressionPolicy) -> Result<Self::Encoder, CodecError>;

    /// Encodes a whole document in one call
    fn encode(&self, document: Document<Self::Frame>, policy: CompressionPolicy) -> Result<Vec<u8>, CodecError> {
        let mut encoder = self.encoder(policy)?;
        for frame in document {
            encoder.append(frame)?;
        }
        encoder.finish()
    }

    /// Policy the merge engine requests by default
    fn merge_policy(&self) -> CompressionPolicy;

    /// Policy used instead when the base page carries legacy JPEG
    fn legacy_jpeg_fallback(&self) -> CompressionPolicy;
}
