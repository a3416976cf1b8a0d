//! Single-page TIFF buffers

use std::fmt;

use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::reader::TiffReader;
use crate::tiff::PageInfo;

/// One self-contained single-page TIFF
///
/// Equality is by byte content. The buffer is never mutated once built;
/// metadata is probed from it on request.
#[derive(Clone, PartialEq, Eq)]
pub struct Page {
    bytes: Vec<u8>,
}

impl Page {
    /// Wraps an encoded TIFF buffer
    pub fn new(bytes: Vec<u8>) -> Self {
        Page { bytes }
    }

    /// The encoded bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the page and returns its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Size of the encoded buffer
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Probes the metadata of the page's first IFD
    pub fn info(&self) -> TiffResult<PageInfo> {
        let tiff = TiffReader::new().read_bytes(&self.bytes)?;
        let ifd = tiff
            .main_ifd()
            .ok_or_else(|| TiffError::GenericError("No IFD in page".to_string()))?;
        PageInfo::from_ifd(ifd)
    }
}

impl AsRef<[u8]> for Page {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for Page {
    fn from(bytes: Vec<u8>) -> Self {
        Page::new(bytes)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page").field("len", &self.bytes.len()).finish()
    }
}
