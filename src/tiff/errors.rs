//! Custom error types for TIFF structure handling

use std::fmt;
use std::io;

/// TIFF-specific error types
#[derive(Debug)]
pub enum TiffError {
    /// I/O error
    IoError(io::Error),
    /// Invalid TIFF header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Invalid BigTIFF header
    InvalidBigTIFFHeader,
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// An offset or length points outside the buffer
    OutOfBounds { what: String, offset: u64, len: u64, size: u64 },
    /// The IFD chain revisits an offset
    IfdLoop(u64),
    /// The IFD chain is longer than the reader's limit
    TooManyIfds(usize),
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Compression method without a handler
    UnsupportedCompression(u16),
    /// Field type that cannot be stored in the target container
    IncompatibleFieldType { tag: u16, field_type: u16 },
    /// Page byte order differs from the document being written
    ByteOrderMismatch,
    /// Image dimensions not found
    MissingDimensions,
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::InvalidHeader => write!(f, "Invalid TIFF header"),
            TiffError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            TiffError::InvalidBigTIFFHeader => write!(f, "Invalid BigTIFF header"),
            TiffError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            TiffError::OutOfBounds { what, offset, len, size } => write!(
                f, "{} at offset {} (length {}) exceeds buffer size {}", what, offset, len, size
            ),
            TiffError::IfdLoop(offset) => write!(f, "IFD chain loops back to offset {}", offset),
            TiffError::TooManyIfds(limit) => write!(f, "IFD chain exceeds {} directories", limit),
            TiffError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            TiffError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            TiffError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            TiffError::IncompatibleFieldType { tag, field_type } => write!(
                f, "Tag {} uses field type {} which classic TIFF cannot store", tag, field_type
            ),
            TiffError::ByteOrderMismatch => write!(f, "Page byte order differs from the document byte order"),
            TiffError::MissingDimensions => write!(f, "Image dimensions not found"),
            TiffError::GenericError(msg) => write!(f, "TIFF error: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TiffError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;

impl From<String> for TiffError {
    fn from(msg: String) -> Self {
        TiffError::GenericError(msg)
    }
}
