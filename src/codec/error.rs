//! Codec failure taxonomy

use std::fmt;
use std::io;

use crate::tiff::errors::TiffError;

/// Why a buffer could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeFailure {
    /// Not a TIFF, or a broken header or directory chain
    InvalidContainer,
    UnsupportedColorType,
    UnsupportedCompression,
    UnsupportedSampleFormat,
    UnsupportedBitDepth,
    /// Pages of different sizes where the backend requires uniform pages
    MismatchedPageSizes,
    /// Damaged pixel data, such as a corrupted LZW table
    CorruptData,
}

impl DecodeFailure {
    /// Snake-case name used in capability files
    pub fn name(&self) -> &'static str {
        match self {
            DecodeFailure::InvalidContainer => "invalid_container",
            DecodeFailure::UnsupportedColorType => "unsupported_color_type",
            DecodeFailure::UnsupportedCompression => "unsupported_compression",
            DecodeFailure::UnsupportedSampleFormat => "unsupported_sample_format",
            DecodeFailure::UnsupportedBitDepth => "unsupported_bit_depth",
            DecodeFailure::MismatchedPageSizes => "mismatched_page_sizes",
            DecodeFailure::CorruptData => "corrupt_data",
        }
    }

    /// Parses a snake-case name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.name() == name)
    }

    /// Every failure kind
    pub fn all() -> &'static [DecodeFailure] {
        &[
            DecodeFailure::InvalidContainer,
            DecodeFailure::UnsupportedColorType,
            DecodeFailure::UnsupportedCompression,
            DecodeFailure::UnsupportedSampleFormat,
            DecodeFailure::UnsupportedBitDepth,
            DecodeFailure::MismatchedPageSizes,
            DecodeFailure::CorruptData,
        ]
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse error class, used by the harness to classify outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Encode,
    UnsupportedOperation,
    PlatformUnsupported,
    Io,
}

impl ErrorKind {
    /// Category label used in failure records
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Decode => "DecodeError",
            ErrorKind::Encode => "EncodeError",
            ErrorKind::UnsupportedOperation => "UnsupportedOperation",
            ErrorKind::PlatformUnsupported => "PlatformUnsupported",
            ErrorKind::Io => "IoError",
        }
    }

    /// Whether the harness treats this kind as "not testable here"
    pub fn is_inconclusive(&self) -> bool {
        matches!(self, ErrorKind::UnsupportedOperation | ErrorKind::PlatformUnsupported)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised by codec backends and the split/merge engines
#[derive(Debug)]
pub enum CodecError {
    /// The bytes are not a valid or backend-supported TIFF
    Decode { failure: DecodeFailure, message: String },
    /// Assembling an output document failed
    Encode(String),
    /// The backend deliberately has no implementation for this case
    UnsupportedOperation(String),
    /// The backend cannot run in this environment
    PlatformUnsupported(String),
    /// I/O error outside the codec proper
    Io(io::Error),
}

impl CodecError {
    /// Shorthand for a decode error
    pub fn decode(failure: DecodeFailure, message: impl Into<String>) -> Self {
        CodecError::Decode { failure, message: message.into() }
    }

    /// Maps a structural error to an invalid container decode error
    pub fn invalid_container(error: TiffError) -> Self {
        CodecError::decode(DecodeFailure::InvalidContainer, error.to_string())
    }

    /// The coarse class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Decode { .. } => ErrorKind::Decode,
            CodecError::Encode(_) => ErrorKind::Encode,
            CodecError::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            CodecError::PlatformUnsupported(_) => ErrorKind::PlatformUnsupported,
            CodecError::Io(_) => ErrorKind::Io,
        }
    }

    /// The decode failure, when this is a decode error
    pub fn decode_failure(&self) -> Option<DecodeFailure> {
        match self {
            CodecError::Decode { failure, .. } => Some(*failure),
            _ => None,
        }
    }

    /// Message without the category prefix
    pub fn message(&self) -> String {
        match self {
            CodecError::Decode { failure, message } => format!("{}: {}", failure, message),
            CodecError::Encode(message)
            | CodecError::UnsupportedOperation(message)
            | CodecError::PlatformUnsupported(message) => message.clone(),
            CodecError::Io(e) => e.to_string(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(error: io::Error) -> Self {
        CodecError::Io(error)
    }
}
