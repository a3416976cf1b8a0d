//! Compression kinds and encoder policies
//!
//! `CompressionKind` is the typed view of tag 259. A `CompressionPolicy`
//! is what a caller asks an encoder to do with each page's compression.

use std::fmt;

use crate::tiff::constants::compression;
use crate::utils::tag_utils;

/// Compression scheme of a page, derived from tag 259 (0x103)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionKind {
    Uncompressed,
    Group3,
    Group4,
    Lzw,
    /// Old-style JPEG-in-TIFF (value 6)
    LegacyJpeg,
    Jpeg,
    /// Adobe Deflate, either the standard (8) or the pre-standard (32946) code
    Deflate,
    PackBits,
    ThunderScan,
    Zstd,
    Other(u16),
}

impl CompressionKind {
    /// Maps a tag 259 value to a kind
    pub fn from_tag(value: u16) -> Self {
        match value {
            compression::NONE => CompressionKind::Uncompressed,
            compression::CCITT_FAX3 => CompressionKind::Group3,
            compression::CCITT_FAX4 => CompressionKind::Group4,
            compression::LZW => CompressionKind::Lzw,
            compression::JPEG_OLD => CompressionKind::LegacyJpeg,
            compression::JPEG => CompressionKind::Jpeg,
            compression::DEFLATE | compression::DEFLATE_OBSOLETE => CompressionKind::Deflate,
            compression::PACKBITS => CompressionKind::PackBits,
            compression::THUNDERSCAN => CompressionKind::ThunderScan,
            compression::ZSTD => CompressionKind::Zstd,
            other => CompressionKind::Other(other),
        }
    }

    /// The tag 259 value written for this kind
    pub fn tag_value(&self) -> u16 {
        match self {
            CompressionKind::Uncompressed => compression::NONE,
            CompressionKind::Group3 => compression::CCITT_FAX3,
            CompressionKind::Group4 => compression::CCITT_FAX4,
            CompressionKind::Lzw => compression::LZW,
            CompressionKind::LegacyJpeg => compression::JPEG_OLD,
            CompressionKind::Jpeg => compression::JPEG,
            CompressionKind::Deflate => compression::DEFLATE,
            CompressionKind::PackBits => compression::PACKBITS,
            CompressionKind::ThunderScan => compression::THUNDERSCAN,
            CompressionKind::Zstd => compression::ZSTD,
            CompressionKind::Other(value) => *value,
        }
    }

    /// Parses a user-facing compression name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "none" | "uncompressed" => Some(CompressionKind::Uncompressed),
            "g3" | "group3" | "fax3" => Some(CompressionKind::Group3),
            "g4" | "group4" | "fax4" => Some(CompressionKind::Group4),
            "lzw" => Some(CompressionKind::Lzw),
            "jpeg" => Some(CompressionKind::Jpeg),
            "deflate" | "zip" | "adobe deflate" => Some(CompressionKind::Deflate),
            "packbits" => Some(CompressionKind::PackBits),
            "zstd" => Some(CompressionKind::Zstd),
            _ => None,
        }
    }

    /// Whether this is old-style JPEG, which disqualifies LZW re-compression
    pub fn is_legacy_jpeg(&self) -> bool {
        matches!(self, CompressionKind::LegacyJpeg)
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        tag_utils::get_compression_name(self.tag_value() as u64)
    }
}

impl fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionKind::Other(value) => write!(f, "Other({})", value),
            kind => write!(f, "{}", kind.name()),
        }
    }
}

/// Encoder parameter set requested from a codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionPolicy {
    /// Keep each page's own compression
    Preserve,
    /// Write every page with the given compression
    Force(CompressionKind),
}

impl CompressionPolicy {
    /// The compression this policy forces, if any
    pub fn forced_kind(&self) -> Option<CompressionKind> {
        match self {
            CompressionPolicy::Preserve => None,
            CompressionPolicy::Force(kind) => Some(*kind),
        }
    }

    /// Whether this policy asks the encoder for `kind`
    pub fn requests(&self, kind: CompressionKind) -> bool {
        self.forced_kind() == Some(kind)
    }
}

impl fmt::Display for CompressionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionPolicy::Preserve => write!(f, "preserve"),
            CompressionPolicy::Force(kind) => write!(f, "force {}", kind),
        }
    }
}

