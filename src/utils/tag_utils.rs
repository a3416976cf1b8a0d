//! TIFF tag utilities
//!
//! Utilities for working with TIFF tags and their values.

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{compression, field_types, photometric, sample_format, tags};

/// Size in bytes of one value of the given field type
///
/// Returns `None` for field types this crate does not know how to size.
pub fn field_type_size(field_type: u16) -> Option<usize> {
    match field_type {
        field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => Some(1),
        field_types::SHORT | field_types::SSHORT => Some(2),
        field_types::LONG | field_types::SLONG | field_types::FLOAT | field_types::IFD => Some(4),
        field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => Some(8),
        field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => Some(8),
        _ => None,
    }
}

/// Whether a field type only exists in BigTIFF
pub fn is_big_tiff_only(field_type: u16) -> bool {
    matches!(field_type, field_types::LONG8 | field_types::SLONG8 | field_types::IFD8)
}

/// Decodes raw tag bytes into unsigned integers
///
/// Only integer field types produce values; rationals, floats and strings
/// yield an empty vector since no caller interprets them numerically.
pub fn decode_tag_values(field_type: u16, data: &[u8], byte_order: ByteOrder) -> Vec<u64> {
    match field_type {
        field_types::BYTE | field_types::UNDEFINED | field_types::SBYTE => {
            data.iter().map(|&b| b as u64).collect()
        }
        field_types::SHORT | field_types::SSHORT => data
            .chunks_exact(2)
            .map(|c| byte_order.u16_from(c) as u64)
            .collect(),
        field_types::LONG | field_types::SLONG | field_types::IFD => data
            .chunks_exact(4)
            .map(|c| byte_order.u32_from(c) as u64)
            .collect(),
        field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => data
            .chunks_exact(8)
            .map(|c| byte_order.u64_from(c))
            .collect(),
        _ => Vec::new(),
    }
}

/// Get the name of a TIFF tag
///
/// Returns a human-readable name for a tag based on its numeric ID.
/// If the tag is not recognized, returns "Unknown".
pub fn get_tag_name(tag: u16) -> &'static str {
    match tag {
        tags::NEW_SUBFILE_TYPE => "NewSubfileType",
        tags::IMAGE_WIDTH => "ImageWidth",
        tags::IMAGE_LENGTH => "ImageLength",
        tags::BITS_PER_SAMPLE => "BitsPerSample",
        tags::COMPRESSION => "Compression",
        tags::PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        tags::STRIP_OFFSETS => "StripOffsets",
        tags::SAMPLES_PER_PIXEL => "SamplesPerPixel",
        tags::ROWS_PER_STRIP => "RowsPerStrip",
        tags::STRIP_BYTE_COUNTS => "StripByteCounts",
        tags::PLANAR_CONFIGURATION => "PlanarConfiguration",
        tags::FREE_OFFSETS => "FreeOffsets",
        tags::FREE_BYTE_COUNTS => "FreeByteCounts",
        tags::PAGE_NUMBER => "PageNumber",
        tags::PREDICTOR => "Predictor",
        tags::TILE_WIDTH => "TileWidth",
        tags::TILE_LENGTH => "TileLength",
        tags::TILE_OFFSETS => "TileOffsets",
        tags::TILE_BYTE_COUNTS => "TileByteCounts",
        tags::SUB_IFDS => "SubIFDs",
        tags::SAMPLE_FORMAT => "SampleFormat",
        tags::JPEG_INTERCHANGE_FORMAT => "JPEGInterchangeFormat",
        tags::JPEG_INTERCHANGE_FORMAT_LENGTH => "JPEGInterchangeFormatLength",
        tags::JPEG_Q_TABLES => "JPEGQTables",
        tags::JPEG_DC_TABLES => "JPEGDCTables",
        tags::JPEG_AC_TABLES => "JPEGACTables",
        tags::EXIF_IFD => "ExifIFD",
        tags::GPS_IFD => "GPSInfoIFD",
        tags::INTEROPERABILITY_IFD => "InteroperabilityIFD",
        _ => "Unknown",
    }
}

/// Get the name of a TIFF field type
pub fn get_field_type_name(field_type: u16) -> &'static str {
    match field_type {
        field_types::BYTE => "BYTE",
        field_types::ASCII => "ASCII",
        field_types::SHORT => "SHORT",
        field_types::LONG => "LONG",
        field_types::RATIONAL => "RATIONAL",
        field_types::SBYTE => "SBYTE",
        field_types::UNDEFINED => "UNDEFINED",
        field_types::SSHORT => "SSHORT",
        field_types::SLONG => "SLONG",
        field_types::SRATIONAL => "SRATIONAL",
        field_types::FLOAT => "FLOAT",
        field_types::DOUBLE => "DOUBLE",
        field_types::IFD => "IFD",
        field_types::LONG8 => "LONG8",
        field_types::SLONG8 => "SLONG8",
        field_types::IFD8 => "IFD8",
        _ => "Unknown",
    }
}

/// Get the name of a compression method
pub fn get_compression_name(compression_code: u64) -> &'static str {
    match compression_code as u16 {
        compression::NONE => "None",
        compression::CCITT_RLE => "CCITT RLE",
        compression::CCITT_FAX3 => "CCITT Group 3 Fax",
        compression::CCITT_FAX4 => "CCITT Group 4 Fax",
        compression::LZW => "LZW",
        compression::JPEG_OLD => "Old JPEG",
        compression::JPEG => "JPEG",
        compression::DEFLATE | compression::DEFLATE_OBSOLETE => "Adobe Deflate",
        compression::ZSTD => "Zstandard",
        compression::PACKBITS => "PackBits",
        compression::THUNDERSCAN => "ThunderScan",
        _ => "Unknown",
    }
}

/// Get the name of a photometric interpretation method
pub fn get_photometric_name(photometric_code: u64) -> &'static str {
    match photometric_code as u16 {
        photometric::WHITE_IS_ZERO => "WhiteIsZero",
        photometric::BLACK_IS_ZERO => "BlackIsZero",
        photometric::RGB => "RGB",
        photometric::PALETTE => "Palette",
        photometric::TRANSPARENCY_MASK => "TransparencyMask",
        photometric::CMYK => "CMYK",
        photometric::YCBCR => "YCbCr",
        photometric::CIELAB => "CIELAB",
        _ => "Unknown",
    }
}

/// Get the name of a sample format
pub fn get_sample_format_name(format_code: u64) -> &'static str {
    match format_code as u16 {
        sample_format::UNSIGNED => "UnsignedInteger",
        sample_format::SIGNED => "SignedInteger",
        sample_format::IEEEFP => "Float",
        sample_format::VOID => "Undefined",
        sample_format::COMPLEX_INT => "ComplexInt",
        sample_format::COMPLEX_IEEEFP => "ComplexFloat",
        _ => "Unknown",
    }
}
