//! TIFF header parsing
//!
//! The 8-byte classic header or the 16-byte BigTIFF header tells the
//! reader how to interpret everything after it.

use std::io::{Seek, SeekFrom};

use log::debug;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::validation;
use crate::utils::ifd_utils;

/// What the header says about the rest of the buffer
pub struct TiffHeader {
    pub handler: Box<dyn ByteOrderHandler>,
    pub is_big_tiff: bool,
    pub first_ifd_offset: u64,
}

/// Reads the header at the start of `reader`
///
/// Fails with `UnsupportedVersion` for a magic number other than 42 or 43,
/// and with `InvalidBigTIFFHeader` for a BigTIFF with a bad offset size.
pub fn read_header(reader: &mut dyn SeekableReader) -> TiffResult<TiffHeader> {
    reader.seek(SeekFrom::Start(0))?;
    let byte_order = ByteOrder::detect(reader)?;
    let handler = byte_order.create_handler();

    let version = handler.read_u16(reader)?;
    let is_big_tiff = match version {
        header::BIG_TIFF_VERSION => {
            validation::validate_bigtiff_header(reader, handler.as_ref())?;
            true
        }
        header::TIFF_VERSION => false,
        other => return Err(TiffError::UnsupportedVersion(other)),
    };

    let first_ifd_offset = ifd_utils::read_ifd_offset(reader, is_big_tiff, handler.as_ref())?;
    debug!(
        "{} {} header, first IFD at {}",
        byte_order.name(),
        if is_big_tiff { "BigTIFF" } else { "TIFF" },
        first_ifd_offset
    );

    Ok(TiffHeader { handler, is_big_tiff, first_ifd_offset })
}
