//! Tests for byte order detection and header parsing

extern crate std;

use std::io::Cursor;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::errors::TiffError;
use crate::utils::format_utils::read_header;

fn classic_header_le(first_ifd: u32) -> Vec<u8> {
    let mut buffer = b"II".to_vec();
    buffer.write_u16::<LittleEndian>(42).unwrap();
    buffer.write_u32::<LittleEndian>(first_ifd).unwrap();
    buffer
}

#[test]
fn test_detects_both_markers() {
    let mut le = Cursor::new(b"II*\0".to_vec());
    let mut be = Cursor::new(b"MM\0*".to_vec());
    std::assert_eq!(ByteOrder::detect(&mut le).unwrap(), ByteOrder::LittleEndian);
    std::assert_eq!(ByteOrder::detect(&mut be).unwrap(), ByteOrder::BigEndian);

    let mut garbage = Cursor::new(std::vec![0x12u8, 0x34]);
    std::assert!(ByteOrder::detect(&mut garbage).is_err());
}

#[test]
fn test_handlers_read_in_their_order() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x1234).unwrap();
    buffer.write_u32::<BigEndian>(0x12345678).unwrap();
    buffer.write_u64::<LittleEndian>(0x1234567890ABCDEF).unwrap();
    let mut cursor = Cursor::new(buffer);

    std::assert_eq!(BigEndianHandler.read_u16(&mut cursor).unwrap(), 0x1234);
    std::assert_eq!(BigEndianHandler.read_u32(&mut cursor).unwrap(), 0x12345678);
    std::assert_eq!(LittleEndianHandler.read_u64(&mut cursor).unwrap(), 0x1234567890ABCDEF);
}

#[test]
fn test_handler_writes_match_slice_encoding() {
    let mut written = Vec::new();
    BigEndianHandler.write_u32(&mut written, 0xCAFEBABE).unwrap();
    std::assert_eq!(written, ByteOrder::BigEndian.u32_bytes(&[0xCAFEBABE]));
}

#[test]
fn test_slice_encoding_follows_order() {
    std::assert_eq!(ByteOrder::LittleEndian.u16_bytes(&[0x0102, 0x0304]), std::vec![0x02, 0x01, 0x04, 0x03]);
    std::assert_eq!(ByteOrder::BigEndian.u32_bytes(&[0x01020304]), std::vec![1, 2, 3, 4]);
    std::assert_eq!(ByteOrder::BigEndian.u64_from(&ByteOrder::BigEndian.u64_bytes(&[42])), 42);
    std::assert_eq!(ByteOrder::LittleEndian.marker(), *b"II");
    std::assert_eq!(ByteOrder::BigEndian.create_handler().byte_order(), ByteOrder::BigEndian);
}

#[test]
fn test_classic_header() {
    let mut cursor = Cursor::new(classic_header_le(8));
    let header = read_header(&mut cursor).unwrap();
    std::assert!(!header.is_big_tiff);
    std::assert_eq!(header.first_ifd_offset, 8);
    std::assert_eq!(header.handler.byte_order(), ByteOrder::LittleEndian);
}

#[test]
fn test_bigtiff_header() {
    let mut buffer = b"MM".to_vec();
    buffer.write_u16::<BigEndian>(43).unwrap();
    buffer.write_u16::<BigEndian>(8).unwrap();
    buffer.write_u16::<BigEndian>(0).unwrap();
    buffer.write_u64::<BigEndian>(16).unwrap();

    let header = read_header(&mut Cursor::new(buffer)).unwrap();
    std::assert!(header.is_big_tiff);
    std::assert_eq!(header.first_ifd_offset, 16);
}

#[test]
fn test_bigtiff_header_with_bad_offset_size() {
    let mut buffer = b"II".to_vec();
    buffer.write_u16::<LittleEndian>(43).unwrap();
    buffer.write_u16::<LittleEndian>(4).unwrap();
    buffer.write_u16::<LittleEndian>(0).unwrap();
    buffer.write_u64::<LittleEndian>(16).unwrap();

    std::assert!(std::matches!(read_header(&mut Cursor::new(buffer)), Err(TiffError::InvalidBigTIFFHeader)));
}

#[test]
fn test_unknown_version() {
    let mut buffer = classic_header_le(8);
    buffer[2] = 41;
    std::assert!(std::matches!(read_header(&mut Cursor::new(buffer)), Err(TiffError::UnsupportedVersion(41))));
}

#[test]
fn test_byte_len_keeps_position() {
    let mut cursor = Cursor::new(classic_header_le(8));
    cursor.set_position(3);
    std::assert_eq!(cursor.byte_len().unwrap(), 8);
    std::assert_eq!(cursor.position(), 3);
}
