//! Tests for reading and writing directory chains

extern crate std;

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{field_types, tags};
use crate::tiff::errors::TiffError;
use crate::tiff::ifd::IFDEntry;
use crate::tiff::reader::{read_block, TiffReader};
use crate::tiff::writer::TiffWriter;

use super::test_utils::{build_gray_tiff, create_single_ifd_buffer, gray_page_entries, gray_strip};

const DOCUMENT_NAME: u16 = 269;

fn strip_of(bytes: &[u8], page: usize) -> Vec<u8> {
    let tiff = TiffReader::new().read_bytes(bytes).unwrap();
    let ifd = &tiff.ifds[page];
    let offset = ifd.tag_value(tags::STRIP_OFFSETS).unwrap();
    let len = ifd.tag_value(tags::STRIP_BYTE_COUNTS).unwrap();
    read_block(bytes, offset, len, "strip").unwrap()
}

#[test]
fn test_written_chain_reads_back_in_order() {
    let bytes = build_gray_tiff(&[(4, 3), (5, 2), (2, 2)], ByteOrder::LittleEndian, false);
    let tiff = TiffReader::new().read_bytes(&bytes).unwrap();

    std::assert!(!tiff.is_big_tiff);
    std::assert_eq!(tiff.ifd_count(), 3);
    std::assert_eq!(tiff.ifds[0].get_dimensions(), Some((4, 3)));
    std::assert_eq!(tiff.ifds[1].get_dimensions(), Some((5, 2)));
    std::assert_eq!(tiff.ifds[2].get_dimensions(), Some((2, 2)));

    std::assert_eq!(strip_of(&bytes, 0), vec![1u8; 12]);
    std::assert_eq!(strip_of(&bytes, 1), vec![2u8; 10]);
    std::assert_eq!(strip_of(&bytes, 2), vec![3u8; 4]);
}

#[test]
fn test_big_endian_bigtiff_uses_long8_offsets() {
    let bytes = build_gray_tiff(&[(3, 3), (3, 3)], ByteOrder::BigEndian, true);
    std::assert_eq!(&bytes[0..2], b"MM");

    let tiff = TiffReader::new().read_bytes(&bytes).unwrap();
    std::assert!(tiff.is_big_tiff);
    std::assert_eq!(tiff.byte_order, ByteOrder::BigEndian);
    std::assert_eq!(tiff.ifd_count(), 2);

    let offsets = tiff.ifds[1].get_entry(tags::STRIP_OFFSETS).unwrap();
    std::assert_eq!(offsets.field_type, field_types::LONG8);
    std::assert_eq!(strip_of(&bytes, 1), vec![2u8; 9]);
}

#[test]
fn test_classic_writer_rejects_bigtiff_field_types() {
    let bo = ByteOrder::LittleEndian;
    let mut writer = TiffWriter::new(bo, false).unwrap();
    let mut entries = gray_page_entries(2, 2, bo);
    entries.push(IFDEntry::new(65000, field_types::LONG8, 1, bo.u64_bytes(&[7])));

    match writer.append_ifd(&entries, &[gray_strip(2, 2, 0)]) {
        Err(TiffError::IncompatibleFieldType { tag, field_type }) => {
            std::assert_eq!(tag, 65000);
            std::assert_eq!(field_type, field_types::LONG8);
        }
        other => std::panic!("expected IncompatibleFieldType, got {:?}", other),
    }

    let big = TiffWriter::new(bo, true).unwrap();
    std::assert!(big.check_entries(&entries).is_ok());
}

#[test]
fn test_finish_without_ifds_fails() {
    let writer = TiffWriter::new(ByteOrder::LittleEndian, false).unwrap();
    std::assert!(writer.finish().is_err());
}

#[test]
fn test_external_values_are_relocated() {
    let bo = ByteOrder::LittleEndian;
    let mut writer = TiffWriter::new(bo, false).unwrap();
    let mut entries = gray_page_entries(2, 2, bo);
    entries.push(IFDEntry::new(DOCUMENT_NAME, field_types::ASCII, 12, b"scan-001.tif".to_vec()));
    writer.append_ifd(&entries, &[gray_strip(2, 2, 9)]).unwrap();
    let bytes = writer.finish().unwrap();

    let tiff = TiffReader::new().read_bytes(&bytes).unwrap();
    let name = tiff.ifds[0].get_entry(DOCUMENT_NAME).unwrap();
    std::assert_eq!(name.data, b"scan-001.tif".to_vec());
}

#[test]
fn test_self_referencing_chain_fails() {
    let bytes = create_single_ifd_buffer(200, 100, 8);
    let result = TiffReader::new().read_bytes(&bytes);
    std::assert!(matches!(result, Err(TiffError::IfdLoop(8))));
}

#[test]
fn test_chain_over_limit_fails() {
    let bytes = build_gray_tiff(&[(1, 1), (1, 1), (1, 1), (1, 1)], ByteOrder::LittleEndian, false);
    let result = TiffReader::new().with_max_ifds(2).read_bytes(&bytes);
    std::assert!(matches!(result, Err(TiffError::TooManyIfds(2))));
    std::assert_eq!(TiffReader::new().with_max_ifds(4).read_bytes(&bytes).unwrap().ifd_count(), 4);
}

#[test]
fn test_next_link_past_end_fails() {
    let bytes = create_single_ifd_buffer(10, 10, 100_000);
    std::assert!(TiffReader::new().read_bytes(&bytes).is_err());
}

#[test]
fn test_first_ifd_outside_buffer_fails() {
    let mut bytes = create_single_ifd_buffer(10, 10, 0);
    bytes[4..8].copy_from_slice(&1000u32.to_le_bytes());
    std::assert!(TiffReader::new().read_bytes(&bytes).is_err());
}

#[test]
fn test_short_buffer_is_invalid_header() {
    let result = TiffReader::new().read_bytes(b"II*\0");
    std::assert!(matches!(result, Err(TiffError::InvalidHeader)));
}

#[test]
fn test_read_block_bounds() {
    let data = [0u8, 1, 2, 3, 4];
    std::assert_eq!(read_block(&data, 1, 3, "block").unwrap(), vec![1, 2, 3]);
    std::assert!(matches!(read_block(&data, 3, 4, "block"), Err(TiffError::OutOfBounds { .. })));
    std::assert!(read_block(&data, u64::MAX, 2, "block").is_err());
}
