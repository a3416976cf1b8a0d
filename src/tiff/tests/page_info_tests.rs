//! Tests for page metadata probing

extern crate std;

use crate::compression::CompressionKind;
use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{photometric, sample_format, tags};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::page_info::PageInfo;
use crate::tiff::errors::TiffError;

use super::test_utils::{build_gray_tiff, gray_page_entries};

fn ifd_from(entries: Vec<IFDEntry>, byte_order: ByteOrder) -> IFD {
    let mut ifd = IFD::new(0, 8, byte_order);
    for entry in entries {
        ifd.add_entry(entry);
    }
    ifd
}

#[test]
fn test_probe_all_reads_every_page() {
    let bytes = build_gray_tiff(&[(6, 4), (3, 3)], ByteOrder::BigEndian, false);
    let pages = PageInfo::probe_all(&bytes).unwrap();

    std::assert_eq!(pages.len(), 2);
    std::assert_eq!(pages[0].dimensions(), (6, 4));
    std::assert_eq!(pages[1].dimensions(), (3, 3));
    std::assert_eq!(pages[0].compression, CompressionKind::Uncompressed);
    std::assert_eq!(pages[0].byte_order, ByteOrder::BigEndian);
    std::assert_eq!(pages[0].bits_per_sample, vec![8]);
    std::assert!(!pages[0].is_cmyk());
    std::assert!(pages[0].has_standard_sample_format());
}

#[test]
fn test_defaults_fill_missing_tags() {
    let bo = ByteOrder::LittleEndian;
    let ifd = ifd_from(
        vec![
            IFDEntry::from_shorts(tags::IMAGE_WIDTH, &[10], bo),
            IFDEntry::from_shorts(tags::IMAGE_LENGTH, &[20], bo),
            IFDEntry::from_shorts(tags::SAMPLES_PER_PIXEL, &[3], bo),
        ],
        bo,
    );
    let info = PageInfo::from_ifd(&ifd).unwrap();

    std::assert_eq!(info.compression, CompressionKind::Uncompressed);
    std::assert_eq!(info.bits_per_sample, vec![1, 1, 1]);
    std::assert_eq!(info.sample_format, vec![sample_format::UNSIGNED; 3]);
    std::assert_eq!(info.photometric, None);
}

#[test]
fn test_cmyk_and_sample_format_quirks() {
    let bo = ByteOrder::LittleEndian;
    let mut entries = gray_page_entries(2, 2, bo);
    entries.push(IFDEntry::from_shorts(tags::PHOTOMETRIC_INTERPRETATION, &[photometric::CMYK], bo));
    entries.push(IFDEntry::from_shorts(tags::SAMPLES_PER_PIXEL, &[4], bo));
    entries.push(IFDEntry::from_shorts(tags::BITS_PER_SAMPLE, &[16, 16, 16, 16], bo));
    entries.push(IFDEntry::from_shorts(tags::SAMPLE_FORMAT, &[sample_format::SIGNED; 4], bo));
    let info = PageInfo::from_ifd(&ifd_from(entries, bo)).unwrap();

    std::assert!(info.is_cmyk());
    std::assert_eq!(info.max_bits_per_sample(), 16);
    std::assert_eq!(info.bits_per_pixel(), 64);
    std::assert!(!info.has_standard_sample_format());
}

#[test]
fn test_missing_dimensions() {
    let bo = ByteOrder::LittleEndian;
    let ifd = ifd_from(vec![IFDEntry::from_shorts(tags::IMAGE_WIDTH, &[10], bo)], bo);
    std::assert!(matches!(PageInfo::from_ifd(&ifd), Err(TiffError::MissingDimensions)));
}
