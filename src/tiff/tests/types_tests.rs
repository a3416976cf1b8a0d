//! Tests for the TIFF types module

extern crate std;

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{field_types, tags};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;

#[test]
fn test_tiff_creation() {
    let tiff = TIFF::new(false, ByteOrder::BigEndian);
    std::assert!(!tiff.is_big_tiff);
    std::assert_eq!(tiff.byte_order, ByteOrder::BigEndian);
    std::assert_eq!(tiff.ifd_count(), 0);
    std::assert!(tiff.main_ifd().is_none());
    std::assert!(!tiff.is_multi_page());
}

#[test]
fn test_ifd_lookup_uses_entry_byte_order() {
    let bo = ByteOrder::BigEndian;
    let mut ifd = IFD::new(0, 8, bo);
    ifd.add_entry(IFDEntry::from_shorts(tags::IMAGE_WIDTH, &[640], bo));
    ifd.add_entry(IFDEntry::new(tags::IMAGE_LENGTH, field_types::LONG, 1, bo.u32_bytes(&[480])));
    ifd.add_entry(IFDEntry::from_shorts(tags::BITS_PER_SAMPLE, &[8, 8, 8], bo));

    std::assert_eq!(ifd.get_dimensions(), Some((640, 480)));
    std::assert_eq!(ifd.tag_values(tags::BITS_PER_SAMPLE), Some(vec![8, 8, 8]));
    std::assert_eq!(ifd.get_samples_per_pixel(), 1);
    std::assert!(!ifd.has_tag(tags::COMPRESSION));
}

#[test]
fn test_later_entry_wins_lookup() {
    let bo = ByteOrder::LittleEndian;
    let mut ifd = IFD::new(0, 8, bo);
    ifd.add_entry(IFDEntry::from_shorts(tags::COMPRESSION, &[1], bo));
    ifd.add_entry(IFDEntry::from_shorts(tags::COMPRESSION, &[5], bo));

    std::assert_eq!(ifd.tag_value(tags::COMPRESSION), Some(5));
    std::assert_eq!(ifd.entry_count(), 2);
}

#[test]
fn test_overviews_follow_subfile_type() {
    let bo = ByteOrder::LittleEndian;
    let mut tiff = TIFF::new(false, bo);

    let mut page = IFD::new(0, 8, bo);
    page.add_entry(IFDEntry::from_shorts(tags::IMAGE_WIDTH, &[1024], bo));
    tiff.ifds.push(page);

    let mut overview = IFD::new(1, 100, bo);
    overview.add_entry(IFDEntry::new(tags::NEW_SUBFILE_TYPE, field_types::LONG, 1, bo.u32_bytes(&[1])));
    overview.add_entry(IFDEntry::from_shorts(tags::IMAGE_WIDTH, &[512], bo));
    overview.add_entry(IFDEntry::from_shorts(tags::IMAGE_LENGTH, &[384], bo));
    tiff.ifds.push(overview);

    let overviews = tiff.overviews();
    std::assert_eq!(overviews.len(), 1);
    std::assert_eq!(overviews[0].get_dimensions(), Some((512, 384)));
}
