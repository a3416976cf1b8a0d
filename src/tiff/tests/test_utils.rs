use std::io::Write;
use byteorder::{LittleEndian, WriteBytesExt};

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::tags;
use crate::tiff::ifd::IFDEntry;
use crate::tiff::writer::{BlockGroup, TiffWriter};

/// Directory entries of an uncompressed 8-bit grayscale page in one strip
pub fn gray_page_entries(width: u16, height: u16, byte_order: ByteOrder) -> Vec<IFDEntry> {
    vec![
        IFDEntry::from_shorts(tags::IMAGE_WIDTH, &[width], byte_order),
        IFDEntry::from_shorts(tags::IMAGE_LENGTH, &[height], byte_order),
        IFDEntry::from_shorts(tags::BITS_PER_SAMPLE, &[8], byte_order),
        IFDEntry::from_shorts(tags::COMPRESSION, &[1], byte_order),
        IFDEntry::from_shorts(tags::PHOTOMETRIC_INTERPRETATION, &[1], byte_order),
        IFDEntry::from_shorts(tags::SAMPLES_PER_PIXEL, &[1], byte_order),
        IFDEntry::from_shorts(tags::ROWS_PER_STRIP, &[height], byte_order),
    ]
}

/// Strip group holding one page filled with `fill`
pub fn gray_strip(width: u16, height: u16, fill: u8) -> BlockGroup {
    let data = vec![fill; width as usize * height as usize];
    BlockGroup::with_counts(tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS, vec![data])
}

/// Builds a grayscale TIFF with one page per size, page `i` filled with `i + 1`
pub fn build_gray_tiff(sizes: &[(u16, u16)], byte_order: ByteOrder, is_big_tiff: bool) -> Vec<u8> {
    let mut writer = TiffWriter::new(byte_order, is_big_tiff).unwrap();
    for (index, &(width, height)) in sizes.iter().enumerate() {
        let entries = gray_page_entries(width, height, byte_order);
        writer
            .append_ifd(&entries, &[gray_strip(width, height, index as u8 + 1)])
            .unwrap();
    }
    writer.finish().unwrap()
}

/// Classic little-endian header followed by one IFD at offset 8 holding
/// width and height, whose next pointer is `next_offset`
pub fn create_single_ifd_buffer(width: u32, height: u32, next_offset: u32) -> Vec<u8> {
    let mut buffer = Vec::new();

    buffer.write_all(b"II").unwrap();
    buffer.write_u16::<LittleEndian>(42).unwrap();
    buffer.write_u32::<LittleEndian>(8).unwrap();

    buffer.write_u16::<LittleEndian>(2).unwrap();

    buffer.write_u16::<LittleEndian>(256).unwrap();
    buffer.write_u16::<LittleEndian>(4).unwrap();
    buffer.write_u32::<LittleEndian>(1).unwrap();
    buffer.write_u32::<LittleEndian>(width).unwrap();

    buffer.write_u16::<LittleEndian>(257).unwrap();
    buffer.write_u16::<LittleEndian>(4).unwrap();
    buffer.write_u32::<LittleEndian>(1).unwrap();
    buffer.write_u32::<LittleEndian>(height).unwrap();

    buffer.write_u32::<LittleEndian>(next_offset).unwrap();
    buffer
}
