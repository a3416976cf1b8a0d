//! Synthetic TIFF corpus shared by the integration tests

#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tiff::encoder::{colortype, Compression, TiffEncoder};

use tiffpages::tiff::constants::{photometric, tags};
use tiffpages::tiff::{BlockGroup, ByteOrder, IFDEntry, TiffReader, TiffWriter};

/// Fake old-style JPEG interchange stream
pub const LEGACY_JPEG_STREAM: [u8; 8] = [0xFF, 0xD8, 0xFF, 0xDB, 0x00, 0x04, 0xFF, 0xD9];

fn gray_entries(width: u16, height: u16, compression: u16, byte_order: ByteOrder) -> Vec<IFDEntry> {
    vec![
        IFDEntry::from_shorts(tags::IMAGE_WIDTH, &[width], byte_order),
        IFDEntry::from_shorts(tags::IMAGE_LENGTH, &[height], byte_order),
        IFDEntry::from_shorts(tags::BITS_PER_SAMPLE, &[8], byte_order),
        IFDEntry::from_shorts(tags::COMPRESSION, &[compression], byte_order),
        IFDEntry::from_shorts(tags::PHOTOMETRIC_INTERPRETATION, &[photometric::BLACK_IS_ZERO], byte_order),
        IFDEntry::from_shorts(tags::SAMPLES_PER_PIXEL, &[1], byte_order),
        IFDEntry::from_shorts(tags::ROWS_PER_STRIP, &[height], byte_order),
        IFDEntry::from_shorts(tags::PAGE_NUMBER, &[0, 0], byte_order),
    ]
}

/// Uncompressed 8-bit grayscale TIFF; page `i` is filled with `i + 1`
pub fn gray_tiff(sizes: &[(u16, u16)], byte_order: ByteOrder) -> Vec<u8> {
    let mut writer = TiffWriter::new(byte_order, false).unwrap();
    for (index, &(width, height)) in sizes.iter().enumerate() {
        let strip = vec![index as u8 + 1; width as usize * height as usize];
        writer
            .append_ifd(
                &gray_entries(width, height, 1, byte_order),
                &[BlockGroup::with_counts(tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS, vec![strip])],
            )
            .unwrap();
    }
    writer.finish().unwrap()
}

/// Points the next-IFD link of classic TIFF page `page` past the end of the buffer
pub fn break_next_ifd_link(bytes: &mut [u8], page: usize) {
    let tiff = TiffReader::new().read_bytes(bytes).unwrap();
    let ifd = &tiff.ifds[page];
    let pointer = ifd.offset as usize + 2 + 12 * ifd.entries.len();
    let target = bytes.len() as u32 + 100;
    let encoded = match tiff.byte_order {
        ByteOrder::LittleEndian => target.to_le_bytes(),
        ByteOrder::BigEndian => target.to_be_bytes(),
    };
    bytes[pointer..pointer + 4].copy_from_slice(&encoded);
}

/// Single 8-bit gray page with an unassociated alpha sample
pub fn gray_alpha_tiff(width: u16, height: u16) -> Vec<u8> {
    let bo = ByteOrder::LittleEndian;
    let mut entries = gray_entries(width, height, 1, bo);
    entries.push(IFDEntry::from_shorts(tags::SAMPLES_PER_PIXEL, &[2], bo));
    entries.push(IFDEntry::from_shorts(tags::BITS_PER_SAMPLE, &[8, 8], bo));
    entries.push(IFDEntry::from_shorts(tags::EXTRA_SAMPLES, &[2], bo));

    let strip = vec![0x80u8; width as usize * height as usize * 2];
    let mut writer = TiffWriter::new(bo, false).unwrap();
    writer
        .append_ifd(&entries, &[BlockGroup::with_counts(tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS, vec![strip])])
        .unwrap();
    writer.finish().unwrap()
}

/// Single uncompressed CMYK page
pub fn cmyk_tiff(width: u16, height: u16) -> Vec<u8> {
    let bo = ByteOrder::LittleEndian;
    let mut entries = gray_entries(width, height, 1, bo);
    entries.push(IFDEntry::from_shorts(tags::PHOTOMETRIC_INTERPRETATION, &[photometric::CMYK], bo));
    entries.push(IFDEntry::from_shorts(tags::SAMPLES_PER_PIXEL, &[4], bo));
    entries.push(IFDEntry::from_shorts(tags::BITS_PER_SAMPLE, &[8, 8, 8, 8], bo));

    let strip = vec![0x40u8; width as usize * height as usize * 4];
    let mut writer = TiffWriter::new(bo, false).unwrap();
    writer
        .append_ifd(&entries, &[BlockGroup::with_counts(tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS, vec![strip])])
        .unwrap();
    writer.finish().unwrap()
}

/// Single old-style JPEG page with an interchange stream and one
/// quantization table
pub fn legacy_jpeg_tiff(width: u16, height: u16) -> Vec<u8> {
    let bo = ByteOrder::LittleEndian;
    let entries = gray_entries(width, height, 6, bo);
    let q_table: Vec<u8> = (0..64).collect();

    let mut writer = TiffWriter::new(bo, false).unwrap();
    writer
        .append_ifd(
            &entries,
            &[
                BlockGroup::with_counts(
                    tags::JPEG_INTERCHANGE_FORMAT,
                    tags::JPEG_INTERCHANGE_FORMAT_LENGTH,
                    vec![LEGACY_JPEG_STREAM.to_vec()],
                ),
                BlockGroup::offsets_only(tags::JPEG_Q_TABLES, vec![q_table]),
            ],
        )
        .unwrap();
    writer.finish().unwrap()
}

/// RGB pixels of page `page`
pub fn rgb_pixels(width: u32, height: u32, page: usize) -> Vec<u8> {
    (0..width * height * 3)
        .map(|i| (i as usize * 7 + page * 31) as u8)
        .collect()
}

/// LZW-compressed RGB TIFF written by the `tiff` encoder
pub fn lzw_rgb_tiff(pages: usize, width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .unwrap()
            .with_compression(Compression::Lzw);
        for page in 0..pages {
            encoder
                .write_image::<colortype::RGB8>(width, height, &rgb_pixels(width, height, page))
                .unwrap();
        }
    }
    buffer
}

/// A corpus directory and a separate artifact directory
pub struct Corpus {
    corpus: TempDir,
    output: TempDir,
}

impl Corpus {
    pub fn new() -> Self {
        Corpus {
            corpus: TempDir::new().unwrap(),
            output: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.corpus.path()
    }

    pub fn output(&self) -> &Path {
        self.output.path()
    }

    /// Writes a corpus file, creating parent directories
    pub fn add(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.corpus.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, bytes).unwrap();
        path
    }
}
