//! Split and merge engines over the container and raster backends

mod common;

use common::{break_next_ifd_link, cmyk_tiff, gray_alpha_tiff, gray_tiff, legacy_jpeg_tiff, lzw_rgb_tiff, rgb_pixels, LEGACY_JPEG_STREAM};

use tiffpages::codec::{ContainerCodec, DecodeFailure, ErrorKind, Frame, FrameEncoder, RasterCodec, TiffCodec};
use tiffpages::compression::CompressionFactory;
use tiffpages::engine::{Merger, Splitter, TiffMerge, TiffSplit};
use tiffpages::model::{CompressionKind, CompressionPolicy, Page};
use tiffpages::tiff::constants::tags;
use tiffpages::tiff::reader::read_block;
use tiffpages::tiff::{ByteOrder, TiffReader};

fn strip_bytes(bytes: &[u8], page: usize) -> Vec<u8> {
    let tiff = TiffReader::new().read_bytes(bytes).unwrap();
    let ifd = &tiff.ifds[page];
    let offset = ifd.tag_value(tags::STRIP_OFFSETS).unwrap();
    let len = ifd.tag_value(tags::STRIP_BYTE_COUNTS).unwrap();
    read_block(bytes, offset, len, "strip").unwrap()
}

#[test]
fn test_container_split_keeps_page_order_and_data() {
    let source = gray_tiff(&[(4, 3), (6, 2), (2, 5)], ByteOrder::LittleEndian);
    let pages = Splitter::new(ContainerCodec::new()).split(&source).unwrap();

    assert_eq!(pages.len(), 3);
    let expected_sizes = [(4, 3), (6, 2), (2, 5)];
    for (index, page) in pages.iter().enumerate() {
        let document = ContainerCodec::new().decode(page.bytes()).unwrap();
        assert_eq!(document.len(), 1);
        assert_eq!(page.info().unwrap().dimensions(), expected_sizes[index]);

        let (w, h) = expected_sizes[index];
        assert_eq!(strip_bytes(page.bytes(), 0), vec![index as u8 + 1; (w * h) as usize]);
    }
}

#[test]
fn test_single_page_split_returns_source() {
    let source = gray_tiff(&[(3, 3)], ByteOrder::BigEndian);
    let pages = Splitter::new(ContainerCodec::new()).split(&source).unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].bytes(), source.as_slice());
}

#[test]
fn test_split_of_garbage_is_invalid_container() {
    let error = Splitter::new(ContainerCodec::new()).split(b"definitely not a tiff").unwrap_err();
    assert_eq!(error.decode_failure(), Some(DecodeFailure::InvalidContainer));
}

#[test]
fn test_broken_middle_link_fails_instead_of_dropping_pages() {
    let mut source = gray_tiff(&[(2, 2), (3, 3), (4, 4)], ByteOrder::LittleEndian);
    break_next_ifd_link(&mut source, 1);

    let error = Splitter::new(ContainerCodec::new()).split(&source).unwrap_err();
    assert_eq!(error.decode_failure(), Some(DecodeFailure::InvalidContainer));

    let error = RasterCodec::new().decode(&source).unwrap_err();
    assert_eq!(error.decode_failure(), Some(DecodeFailure::InvalidContainer));
}

#[test]
fn test_split_then_merge_restores_document() {
    let source = gray_tiff(&[(4, 4), (8, 2), (3, 1)], ByteOrder::BigEndian);
    let pages = Splitter::new(ContainerCodec::new()).split(&source).unwrap();
    let output = Merger::new(ContainerCodec::new()).merge(&pages).unwrap();

    assert_eq!(output.merged, vec![0, 1, 2]);
    assert!(output.skipped.is_empty());
    assert_eq!(output.policy, CompressionPolicy::Preserve);

    let tiff = TiffReader::new().read_bytes(&output.bytes).unwrap();
    assert_eq!(tiff.byte_order, ByteOrder::BigEndian);
    assert_eq!(tiff.ifd_count(), 3);
    for (index, ifd) in tiff.ifds.iter().enumerate() {
        assert_eq!(ifd.tag_values(tags::PAGE_NUMBER), Some(vec![index as u64, 3]));
    }
    assert_eq!(tiff.ifds[1].get_dimensions(), Some((8, 2)));
    assert_eq!(strip_bytes(&output.bytes, 2), vec![3u8; 3]);
}

#[test]
fn test_forced_deflate_transcodes_strips() {
    let pages: Vec<Page> = vec![
        Page::new(gray_tiff(&[(16, 4)], ByteOrder::LittleEndian)),
        Page::new(gray_tiff(&[(16, 4)], ByteOrder::LittleEndian)),
    ];
    let output = Merger::new(ContainerCodec::new())
        .with_policy(CompressionPolicy::Force(CompressionKind::Deflate))
        .merge(&pages)
        .unwrap();

    let document = ContainerCodec::new().decode(&output.bytes).unwrap();
    assert_eq!(document.len(), 2);
    assert!(document.iter().all(|f| f.info().compression == CompressionKind::Deflate));

    let raw = CompressionFactory::convert_data(
        &strip_bytes(&output.bytes, 1),
        CompressionKind::Deflate,
        CompressionKind::Uncompressed,
    )
    .unwrap();
    assert_eq!(raw, vec![1u8; 64]);
}

#[test]
fn test_legacy_jpeg_base_switches_to_fallback() {
    let pages = vec![
        Page::new(legacy_jpeg_tiff(8, 8)),
        Page::new(gray_tiff(&[(8, 8)], ByteOrder::LittleEndian)),
    ];
    let output = Merger::new(ContainerCodec::new())
        .with_policy(CompressionPolicy::Force(CompressionKind::Lzw))
        .merge(&pages)
        .unwrap();

    assert!(output.legacy_jpeg);
    assert!(!output.policy.requests(CompressionKind::Lzw));
    assert_eq!(output.merged, vec![0, 1]);

    let tiff = TiffReader::new().read_bytes(&output.bytes).unwrap();
    let ifd = &tiff.ifds[0];
    assert_eq!(ifd.tag_value(tags::COMPRESSION), Some(6));
    let offset = ifd.tag_value(tags::JPEG_INTERCHANGE_FORMAT).unwrap();
    let len = ifd.tag_value(tags::JPEG_INTERCHANGE_FORMAT_LENGTH).unwrap();
    assert_eq!(read_block(&output.bytes, offset, len, "jpeg").unwrap(), LEGACY_JPEG_STREAM.to_vec());

    let q_offset = ifd.tag_value(tags::JPEG_Q_TABLES).unwrap();
    let q_table = read_block(&output.bytes, q_offset, 64, "q table").unwrap();
    assert_eq!(q_table, (0..64).collect::<Vec<u8>>());
}

#[test]
fn test_failed_pages_are_skipped() {
    let pages = vec![
        Page::new(gray_tiff(&[(2, 2)], ByteOrder::LittleEndian)),
        Page::new(b"garbage".to_vec()),
        Page::new(gray_tiff(&[(2, 2)], ByteOrder::BigEndian)),
        Page::new(gray_tiff(&[(5, 5)], ByteOrder::LittleEndian)),
    ];
    let output = Merger::new(ContainerCodec::new()).merge(&pages).unwrap();

    assert_eq!(output.merged, vec![0, 3]);
    let skipped: Vec<usize> = output.skipped.iter().map(|s| s.index).collect();
    assert_eq!(skipped, vec![1, 2]);

    let document = ContainerCodec::new().decode(&output.bytes).unwrap();
    assert_eq!(document.len(), 2);
    assert_eq!(document[1].info().dimensions(), (5, 5));
}

#[test]
fn test_merge_without_pages_fails() {
    let error = Merger::new(ContainerCodec::new()).merge(&[]).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Encode);
}

#[test]
fn test_base_page_alone_survives_failing_rest() {
    let pages = vec![
        Page::new(gray_tiff(&[(3, 2)], ByteOrder::LittleEndian)),
        Page::new(b"garbage".to_vec()),
        Page::new(b"more garbage".to_vec()),
    ];
    let output = Merger::new(ContainerCodec::new()).merge(&pages).unwrap();

    assert_eq!(output.merged, vec![0]);
    assert_eq!(output.skipped.len(), 2);
    assert_eq!(ContainerCodec::new().decode(&output.bytes).unwrap().len(), 1);
}

#[test]
fn test_base_page_that_cannot_be_appended_fails_merge() {
    let pages = vec![
        Page::new(gray_tiff(&[(2, 2)], ByteOrder::LittleEndian)),
        Page::new(gray_tiff(&[(2, 2)], ByteOrder::LittleEndian)),
    ];
    let error = Merger::new(ContainerCodec::new())
        .with_policy(CompressionPolicy::Force(CompressionKind::Lzw))
        .merge(&pages)
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnsupportedOperation);
}

#[test]
fn test_unreadable_base_page_fails_merge() {
    let pages = vec![Page::new(b"garbage".to_vec()), Page::new(gray_tiff(&[(2, 2)], ByteOrder::LittleEndian))];
    let error = Merger::new(ContainerCodec::new()).merge(&pages).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Encode);
}

#[test]
fn test_raster_split_and_merge_keep_pixels() {
    let source = lzw_rgb_tiff(3, 5, 4);
    let pages = Splitter::new(RasterCodec::new()).split(&source).unwrap();
    assert_eq!(pages.len(), 3);

    let output = Merger::new(RasterCodec::new()).merge(&pages).unwrap();
    assert_eq!(output.policy, CompressionPolicy::Force(CompressionKind::Lzw));

    let document = RasterCodec::new().decode(&output.bytes).unwrap();
    assert_eq!(document.len(), 3);
    for (index, frame) in document.iter().enumerate() {
        assert_eq!(frame.info().compression, CompressionKind::Lzw);
        let image = frame.image().unwrap();
        assert_eq!(image.as_bytes(), rgb_pixels(5, 4, index).as_slice());
    }
}

#[test]
fn test_raster_gray_alpha_fails_at_append() {
    let codec = RasterCodec::new();
    let document = codec.decode(&gray_alpha_tiff(3, 2)).unwrap();
    assert_eq!(document.len(), 1);

    let mut encoder = codec.encoder(CompressionPolicy::Preserve).unwrap();
    let frame = document.into_iter().next().unwrap();
    let error = encoder.append(frame).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnsupportedOperation);
    assert_eq!(encoder.frame_count(), 0);
}

#[test]
fn test_raster_rejects_cmyk() {
    let error = RasterCodec::new().decode(&cmyk_tiff(4, 4)).unwrap_err();
    assert_eq!(error.decode_failure(), Some(DecodeFailure::UnsupportedColorType));

    let document = ContainerCodec::new().decode(&cmyk_tiff(4, 4)).unwrap();
    assert!(document[0].info().is_cmyk());
}

#[test]
fn test_raster_rejects_mixed_page_sizes() {
    let source = gray_tiff(&[(4, 4), (2, 2)], ByteOrder::LittleEndian);
    let error = RasterCodec::new().decode(&source).unwrap_err();
    assert_eq!(error.decode_failure(), Some(DecodeFailure::MismatchedPageSizes));
}

#[test]
fn test_raster_rejects_legacy_jpeg() {
    let error = RasterCodec::new().decode(&legacy_jpeg_tiff(8, 8)).unwrap_err();
    assert_eq!(error.decode_failure(), Some(DecodeFailure::UnsupportedCompression));
}
