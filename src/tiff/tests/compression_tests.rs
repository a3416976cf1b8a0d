//! Tests for compression kinds and handlers

extern crate std;

use crate::compression::{CompressionFactory, CompressionHandler, CompressionKind, CompressionPolicy, DeflateHandler};

#[test]
fn test_legacy_jpeg_tag_value() {
    let kind = CompressionKind::from_tag(0x6);
    std::assert_eq!(kind, CompressionKind::LegacyJpeg);
    std::assert!(kind.is_legacy_jpeg());
    std::assert!(!CompressionKind::from_tag(7).is_legacy_jpeg());
}

#[test]
fn test_deflate_codes_collapse() {
    std::assert_eq!(CompressionKind::from_tag(8), CompressionKind::Deflate);
    std::assert_eq!(CompressionKind::from_tag(32946), CompressionKind::Deflate);
    std::assert_eq!(CompressionKind::Deflate.tag_value(), 8);
}

#[test]
fn test_unknown_code_is_kept() {
    let kind = CompressionKind::from_tag(34712);
    std::assert_eq!(kind, CompressionKind::Other(34712));
    std::assert_eq!(kind.tag_value(), 34712);
    std::assert_eq!(kind.to_string(), "Other(34712)");
    std::assert_eq!(CompressionKind::from_tag(32809), CompressionKind::ThunderScan);
}

#[test]
fn test_policy_requests() {
    let policy = CompressionPolicy::Force(CompressionKind::Lzw);
    std::assert!(policy.requests(CompressionKind::Lzw));
    std::assert!(!CompressionPolicy::Preserve.requests(CompressionKind::Lzw));
    std::assert_eq!(CompressionKind::from_name("ZIP"), Some(CompressionKind::Deflate));
    std::assert_eq!(CompressionKind::from_name("bogus"), None);
}

#[test]
fn test_deflate_to_zstd_and_back() {
    let raw: Vec<u8> = (0..4096u32).map(|i| (i % 17) as u8).collect();
    let deflated = CompressionFactory::convert_data(&raw, CompressionKind::Uncompressed, CompressionKind::Deflate).unwrap();
    let zstd = CompressionFactory::convert_data(&deflated, CompressionKind::Deflate, CompressionKind::Zstd).unwrap();
    let back = CompressionFactory::convert_data(&zstd, CompressionKind::Zstd, CompressionKind::Uncompressed).unwrap();
    std::assert_eq!(back, raw);
}

#[test]
fn test_no_handler_for_lzw() {
    std::assert!(!CompressionFactory::has_handler(CompressionKind::Lzw));
    std::assert!(CompressionFactory::has_handler(CompressionKind::Zstd));
    std::assert_eq!(CompressionFactory::transcodable_kinds().len(), 3);
}

#[test]
fn test_handler_names_follow_kind() {
    let handler = CompressionFactory::create_handler(CompressionKind::Deflate).unwrap();
    std::assert_eq!(handler.kind(), CompressionKind::Deflate);
    std::assert_eq!(handler.name(), "Adobe Deflate");
}

#[test]
fn test_truncated_deflate_block_fails() {
    let raw = std::vec![7u8; 2048];
    let block = DeflateHandler::with_level(9).encode_block(&raw).unwrap();
    std::assert!(block.len() < raw.len());
    std::assert!(DeflateHandler::new().decode_block(&block[..block.len() / 2]).is_err());
}
