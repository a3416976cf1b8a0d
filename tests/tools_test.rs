//! Tools backend driven by stand-in libtiff scripts

#![cfg(unix)]

mod common;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use common::gray_tiff;
use tempfile::TempDir;

use tiffpages::codec::{ErrorKind, TiffCodec, ToolsCodec};
use tiffpages::engine::{Merger, TiffMerge};
use tiffpages::model::Page;
use tiffpages::tiff::ByteOrder;

const REJECT_MARKER: &[u8] = b"REJECT-ME";

// tiffsplit: copies the single-page input to <prefix>aaa.tif
const TIFFSPLIT: &str = "#!/bin/sh\n[ $# -eq 2 ] || exit 0\ncp \"$1\" \"${2}aaa.tif\"\n";

// tiffcp: fails on any input carrying the marker, otherwise concatenates
const TIFFCP: &str = r#"#!/bin/sh
for last; do :; done
case "$last" in *.tif) ;; *) exit 0 ;; esac
: > "$last.part"
for arg; do
  case "$arg" in
    -c) ;;
    "$last") ;;
    *.tif)
      if grep -q REJECT-ME "$arg"; then
        echo "tiffcp: $arg: cannot handle this page" >&2
        exit 1
      fi
      cat "$arg" >> "$last.part" ;;
  esac
done
mv "$last.part" "$last"
"#;

fn install_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn fake_tools() -> TempDir {
    let dir = TempDir::new().unwrap();
    install_script(dir.path(), "tiffsplit", TIFFSPLIT);
    install_script(dir.path(), "tiffcp", TIFFCP);
    dir
}

fn rejected_page() -> Page {
    let mut bytes = gray_tiff(&[(2, 2)], ByteOrder::LittleEndian);
    bytes.extend_from_slice(REJECT_MARKER);
    Page::new(bytes)
}

#[test]
fn test_page_rejected_by_tiffcp_is_skipped() {
    let tools = fake_tools();
    let codec = ToolsCodec::with_tool_dir(tools.path());
    codec.check_platform().unwrap();

    let pages = vec![
        Page::new(gray_tiff(&[(2, 2)], ByteOrder::LittleEndian)),
        rejected_page(),
        Page::new(gray_tiff(&[(3, 3)], ByteOrder::LittleEndian)),
    ];
    let output = Merger::new(codec).merge(&pages).unwrap();

    assert_eq!(output.merged, vec![0, 2]);
    assert_eq!(output.skipped.len(), 1);
    assert_eq!(output.skipped[0].index, 1);
    assert!(output.skipped[0].reason.contains("cannot handle"), "{}", output.skipped[0].reason);
}

#[test]
fn test_rejected_base_page_fails_merge() {
    let tools = fake_tools();
    let pages = vec![rejected_page(), Page::new(gray_tiff(&[(2, 2)], ByteOrder::LittleEndian))];

    let error = Merger::new(ToolsCodec::with_tool_dir(tools.path())).merge(&pages).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Encode);
}

#[test]
fn test_missing_tools_are_platform_unsupported() {
    let empty = TempDir::new().unwrap();
    let error = ToolsCodec::with_tool_dir(empty.path()).check_platform().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::PlatformUnsupported);
}
