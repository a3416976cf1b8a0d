//! Backend delegating to the libtiff command line tools
//!
//! `tiffsplit` isolates pages and `tiffcp` assembles documents. Both run
//! against files in a temporary directory that is removed when the call
//! returns. Environments without the tools report `PlatformUnsupported`.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::{debug, trace, warn};
use tempfile::TempDir;

use crate::codec::{CodecError, DecodeFailure, Frame, FrameEncoder, TiffCodec};
use crate::compression::{CompressionKind, CompressionPolicy};
use crate::model::Document;
use crate::tiff::PageInfo;

const TIFFCP: &str = "tiffcp";
const TIFFSPLIT: &str = "tiffsplit";

/// One page as written by `tiffsplit`
#[derive(Debug, Clone)]
pub struct ToolFrame {
    info: PageInfo,
    bytes: Vec<u8>,
}

impl ToolFrame {
    /// The standalone single-page TIFF
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Frame for ToolFrame {
    fn info(&self) -> &PageInfo {
        &self.info
    }
}

/// libtiff tools backend
#[derive(Debug, Clone, Default)]
pub struct ToolsCodec {
    tool_dir: Option<PathBuf>,
}

impl ToolsCodec {
    /// Uses the tools found on `PATH`
    pub fn new() -> Self {
        ToolsCodec { tool_dir: None }
    }

    /// Uses the tools in `dir`
    pub fn with_tool_dir(dir: impl Into<PathBuf>) -> Self {
        ToolsCodec { tool_dir: Some(dir.into()) }
    }

    fn tool(&self, name: &str) -> PathBuf {
        match &self.tool_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Runs a tool, mapping a failed spawn to `PlatformUnsupported`
    fn run(&self, name: &str, args: &[OsString]) -> Result<Output, CodecError> {
        let program = self.tool(name);
        trace!("Running {} {:?}", program.display(), args);
        Command::new(&program).args(args).output().map_err(|e| {
            CodecError::PlatformUnsupported(format!("cannot run {}: {}", program.display(), e))
        })
    }
}

impl TiffCodec for ToolsCodec {
    type Frame = ToolFrame;
    type Encoder = ToolsEncoder;

    fn label(&self) -> &str {
        "Tools"
    }

    fn check_platform(&self) -> Result<(), CodecError> {
        for name in [TIFFCP, TIFFSPLIT] {
            Command::new(self.tool(name)).arg("-h").output().map_err(|e| {
                CodecError::PlatformUnsupported(format!("{} is not available: {}", name, e))
            })?;
        }
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document<ToolFrame>, CodecError> {
        PageInfo::probe_all(bytes).map_err(CodecError::invalid_container)?;

        let workspace = TempDir::new()?;
        let input = workspace.path().join("input.tif");
        fs::write(&input, bytes)?;

        let prefix = workspace.path().join("page_");
        let output = self.run(TIFFSPLIT, &[input.into_os_string(), prefix.into_os_string()])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            close_workspace(workspace);
            return Err(CodecError::decode(classify_stderr(&stderr), stderr.trim().to_string()));
        }

        let result = collect_pages(workspace.path());
        close_workspace(workspace);
        result
    }

    fn encoder(&self, policy: CompressionPolicy) -> Result<ToolsEncoder, CodecError> {
        let scheme = match policy.forced_kind() {
            None => None,
            Some(kind) => Some(tiffcp_scheme(kind).ok_or_else(|| {
                CodecError::UnsupportedOperation(format!("tiffcp has no scheme for {} compression", kind))
            })?),
        };
        Ok(ToolsEncoder {
            codec: self.clone(),
            scheme,
            frames: Vec::new(),
        })
    }

    fn merge_policy(&self) -> CompressionPolicy {
        CompressionPolicy::Preserve
    }

    fn legacy_jpeg_fallback(&self) -> CompressionPolicy {
        CompressionPolicy::Force(CompressionKind::Uncompressed)
    }
}

/// Reads the pages `tiffsplit` wrote, in name order
fn collect_pages(dir: &Path) -> Result<Document<ToolFrame>, CodecError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.starts_with("page_"))
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(CodecError::decode(DecodeFailure::InvalidContainer, "tiffsplit wrote no pages"));
    }

    let mut document = Document::new();
    for path in paths {
        let bytes = fs::read(&path)?;
        let info = PageInfo::probe_all(&bytes)
            .map_err(CodecError::invalid_container)?
            .into_iter()
            .next()
            .ok_or_else(|| CodecError::decode(DecodeFailure::InvalidContainer, "empty page written"))?;
        document.push(ToolFrame { info, bytes });
    }
    debug!("tiffsplit produced {} pages", document.len());
    Ok(document)
}

/// Removes a temporary directory, logging instead of failing
fn close_workspace(workspace: TempDir) {
    let path = workspace.path().to_path_buf();
    if let Err(e) = workspace.close() {
        warn!("Failed to remove temporary directory {}: {}", path.display(), e);
    }
}

/// Maps a libtiff diagnostic to a failure kind
fn classify_stderr(stderr: &str) -> DecodeFailure {
    let text = stderr.to_lowercase();
    if text.contains("compression") {
        DecodeFailure::UnsupportedCompression
    } else if text.contains("sampleformat") || text.contains("sample format") {
        DecodeFailure::UnsupportedSampleFormat
    } else if text.contains("photometric") || text.contains("color") {
        DecodeFailure::UnsupportedColorType
    } else if text.contains("bits/sample") || text.contains("bitspersample") {
        DecodeFailure::UnsupportedBitDepth
    } else if text.contains("lzw") || text.contains("decod") || text.contains("corrupt") {
        DecodeFailure::CorruptData
    } else {
        DecodeFailure::InvalidContainer
    }
}

/// The `tiffcp -c` argument for a compression kind
fn tiffcp_scheme(kind: CompressionKind) -> Option<&'static str> {
    match kind {
        CompressionKind::Uncompressed => Some("none"),
        CompressionKind::Lzw => Some("lzw"),
        CompressionKind::Deflate => Some("zip"),
        CompressionKind::PackBits => Some("packbits"),
        CompressionKind::Group3 => Some("g3"),
        CompressionKind::Group4 => Some("g4"),
        CompressionKind::Jpeg => Some("jpeg"),
        CompressionKind::Zstd => Some("zstd"),
        _ => None,
    }
}

/// Encoding session of the tools backend
pub struct ToolsEncoder {
    codec: ToolsCodec,
    scheme: Option<&'static str>,
    frames: Vec<ToolFrame>,
}

impl FrameEncoder for ToolsEncoder {
    type Frame = ToolFrame;

    /// Runs `tiffcp` on the page alone, so a page it rejects fails here
    /// and never reaches `finish`
    fn append(&mut self, frame: ToolFrame) -> Result<(), CodecError> {
        let bytes = self.codec.copy_pages(&[frame.bytes.as_slice()], self.scheme)?;
        debug!("tiffcp converted page {} ({} bytes)", self.frames.len(), bytes.len());
        self.frames.push(ToolFrame { info: frame.info, bytes });
        Ok(())
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn finish(self) -> Result<Vec<u8>, CodecError> {
        if self.frames.is_empty() {
            return Err(CodecError::Encode("no pages were appended".to_string()));
        }
        let pages: Vec<&[u8]> = self.frames.iter().map(|frame| frame.bytes.as_slice()).collect();
        self.codec.copy_pages(&pages, None)
    }
}

impl ToolsCodec {
    /// Concatenates TIFF buffers with `tiffcp`, recompressing when `scheme` is set
    fn copy_pages(&self, pages: &[&[u8]], scheme: Option<&str>) -> Result<Vec<u8>, CodecError> {
        let workspace = TempDir::new()?;
        let result = self.copy_pages_in(workspace.path(), pages, scheme);
        close_workspace(workspace);
        result
    }

    fn copy_pages_in(&self, dir: &Path, pages: &[&[u8]], scheme: Option<&str>) -> Result<Vec<u8>, CodecError> {
        let output_path = dir.join("output.tif");
        let mut args: Vec<OsString> = Vec::with_capacity(pages.len() + 3);
        if let Some(scheme) = scheme {
            args.push("-c".into());
            args.push(scheme.into());
        }
        for (index, bytes) in pages.iter().enumerate() {
            let path = dir.join(format!("page_{:05}.tif", index));
            fs::write(&path, bytes)?;
            args.push(path.into_os_string());
        }
        args.push(output_path.clone().into_os_string());

        let output = self.run(TIFFCP, &args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CodecError::Encode(format!("tiffcp failed: {}", stderr.trim())));
        }
        Ok(fs::read(&output_path)?)
    }
}
