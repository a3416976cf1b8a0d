//! Merge engine
//!
//! The base page fixes the compression policy for the whole document. Every
//! later page is decoded and appended on its own; a page that fails is
//! recorded in the accumulator and the merge carries on with the rest.

use log::{debug, info, warn};

use crate::codec::{CodecError, Frame, FrameEncoder, TiffCodec};
use crate::engine::escalate_to_encode;
use crate::model::{CompressionPolicy, Page};

/// A page left out of the merged document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPage {
    /// Position in the merge input
    pub index: usize,
    pub reason: String,
}

/// Pages merged and skipped so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeAccumulator {
    pub merged: Vec<usize>,
    pub skipped: Vec<SkippedPage>,
}

impl MergeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of one input page
    pub fn record(&mut self, index: usize, result: Result<(), CodecError>) {
        match result {
            Ok(()) => self.merged.push(index),
            Err(e) => {
                warn!("Skipping page {}: {}", index, e);
                self.skipped.push(SkippedPage { index, reason: e.to_string() });
            }
        }
    }
}

/// Result of a merge
#[derive(Debug, Clone)]
pub struct MergeOutput {
    /// The multi-page TIFF
    pub bytes: Vec<u8>,
    /// Policy the encoder was opened with
    pub policy: CompressionPolicy,
    /// Whether the base page carried old-style JPEG
    pub legacy_jpeg: bool,
    /// Indices of merged input pages
    pub merged: Vec<usize>,
    pub skipped: Vec<SkippedPage>,
}

impl MergeOutput {
    /// Page buffer wrapping the merged bytes
    pub fn page(&self) -> Page {
        Page::new(self.bytes.clone())
    }
}

/// Recomposes single-page TIFFs into one multi-page TIFF
pub trait TiffMerge {
    /// Merges `pages` in order
    fn merge(&self, pages: &[Page]) -> Result<MergeOutput, CodecError>;
}

/// Merge engine over a codec backend
#[derive(Debug, Clone, Default)]
pub struct Merger<C> {
    codec: C,
    policy: Option<CompressionPolicy>,
}

impl<C: TiffCodec> Merger<C> {
    /// Merges with the backend's default policy
    pub fn new(codec: C) -> Self {
        Merger { codec, policy: None }
    }

    /// Requests `policy` instead of the backend default
    ///
    /// Old-style JPEG on the base page still switches to the backend's
    /// fallback policy.
    pub fn with_policy(mut self, policy: CompressionPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// The backend this engine uses
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Policy requested when no legacy JPEG is present
    pub fn requested_policy(&self) -> CompressionPolicy {
        self.policy.unwrap_or_else(|| self.codec.merge_policy())
    }

    fn append_page(&self, encoder: &mut C::Encoder, page: &Page) -> Result<(), CodecError> {
        let document = self.codec.decode(page.bytes())?;
        for frame in document {
            encoder.append(frame)?;
        }
        Ok(())
    }
}

impl<C: TiffCodec> TiffMerge for Merger<C> {
    fn merge(&self, pages: &[Page]) -> Result<MergeOutput, CodecError> {
        let (base_page, rest) = pages
            .split_first()
            .ok_or_else(|| CodecError::Encode("no pages to merge".to_string()))?;

        let base = self
            .codec
            .decode(base_page.bytes())
            .map_err(|e| escalate_to_encode("base page", e))?;

        let legacy_jpeg = base.iter().any(|frame| frame.info().compression.is_legacy_jpeg());
        let policy = if legacy_jpeg {
            let fallback = self.codec.legacy_jpeg_fallback();
            info!("{}: base page uses old-style JPEG, merging with {}", self.codec.label(), fallback);
            fallback
        } else {
            self.requested_policy()
        };

        // A base page that cannot be appended fails the merge, so the
        // document always holds at least one page.
        let mut encoder = self.codec.encoder(policy)?;
        for frame in base {
            encoder
                .append(frame)
                .map_err(|e| escalate_to_encode("base page", e))?;
        }

        let mut accumulator = MergeAccumulator::new();
        accumulator.record(0, Ok(()));
        for (offset, page) in rest.iter().enumerate() {
            let result = self.append_page(&mut encoder, page);
            accumulator.record(offset + 1, result);
        }

        debug!("{}: finishing {} frames", self.codec.label(), encoder.frame_count());
        let bytes = encoder
            .finish()
            .map_err(|e| escalate_to_encode("finishing document", e))?;

        info!(
            "{}: merged {} of {} pages with {}",
            self.codec.label(),
            accumulator.merged.len(),
            pages.len(),
            policy
        );
        Ok(MergeOutput {
            bytes,
            policy,
            legacy_jpeg,
            merged: accumulator.merged,
            skipped: accumulator.skipped,
        })
    }
}
