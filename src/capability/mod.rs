//! Backend capability table
//!
//! What each backend is expected to do with the known quirks of the corpus.
//! The harness combines the table with a file's name and probed metadata to
//! decide whether the file must load or must be rejected, and with which
//! failure.

mod table;

pub use table::{BackendCapabilities, CapabilityTable};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::codec::DecodeFailure;
use crate::model::{CompressionKind, PageInfo};

/// A corpus quirk that backends handle differently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Cmyk,
    /// CMYK with more than 8 bits per channel
    WideCmyk,
    ThunderScan,
    LegacyJpeg,
    MixedPageSizes,
    /// A SampleFormat other than unsigned integer or IEEE float
    ExoticSampleFormat,
    /// Damaged LZW strings, marked in the file name
    CorruptLzw,
}

impl Feature {
    /// Key used in capability files
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Cmyk => "cmyk",
            Feature::WideCmyk => "wide_cmyk",
            Feature::ThunderScan => "thunderscan",
            Feature::LegacyJpeg => "legacy_jpeg",
            Feature::MixedPageSizes => "mixed_page_sizes",
            Feature::ExoticSampleFormat => "exotic_sample_format",
            Feature::CorruptLzw => "corrupt_lzw",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.name() == name)
    }

    pub fn all() -> &'static [Feature] {
        &[
            Feature::Cmyk,
            Feature::WideCmyk,
            Feature::ThunderScan,
            Feature::LegacyJpeg,
            Feature::MixedPageSizes,
            Feature::ExoticSampleFormat,
            Feature::CorruptLzw,
        ]
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Marker in corpus file names for damaged LZW data
pub const CORRUPT_LZW_MARKER: &str = "corruptlzw";

/// Expected behaviour of a backend on a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Supported,
    RejectsWith(DecodeFailure),
}

impl Expectation {
    /// Parses "supported" or a decode failure name
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "supported" {
            return Some(Expectation::Supported);
        }
        DecodeFailure::from_name(name).map(Expectation::RejectsWith)
    }
}

/// One row of a backend's capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityEntry {
    pub feature: Feature,
    pub expectation: Expectation,
}

/// What the harness requires of a corpus file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseExpectation {
    MustSucceed,
    /// Decoding must fail with one of the accepted failures
    MustFail { accepted: Vec<DecodeFailure> },
}

impl CaseExpectation {
    /// Whether a decode failure satisfies this expectation
    pub fn accepts(&self, failure: DecodeFailure) -> bool {
        match self {
            CaseExpectation::MustSucceed => false,
            CaseExpectation::MustFail { accepted } => accepted.contains(&failure),
        }
    }
}

/// A corpus file with its resolved expectation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub path: PathBuf,
    pub features: Vec<Feature>,
    pub expectation: CaseExpectation,
}

/// Detects corpus quirks from page metadata
pub fn detect_features(pages: &[PageInfo]) -> Vec<Feature> {
    let mut features = Vec::new();
    let mut add = |feature: Feature| {
        if !features.contains(&feature) {
            features.push(feature);
        }
    };

    for page in pages {
        if page.is_cmyk() {
            add(Feature::Cmyk);
            if page.max_bits_per_sample() > 8 {
                add(Feature::WideCmyk);
            }
        }
        match page.compression {
            CompressionKind::ThunderScan => add(Feature::ThunderScan),
            CompressionKind::LegacyJpeg => add(Feature::LegacyJpeg),
            _ => {}
        }
        if !page.has_standard_sample_format() {
            add(Feature::ExoticSampleFormat);
        }
    }

    if let Some(first) = pages.first() {
        if pages.iter().any(|p| p.dimensions() != first.dimensions()) {
            add(Feature::MixedPageSizes);
        }
    }

    features.sort();
    features
}

/// Whether `path`'s file name contains `token`, ignoring case
pub fn name_contains(path: &Path, token: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.to_lowercase().contains(&token.to_lowercase()))
}

impl BackendCapabilities {
    /// Resolves what this backend must do with a corpus file
    ///
    /// Files carrying the exclusion token must fail with one of the
    /// backend's rejection failures. Otherwise the probed features decide,
    /// and a file whose structure cannot be probed at all must fail as an
    /// invalid container.
    pub fn resolve_case(&self, path: &Path) -> std::io::Result<TestCase> {
        let bytes = fs::read(path)?;
        let mut features = match PageInfo::probe_all(&bytes) {
            Ok(pages) => detect_features(&pages),
            Err(e) => {
                debug!("{}: cannot probe {}: {}", self.label, path.display(), e);
                let expectation = if name_contains(path, &self.exclusion_token) {
                    CaseExpectation::MustFail { accepted: self.rejection_failures() }
                } else {
                    CaseExpectation::MustFail { accepted: vec![DecodeFailure::InvalidContainer] }
                };
                return Ok(TestCase { path: path.to_path_buf(), features: Vec::new(), expectation });
            }
        };
        if name_contains(path, CORRUPT_LZW_MARKER) {
            features.push(Feature::CorruptLzw);
        }

        let expectation = if name_contains(path, &self.exclusion_token) {
            CaseExpectation::MustFail { accepted: self.rejection_failures() }
        } else {
            let mut accepted: Vec<DecodeFailure> = Vec::new();
            for feature in &features {
                if let Expectation::RejectsWith(failure) = self.expectation(*feature) {
                    if !accepted.contains(&failure) {
                        accepted.push(failure);
                    }
                }
            }
            if accepted.is_empty() {
                CaseExpectation::MustSucceed
            } else {
                CaseExpectation::MustFail { accepted }
            }
        };

        Ok(TestCase { path: path.to_path_buf(), features, expectation })
    }
}
