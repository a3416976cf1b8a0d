//! Conformance suites
//!
//! Each suite runs one kind of check over the corpus for one backend. The
//! capability table decides per file whether the backend must succeed or
//! must reject it.

use std::fs;
use std::path::Path;

use log::info;

use crate::artifact::{derived_file_name, ArtifactWriter};
use crate::capability::{BackendCapabilities, CaseExpectation};
use crate::codec::{CodecError, DecodeFailure, Frame, TiffCodec};
use crate::engine::{Merger, Splitter, TiffMerge, TiffSplit};
use crate::harness::config::HarnessConfig;
use crate::harness::outcome::CaseError;
use crate::harness::pattern::{rejection_pattern, ANY_TIFF, MULTI_PAGE_TIFF};
use crate::harness::report::RunReport;
use crate::harness::runner::Harness;
use crate::harness::HarnessError;
use crate::model::{CompressionKind, Page};

pub const SPLIT_PAGES: &str = "split_pages";
pub const MERGE_PAGES: &str = "merge_pages";
pub const LOAD_ALL: &str = "load_all";
pub const LOAD_REJECTS: &str = "load_rejects";

/// Conformance suites of one backend
pub struct Suites<'a, C> {
    codec: C,
    capabilities: &'a BackendCapabilities,
    config: &'a HarnessConfig,
    artifacts: ArtifactWriter,
    show_progress: bool,
}

impl<'a, C: TiffCodec + Clone> Suites<'a, C> {
    pub fn new(codec: C, capabilities: &'a BackendCapabilities, config: &'a HarnessConfig) -> Self {
        Suites {
            codec,
            capabilities,
            config,
            artifacts: ArtifactWriter::new(config.output_root.clone()),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Runs every suite
    pub fn run_all(&self) -> Result<Vec<RunReport>, HarnessError> {
        Ok(vec![
            self.split_pages()?,
            self.merge_pages()?,
            self.load_all()?,
            self.load_rejects()?,
        ])
    }

    fn harness(&self, method: &str) -> Harness {
        Harness::new(format!("{}::{}", self.codec.label(), method)).with_progress(self.show_progress)
    }

    /// Group-level platform check; `Some` holds the report of a skipped run
    fn skip_if_unavailable(&self, method: &str) -> Result<Option<RunReport>, HarnessError> {
        match self.codec.check_platform() {
            Ok(()) => Ok(None),
            Err(e) if e.kind().is_inconclusive() => {
                info!("{}: skipping {}: {}", self.codec.label(), method, e.message());
                Ok(Some(RunReport::inconclusive_run(
                    format!("{}::{}", self.codec.label(), method),
                    e.message(),
                )))
            }
            Err(e) => Err(HarnessError::ConfigError(e.to_string())),
        }
    }

    fn expectation(&self, path: &Path) -> Result<CaseExpectation, CaseError> {
        Ok(self.capabilities.resolve_case(path)?.expectation)
    }

    /// Splits every multi-page file; each page must reload as one page
    pub fn split_pages(&self) -> Result<RunReport, HarnessError> {
        if let Some(report) = self.skip_if_unavailable(SPLIT_PAGES)? {
            return Ok(report);
        }
        let splitter = Splitter::new(self.codec.clone());
        let exclude = Some(self.capabilities.exclusion_token.as_str());

        self.harness(SPLIT_PAGES).test_each_file(&self.config.corpus_root, MULTI_PAGE_TIFF, exclude, |path| {
            let bytes = fs::read(path)?;
            let expectation = self.expectation(path)?;
            let split = splitter.split(&bytes);
            let pages = match expect_outcome(&expectation, split)? {
                Some(pages) => pages,
                None => return Ok(()),
            };

            for (index, page) in pages.iter().enumerate() {
                let name = derived_file_name(path, &format!("Pg{}", index + 1));
                let written = self.artifacts.write(&name, page.bytes(), self.codec.label(), SPLIT_PAGES)?;
                let reloaded = self.codec.decode(&fs::read(&written)?)?;
                CaseError::ensure(reloaded.len() == 1, || {
                    format!("page {} reloads with {} pages", index + 1, reloaded.len())
                })?;
            }
            CaseError::ensure(pages.len() > 1, || "multi-page file split into a single page".to_string())
        })
    }

    /// Splits then merges every multi-page file
    pub fn merge_pages(&self) -> Result<RunReport, HarnessError> {
        if let Some(report) = self.skip_if_unavailable(MERGE_PAGES)? {
            return Ok(report);
        }
        let splitter = Splitter::new(self.codec.clone());
        let merger = Merger::new(self.codec.clone());
        let exclude = Some(self.capabilities.exclusion_token.as_str());

        self.harness(MERGE_PAGES).test_each_file(&self.config.corpus_root, MULTI_PAGE_TIFF, exclude, |path| {
            let bytes = fs::read(path)?;
            let expectation = self.expectation(path)?;
            let pages = match expect_outcome(&expectation, splitter.split(&bytes))? {
                Some(pages) => pages,
                None => return Ok(()),
            };
            CaseError::ensure(!pages.is_empty(), || "split produced no pages".to_string())?;
            if pages.len() == 1 {
                return Ok(());
            }

            let output = merger.merge(&pages)?;
            if output.legacy_jpeg {
                CaseError::ensure(!output.policy.requests(CompressionKind::Lzw), || {
                    format!("merge requested {} for old-style JPEG pages", output.policy)
                })?;
            }

            let name = derived_file_name(path, &format!("{}-Pages", pages.len()));
            let written = self.artifacts.write(&name, &output.bytes, self.codec.label(), MERGE_PAGES)?;
            let merged = self.codec.decode(&fs::read(&written)?)?;
            CaseError::ensure(merged.len() == pages.len(), || {
                format!("merged document has {} pages, expected {}", merged.len(), pages.len())
            })?;

            let expected = page_sizes(&pages)?;
            let actual: Vec<(u32, u32)> = merged.iter().map(|f| f.info().dimensions()).collect();
            CaseError::ensure(expected == actual, || {
                format!("page sizes {:?} do not match source {:?}", actual, expected)
            })
        })
    }

    /// Every TIFF not carrying the exclusion token loads as expected
    pub fn load_all(&self) -> Result<RunReport, HarnessError> {
        if let Some(report) = self.skip_if_unavailable(LOAD_ALL)? {
            return Ok(report);
        }
        let exclude = Some(self.capabilities.exclusion_token.as_str());

        self.harness(LOAD_ALL).test_each_file(&self.config.corpus_root, ANY_TIFF, exclude, |path| {
            let bytes = fs::read(path)?;
            let expectation = self.expectation(path)?;
            match expect_outcome(&expectation, self.codec.decode(&bytes))? {
                Some(document) => CaseError::ensure(!document.is_empty(), || "document has no pages".to_string()),
                None => Ok(()),
            }
        })
    }

    /// Every file carrying the exclusion token must be rejected
    pub fn load_rejects(&self) -> Result<RunReport, HarnessError> {
        if let Some(report) = self.skip_if_unavailable(LOAD_REJECTS)? {
            return Ok(report);
        }
        let pattern = rejection_pattern(&self.capabilities.exclusion_token);

        self.harness(LOAD_REJECTS).test_each_file(&self.config.corpus_root, &pattern, None, |path| {
            let bytes = fs::read(path)?;
            let expectation = self.expectation(path)?;
            match self.codec.decode(&bytes) {
                Ok(_) => Err(CaseError::assertion(format!(
                    "loaded successfully; rename the file to drop \"{}\"",
                    self.capabilities.exclusion_token
                ))),
                Err(e) => check_rejection(&expectation, e),
            }
        })
    }
}

/// Checks a result against the case expectation
///
/// Returns the value when the case must succeed, and `None` when it must
/// fail and failed with an accepted failure.
fn expect_outcome<T>(expectation: &CaseExpectation, result: Result<T, CodecError>) -> Result<Option<T>, CaseError> {
    match (expectation, result) {
        (CaseExpectation::MustSucceed, Ok(value)) => Ok(Some(value)),
        (CaseExpectation::MustSucceed, Err(e)) => Err(e.into()),
        (CaseExpectation::MustFail { accepted }, Ok(_)) => Err(CaseError::assertion(format!(
            "expected a decode failure ({}) but the file loaded",
            failure_names(accepted)
        ))),
        (expectation, Err(e)) => check_rejection(expectation, e).map(|_| None),
    }
}

/// Accepts an error only if it is an expected decode failure
fn check_rejection(expectation: &CaseExpectation, error: CodecError) -> Result<(), CaseError> {
    if error.kind().is_inconclusive() {
        return Err(error.into());
    }
    match (error.decode_failure(), expectation) {
        (Some(failure), expectation) if expectation.accepts(failure) => Ok(()),
        (_, CaseExpectation::MustFail { accepted }) => Err(CaseError::assertion(format!(
            "expected {} but got {}",
            failure_names(accepted),
            error
        ))),
        (_, CaseExpectation::MustSucceed) => Err(error.into()),
    }
}

fn failure_names(failures: &[DecodeFailure]) -> String {
    failures.iter().map(|f| f.name()).collect::<Vec<_>>().join(" | ")
}

/// Page sizes of split pages, in order
fn page_sizes(pages: &[Page]) -> Result<Vec<(u32, u32)>, CaseError> {
    pages
        .iter()
        .map(|page| -> Result<(u32, u32), CaseError> { Ok(page.info()?.dimensions()) })
        .collect()
}
