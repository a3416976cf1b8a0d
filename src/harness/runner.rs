//! Per-file test loop
//!
//! Every discovered file that survives the exclusion filter is handed to
//! the case closure. The closure's result, or its panic, becomes one
//! outcome in the report; nothing a single file does stops the loop.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use log::{debug, info, warn};

use crate::harness::discovery::{discover, is_excluded};
use crate::harness::outcome::{CaseError, Outcome};
use crate::harness::pattern::GlobPattern;
use crate::harness::report::RunReport;
use crate::harness::HarnessError;
use crate::utils::progress::ProgressTracker;

/// Runs case closures over a corpus
#[derive(Debug, Clone)]
pub struct Harness {
    label: String,
    show_progress: bool,
}

impl Harness {
    pub fn new(label: impl Into<String>) -> Self {
        Harness {
            label: label.into(),
            show_progress: false,
        }
    }

    /// Draws a progress bar over the file loop
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Runs `test` on every file under `root` matching `pattern`
    ///
    /// Files whose name contains `exclude` (ignoring case) are counted as
    /// excluded and never reach the closure.
    pub fn test_each_file<F>(
        &self,
        root: &Path,
        pattern: &str,
        exclude: Option<&str>,
        mut test: F,
    ) -> Result<RunReport, HarnessError>
    where
        F: FnMut(&Path) -> Result<(), CaseError>,
    {
        let glob = GlobPattern::new(pattern)?;
        let files = discover(root, &glob)?;

        let mut report = RunReport::new(self.label.clone());
        report.discovered = files.len();

        let progress = if self.show_progress {
            ProgressTracker::new(files.len() as u64, &self.label)
        } else {
            ProgressTracker::hidden(files.len() as u64)
        };

        for path in &files {
            progress.increment(1);
            if is_excluded(path, exclude) {
                debug!("{}: excluded {}", self.label, path.display());
                report.excluded += 1;
                continue;
            }

            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| test(path))) {
                Ok(result) => Outcome::classify(path, result),
                Err(payload) => Outcome::from_panic(path, payload),
            };

            match &outcome {
                Outcome::Passed => debug!("{}: passed {}", self.label, path.display()),
                Outcome::Inconclusive(reason) => info!("{}: inconclusive {}: {}", self.label, path.display(), reason),
                Outcome::Failed(record) => warn!("{}: {}", self.label, record),
            }
            report.record(path, outcome);
        }
        progress.finish();

        info!("{}", report);
        Ok(report)
    }
}
