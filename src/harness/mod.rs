//! Corpus conformance harness
//!
//! Discovers corpus files by glob, filters them by exclusion token, runs a
//! case closure on each with panic isolation, and aggregates the outcomes
//! into a `RunReport`. The suites in `suites` drive the split and merge
//! engines through this loop for one backend at a time.

mod error;
pub mod config;
pub mod discovery;
pub mod outcome;
pub mod pattern;
pub mod report;
pub mod runner;
pub mod suites;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use outcome::{CaseError, FailureRecord, Outcome};
pub use pattern::GlobPattern;
pub use report::{junit_string, write_junit, CaseRecord, RunReport};
pub use runner::Harness;
pub use suites::Suites;
