//! Per-case outcomes
//!
//! A case closure returns `Result<(), CaseError>`; the runner turns that
//! result, or a panic, into exactly one `Outcome`.

use std::any::Any;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::codec::CodecError;
use crate::tiff::errors::TiffError;

/// A failed case as it appears in the aggregated report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub path: PathBuf,
    /// Error class, such as `DecodeError` or `Assertion`
    pub category: String,
    pub message: String,
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ({}) {}", self.path.display(), self.category, self.message)
    }
}

/// Result of one corpus file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(FailureRecord),
    /// Not testable on this backend
    Inconclusive(String),
}

impl Outcome {
    /// Classifies the result of a case closure
    pub fn classify(path: &Path, result: Result<(), CaseError>) -> Self {
        match result {
            Ok(()) => Outcome::Passed,
            Err(e) if e.is_inconclusive() => Outcome::Inconclusive(e.to_string()),
            Err(e) => Outcome::Failed(FailureRecord {
                path: path.to_path_buf(),
                category: e.category().to_string(),
                message: e.message(),
            }),
        }
    }

    /// Turns a caught panic into a failure
    pub fn from_panic(path: &Path, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic with a non-string payload".to_string()
        };
        Outcome::Failed(FailureRecord {
            path: path.to_path_buf(),
            category: "Panic".to_string(),
            message,
        })
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

/// Error returned by a case closure
#[derive(Debug)]
pub enum CaseError {
    Codec(CodecError),
    /// A check inside the case did not hold
    Assertion(String),
    Io(io::Error),
    Tiff(TiffError),
}

impl CaseError {
    /// Shorthand for a failed check
    pub fn assertion(message: impl Into<String>) -> Self {
        CaseError::Assertion(message.into())
    }

    /// Fails with `message` unless `condition` holds
    pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), CaseError> {
        if condition {
            Ok(())
        } else {
            Err(CaseError::Assertion(message()))
        }
    }

    /// Category label for failure records
    pub fn category(&self) -> &'static str {
        match self {
            CaseError::Codec(e) => e.kind().name(),
            CaseError::Assertion(_) => "Assertion",
            CaseError::Io(_) => "IoError",
            CaseError::Tiff(_) => "TiffError",
        }
    }

    /// Message without the category
    pub fn message(&self) -> String {
        match self {
            CaseError::Codec(e) => e.message(),
            CaseError::Assertion(msg) => msg.clone(),
            CaseError::Io(e) => e.to_string(),
            CaseError::Tiff(e) => e.to_string(),
        }
    }

    /// Whether the case is untestable rather than failed
    pub fn is_inconclusive(&self) -> bool {
        match self {
            CaseError::Codec(e) => e.kind().is_inconclusive(),
            _ => false,
        }
    }
}

impl fmt::Display for CaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.category(), self.message())
    }
}

impl std::error::Error for CaseError {}

impl From<CodecError> for CaseError {
    fn from(error: CodecError) -> Self {
        CaseError::Codec(error)
    }
}

impl From<io::Error> for CaseError {
    fn from(error: io::Error) -> Self {
        CaseError::Io(error)
    }
}

impl From<TiffError> for CaseError {
    fn from(error: TiffError) -> Self {
        CaseError::Tiff(error)
    }
}
