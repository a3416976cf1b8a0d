//! Harness errors

use std::fmt;
use std::io;

use crate::harness::outcome::FailureRecord;

/// Errors raised by the conformance harness
#[derive(Debug)]
pub enum HarnessError {
    /// I/O error while walking the corpus or writing reports
    IoError(io::Error),
    /// Invalid configuration or capability file
    ConfigError(String),
    /// Glob that cannot be translated to a regular expression
    PatternError(String),
    /// Report rendering failed
    ReportError(String),
    /// At least one corpus file failed
    CasesFailed {
        label: String,
        processed: usize,
        failures: Vec<FailureRecord>,
    },
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::IoError(e) => write!(f, "I/O error: {}", e),
            HarnessError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            HarnessError::PatternError(msg) => write!(f, "Invalid pattern: {}", msg),
            HarnessError::ReportError(msg) => write!(f, "Report error: {}", msg),
            HarnessError::CasesFailed { label, processed, failures } => {
                write!(f, "{}: {} of {} files failed", label, failures.len(), processed)?;
                for failure in failures {
                    write!(f, "\n{}", failure)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarnessError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for HarnessError {
    fn from(error: io::Error) -> Self {
        HarnessError::IoError(error)
    }
}

impl From<walkdir::Error> for HarnessError {
    fn from(error: walkdir::Error) -> Self {
        HarnessError::IoError(error.into())
    }
}

impl From<toml::de::Error> for HarnessError {
    fn from(error: toml::de::Error) -> Self {
        HarnessError::ConfigError(error.to_string())
    }
}
