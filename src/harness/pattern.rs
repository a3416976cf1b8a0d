//! Glob patterns for corpus discovery
//!
//! Only `*` and `?` are wildcards. Matching is case-insensitive and covers
//! the whole file name.

use regex::Regex;

use crate::harness::HarnessError;

/// Pattern matching any TIFF file
pub const ANY_TIFF: &str = "*.tif*";

/// Pattern matching multi-page TIFF files
pub const MULTI_PAGE_TIFF: &str = "*PgX*.tif*";

/// Pattern matching files that carry `token`
pub fn rejection_pattern(token: &str) -> String {
    format!("*{}{}", token, ANY_TIFF)
}

/// A file name glob compiled to a regular expression
#[derive(Debug, Clone)]
pub struct GlobPattern {
    glob: String,
    regex: Regex,
}

impl GlobPattern {
    pub fn new(glob: &str) -> Result<Self, HarnessError> {
        if glob.trim().is_empty() {
            return Err(HarnessError::PatternError("empty pattern".to_string()));
        }

        let mut expression = String::from("(?i)^");
        for c in glob.chars() {
            match c {
                '*' => expression.push_str(".*"),
                '?' => expression.push('.'),
                other => expression.push_str(&regex::escape(&other.to_string())),
            }
        }
        expression.push('$');

        let regex = Regex::new(&expression)
            .map_err(|e| HarnessError::PatternError(format!("{}: {}", glob, e)))?;
        Ok(GlobPattern { glob: glob.to_string(), regex })
    }

    /// Whether a file name matches
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    /// The glob this pattern was built from
    pub fn as_str(&self) -> &str {
        &self.glob
    }
}
