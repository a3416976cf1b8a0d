//! Corpus discovery

use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::capability::name_contains;
use crate::harness::pattern::GlobPattern;
use crate::harness::HarnessError;

/// Lists files under `root` whose name matches `pattern`, sorted by path
pub fn discover(root: &Path, pattern: &GlobPattern) -> Result<Vec<PathBuf>, HarnessError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matched = entry
            .file_name()
            .to_str()
            .map_or(false, |name| pattern.matches(name));
        if matched {
            files.push(entry.into_path());
        }
    }
    files.sort();

    debug!("Discovered {} files matching {} under {}", files.len(), pattern.as_str(), root.display());
    Ok(files)
}

/// Whether a file is filtered out by the exclusion substring
pub fn is_excluded(path: &Path, exclude: Option<&str>) -> bool {
    match exclude {
        Some(token) if !token.trim().is_empty() => name_contains(path, token),
        _ => false,
    }
}
