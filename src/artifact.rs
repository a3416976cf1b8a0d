//! Artifact persistence
//!
//! Derived files land in `<output root>/<backend>/<method>/` for
//! inspection. Writing replaces any earlier artifact of the same name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

/// Builds `<stem>_<suffix><.ext>` from a source file name
pub fn derived_file_name(source: &Path, suffix: &str) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match source.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    }
}

/// Writes derived artifacts under an output root
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ArtifactWriter { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding artifacts of one backend and method
    pub fn directory(&self, backend: &str, method: &str) -> PathBuf {
        self.root.join(backend).join(method)
    }

    /// Writes `bytes` as `name` and returns the full path
    ///
    /// Only the final component of `name` is used, so a name can never
    /// leave the artifact directory.
    pub fn write(&self, name: &str, bytes: &[u8], backend: &str, method: &str) -> io::Result<PathBuf> {
        let file_name = Path::new(name).file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("artifact name {:?} has no file name", name))
        })?;

        let directory = self.directory(backend, method);
        fs::create_dir_all(&directory)?;

        let path = directory.join(file_name);
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                warn!("Failed to delete previous artifact {}: {}", path.display(), e);
            }
        }

        fs::write(&path, bytes)?;
        debug!("Wrote artifact {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
