//! Harness configuration
//!
//! Roots come from built-in defaults, then an optional TOML file with a
//! `[harness]` table, then environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::harness::HarnessError;

pub const CORPUS_DIR_ENV: &str = "TIFFPAGES_CORPUS_DIR";
pub const OUTPUT_DIR_ENV: &str = "TIFFPAGES_OUTPUT_DIR";
pub const LIBTIFF_DIR_ENV: &str = "TIFFPAGES_LIBTIFF_DIR";

const DEFAULT_CORPUS_DIR: &str = "TestFiles/Tiff";
const DEFAULT_OUTPUT_DIR: &str = "TestResults";

/// Where the corpus lives and where artifacts go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub corpus_root: PathBuf,
    pub output_root: PathBuf,
    /// Directory holding the libtiff tools, when not on `PATH`
    pub libtiff_dir: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            corpus_root: PathBuf::from(DEFAULT_CORPUS_DIR),
            output_root: PathBuf::from(DEFAULT_OUTPUT_DIR),
            libtiff_dir: None,
        }
    }
}

impl HarnessConfig {
    /// Defaults, then `config_file` if given, then the environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, HarnessError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Parse a configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, HarnessError> {
        let toml_value: toml::Value = content.parse()?;
        let mut config = HarnessConfig::default();

        if let Some(table) = toml_value.get("harness").and_then(|v| v.as_table()) {
            let path_value = |key: &str| -> Result<Option<PathBuf>, HarnessError> {
                match table.get(key) {
                    None => Ok(None),
                    Some(value) => value
                        .as_str()
                        .map(|s| Some(PathBuf::from(s)))
                        .ok_or_else(|| HarnessError::ConfigError(format!("harness.{} must be a string", key))),
                }
            };

            if let Some(path) = path_value("corpus_root")? {
                config.corpus_root = path;
            }
            if let Some(path) = path_value("output_root")? {
                config.output_root = path;
            }
            config.libtiff_dir = path_value("libtiff_dir")?;
        }

        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let contents = fs::read_to_string(path)?;
        debug!("Loaded harness configuration from {}", path.display());
        Self::from_str(&contents)
    }

    /// Applies `TIFFPAGES_*` environment variables
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = env_path(CORPUS_DIR_ENV) {
            self.corpus_root = dir;
        }
        if let Some(dir) = env_path(OUTPUT_DIR_ENV) {
            self.output_root = dir;
        }
        if let Some(dir) = env_path(LIBTIFF_DIR_ENV) {
            self.libtiff_dir = Some(dir);
        }
        self
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from)
}
