//! Capability table loading
//!
//! The table ships embedded in the binary and is parsed once on first use.
//! A different file can be loaded explicitly, for example to try a backend
//! against a corpus with new quirks.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use log::error;

use super::{CapabilityEntry, Expectation, Feature};
use crate::codec::DecodeFailure;
use crate::harness::HarnessError;

lazy_static! {
    // Parse the embedded table at first use
    static ref EMBEDDED_TABLE: CapabilityTable = {
        let content = include_str!("../../capabilities.toml");
        CapabilityTable::from_str(content).unwrap_or_else(|e| {
            error!("Failed to parse embedded capability table: {}", e);
            CapabilityTable::default()
        })
    };
}

/// Capabilities of one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCapabilities {
    /// Key in the table, such as `raster`
    pub name: String,
    /// Backend label, matching `TiffCodec::label`
    pub label: String,
    /// File name substring marking files this backend must reject
    pub exclusion_token: String,
    pub entries: Vec<CapabilityEntry>,
}

impl BackendCapabilities {
    /// Expected behaviour on `feature`; unlisted features are supported
    pub fn expectation(&self, feature: Feature) -> Expectation {
        self.entries
            .iter()
            .find(|entry| entry.feature == feature)
            .map(|entry| entry.expectation)
            .unwrap_or(Expectation::Supported)
    }

    /// Distinct failures the backend rejects files with
    ///
    /// A backend without any rejecting entry accepts every failure kind
    /// for files carrying its exclusion token.
    pub fn rejection_failures(&self) -> Vec<DecodeFailure> {
        let mut failures = Vec::new();
        for entry in &self.entries {
            if let Expectation::RejectsWith(failure) = entry.expectation {
                if !failures.contains(&failure) {
                    failures.push(failure);
                }
            }
        }
        if failures.is_empty() {
            failures.extend_from_slice(DecodeFailure::all());
        }
        failures
    }
}

/// Capabilities of every known backend, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityTable {
    backends: BTreeMap<String, BackendCapabilities>,
}

impl CapabilityTable {
    /// The table embedded in the binary
    pub fn embedded() -> &'static CapabilityTable {
        &EMBEDDED_TABLE
    }

    /// Parse a capability table from a TOML string
    pub fn from_str(content: &str) -> Result<Self, HarnessError> {
        let toml_value: toml::Value = content.parse()?;

        let backends_table = toml_value
            .get("backends")
            .and_then(|v| v.as_table())
            .ok_or_else(|| HarnessError::ConfigError("missing [backends] table".to_string()))?;

        let mut table = CapabilityTable::default();
        for (name, value) in backends_table {
            let backend = Self::parse_backend(name, value)?;
            table.backends.insert(name.clone(), backend);
        }
        Ok(table)
    }

    fn parse_backend(name: &str, value: &toml::Value) -> Result<BackendCapabilities, HarnessError> {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or_else(|| HarnessError::ConfigError(format!("backend {} has no {}", name, key)))
        };

        let mut entries = Vec::new();
        if let Some(features) = value.get("features").and_then(|v| v.as_table()) {
            for (key, expected) in features {
                let feature = Feature::from_name(key).ok_or_else(|| {
                    HarnessError::ConfigError(format!("backend {}: unknown feature {}", name, key))
                })?;
                let expectation = expected
                    .as_str()
                    .and_then(Expectation::from_name)
                    .ok_or_else(|| {
                        HarnessError::ConfigError(format!("backend {}: invalid expectation for {}", name, key))
                    })?;
                entries.push(CapabilityEntry { feature, expectation });
            }
        }

        Ok(BackendCapabilities {
            name: name.to_string(),
            label: field("label")?,
            exclusion_token: field("exclusion_token")?,
            entries,
        })
    }

    /// Load a capability table from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Capabilities of the backend named `name`
    pub fn backend(&self, name: &str) -> Option<&BackendCapabilities> {
        self.backends.get(name)
    }

    /// Backend names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
