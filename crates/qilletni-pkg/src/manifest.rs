//! Qilletni package manifest (`qilletni_info.yml`) parsing.
//!
//! Only the fields this crate consumes are modeled: the package name, its
//! own version, and the dependency name to version-range pairs handed to
//! resolution. Anything else in the manifest belongs to other tooling.

use crate::version::{ComparableVersion, Version};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when reading a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// The dependency-facing slice of a `qilletni_info.yml` manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Package name, optionally scoped (`@scope/name`).
    pub name: String,

    /// The package's own version.
    pub version: Version,

    /// Dependency name to required version range, in declaration order.
    #[serde(default)]
    pub dependencies: IndexMap<String, ComparableVersion>,
}

impl Manifest {
    /// Load a manifest from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. Malformed
    /// version or range strings fail the whole parse; nothing is defaulted.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a manifest from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a version string does not
    /// match the version grammar.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Serialize the manifest to a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
