//! The `qilletni.lock` file: a persisted record of resolved packages.
//!
//! Format:
//! ```yaml
//! version: 1
//! packages:
//!   "@alice/postgres@1.0.2":
//!     version: 1.0.2
//!     resolved: https://registry.../packages/@alice/postgres/1.0.2
//!     integrity: sha256-abc123...
//!     dependencies:
//!       "@bob/json": "^2.0.0"
//! ```
//!
//! Package entries are keyed by their full `name@version` identifier and
//! serialized in insertion order, so an unchanged lock file round-trips
//! byte-stable through parse and write.

use crate::package::{PackageError, ResolvedPackage};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The lock filename.
pub const LOCK_FILE: &str = "qilletni.lock";

/// Errors that can occur when reading or writing a lock file.
#[derive(Error, Debug)]
pub enum LockError {
    #[error("lock file not found: {0}")]
    NotFound(PathBuf),

    #[error("lock file is empty: {0}")]
    Empty(PathBuf),

    #[error("failed to read lock file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse lock file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid lock file entry: {0}")]
    Package(#[from] PackageError),
}

/// An ordered set of resolved packages plus the lock format version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockFile {
    version: u32,
    packages: IndexMap<String, ResolvedPackage>,
}

/// On-disk document shape. `dependencies` is always emitted, empty or not,
/// so the serialized form is stable across round-trips.
#[derive(Serialize, Deserialize)]
struct RawLockFile {
    #[serde(default = "default_format_version")]
    version: u32,

    #[serde(default)]
    packages: IndexMap<String, RawPackage>,
}

#[derive(Serialize, Deserialize)]
struct RawPackage {
    version: String,
    resolved: String,
    integrity: String,

    #[serde(default)]
    dependencies: IndexMap<String, String>,
}

fn default_format_version() -> u32 {
    LockFile::FORMAT_VERSION
}

impl LockFile {
    /// The current lock format version.
    pub const FORMAT_VERSION: u32 = 1;

    /// Create an empty lock file at the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: Self::FORMAT_VERSION,
            packages: IndexMap::new(),
        }
    }

    /// The lock format version.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// All packages, keyed by full identifier, in insertion order.
    #[must_use]
    pub fn packages(&self) -> &IndexMap<String, ResolvedPackage> {
        &self.packages
    }

    /// Look up a package by its `name@version` identifier.
    #[must_use]
    pub fn get(&self, full_identifier: &str) -> Option<&ResolvedPackage> {
        self.packages.get(full_identifier)
    }

    /// The number of locked packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if no packages are locked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Add a resolved package, keyed by its full identifier. An existing
    /// entry under the same key is replaced outright; dependency maps are
    /// never merged.
    pub fn add_package(&mut self, pkg: ResolvedPackage) {
        self.packages.insert(pkg.full_identifier(), pkg);
    }

    /// Parse a lock file from the given path.
    ///
    /// Missing `version` defaults to 1. Each entry in `packages` derives its
    /// package name from the map key (see [`name_from_key`]); a validation
    /// failure on any entry fails the whole parse.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::NotFound`] if the file does not exist,
    /// [`LockError::Empty`] if the document decodes to null, and I/O, YAML,
    /// or entry-validation errors otherwise.
    pub fn parse(path: impl AsRef<Path>) -> Result<Self, LockError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LockError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let document: serde_yaml::Value = serde_yaml::from_str(&content)?;
        if document.is_null() {
            return Err(LockError::Empty(path.to_path_buf()));
        }

        let raw: RawLockFile = serde_yaml::from_value(document)?;

        let mut packages = IndexMap::with_capacity(raw.packages.len());
        for (key, entry) in raw.packages {
            let pkg = ResolvedPackage::new(
                name_from_key(&key),
                entry.version,
                entry.resolved,
                entry.integrity,
                entry.dependencies,
            )?;
            packages.insert(key, pkg);
        }

        Ok(Self {
            version: raw.version,
            packages,
        })
    }

    /// Write the lock file to the given path, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), LockError> {
        let raw = RawLockFile {
            version: self.version,
            packages: self
                .packages
                .iter()
                .map(|(key, pkg)| {
                    let entry = RawPackage {
                        version: pkg.version().to_string(),
                        resolved: pkg.resolved().to_string(),
                        integrity: pkg.integrity().to_string(),
                        dependencies: pkg.dependencies().clone(),
                    };
                    (key.clone(), entry)
                })
                .collect(),
        };

        let content = serde_yaml::to_string(&raw)?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl Default for LockFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the package name from a lock file key: everything before the
/// last `@`, so scoped names like `@alice/postgres@1.0.2` keep their scope
/// marker. A key with no `@`, or whose only `@` is the leading scope
/// marker, is taken as a bare name.
fn name_from_key(key: &str) -> &str {
    match key.rfind('@') {
        Some(idx) if idx > 0 => &key[..idx],
        _ => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn deps(entries: &[(&str, &str)]) -> IndexMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn sample_lock() -> LockFile {
        let mut lock = LockFile::new();
        lock.add_package(
            ResolvedPackage::new(
                "@alice/postgres",
                "1.0.2",
                "https://registry.example.com/packages/@alice/postgres/1.0.2",
                "sha256-abc123",
                deps(&[("@bob/json", "^2.0.0"), ("lodash", "~4.17.0")]),
            )
            .unwrap(),
        );
        lock.add_package(
            ResolvedPackage::new(
                "lodash",
                "4.17.0",
                "https://registry.example.com/packages/lodash/4.17.0",
                "sha256-def456",
                IndexMap::new(),
            )
            .unwrap(),
        );
        lock
    }

    #[test]
    fn name_from_key_splits_on_last_at() {
        assert_eq!(name_from_key("lodash@4.17.0"), "lodash");
        assert_eq!(name_from_key("@alice/postgres@1.0.2"), "@alice/postgres");
        assert_eq!(name_from_key("no-version-suffix"), "no-version-suffix");
        assert_eq!(name_from_key("@scope/only"), "@scope/only");
        assert_eq!(name_from_key("@"), "@");
    }

    #[test]
    fn add_package_replaces_existing_entry() {
        let mut lock = LockFile::new();
        lock.add_package(
            ResolvedPackage::new("pkg", "1.0.0", "url-a", "sha256-a", IndexMap::new()).unwrap(),
        );
        lock.add_package(
            ResolvedPackage::new("pkg", "1.0.0", "url-b", "sha256-b", IndexMap::new()).unwrap(),
        );

        assert_eq!(lock.len(), 1);
        assert_eq!(lock.get("pkg@1.0.0").unwrap().resolved(), "url-b");
    }

    #[test]
    fn write_then_parse_round_trips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(LOCK_FILE);

        let lock = sample_lock();
        lock.write(&path).unwrap();
        let reparsed = LockFile::parse(&path).unwrap();

        assert_eq!(reparsed, lock);
        assert_eq!(reparsed.version(), LockFile::FORMAT_VERSION);

        // Insertion order survives the trip.
        let keys: Vec<&String> = reparsed.packages().keys().collect();
        assert_eq!(keys, ["@alice/postgres@1.0.2", "lodash@4.17.0"]);

        let postgres = reparsed.get("@alice/postgres@1.0.2").unwrap();
        assert_eq!(postgres.name(), "@alice/postgres");
        assert_eq!(postgres.dependencies()["@bob/json"], "^2.0.0");
    }

    #[test]
    fn write_emits_empty_dependencies_map() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(LOCK_FILE);

        let mut lock = LockFile::new();
        lock.add_package(
            ResolvedPackage::new("pkg", "1.0.0", "url", "sha256-x", IndexMap::new()).unwrap(),
        );
        lock.write(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("dependencies"));
    }

    #[test]
    fn parse_missing_file_fails_not_found() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(LOCK_FILE);

        let err = LockFile::parse(&path).unwrap_err();
        assert!(matches!(err, LockError::NotFound(p) if p == path));
    }

    #[test]
    fn parse_empty_document_fails_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(LOCK_FILE);
        fs::write(&path, "").unwrap();

        let err = LockFile::parse(&path).unwrap_err();
        assert!(matches!(err, LockError::Empty(p) if p == path));
    }

    #[test]
    fn parse_defaults_missing_version_to_one() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(LOCK_FILE);
        fs::write(
            &path,
            r#"packages:
  "pkg@1.0.0":
    version: 1.0.0
    resolved: https://registry.example.com/packages/pkg/1.0.0
    integrity: sha256-abc
"#,
        )
        .unwrap();

        let lock = LockFile::parse(&path).unwrap();
        assert_eq!(lock.version(), 1);

        // Missing dependencies defaults to an empty map.
        assert!(lock.get("pkg@1.0.0").unwrap().dependencies().is_empty());
    }

    #[test]
    fn parse_key_without_at_uses_whole_key_as_name() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(LOCK_FILE);
        fs::write(
            &path,
            r#"version: 1
packages:
  "just-a-name":
    version: 1.0.0
    resolved: url
    integrity: sha256-abc
"#,
        )
        .unwrap();

        let lock = LockFile::parse(&path).unwrap();
        assert_eq!(lock.get("just-a-name").unwrap().name(), "just-a-name");
    }

    #[test]
    fn parse_rejects_entry_with_empty_field() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(LOCK_FILE);
        fs::write(
            &path,
            r#"version: 1
packages:
  "pkg@1.0.0":
    version: 1.0.0
    resolved: url
    integrity: ""
"#,
        )
        .unwrap();

        let err = LockFile::parse(&path).unwrap_err();
        assert!(matches!(
            err,
            LockError::Package(PackageError::EmptyField("integrity"))
        ));
    }

    #[test]
    fn write_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(LOCK_FILE);

        let lock = sample_lock();
        lock.write(&path).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        lock.write(&path).unwrap();
        let second = fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
    }
}
