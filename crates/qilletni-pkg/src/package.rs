//! Resolved package records.
//!
//! A [`ResolvedPackage`] is the outcome of resolving one dependency: the
//! concrete version that was picked, where its artifact came from, the
//! integrity digest to verify it against, and the version ranges its own
//! direct dependencies require.

use indexmap::IndexMap;
use thiserror::Error;

/// Errors that can occur when constructing a resolved package.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackageError {
    #[error("package field '{0}' cannot be empty")]
    EmptyField(&'static str),
}

/// A resolved dependency as recorded in the lock file.
///
/// Construction validates that every required field is non-empty; a value of
/// this type is always internally consistent and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    name: String,
    version: String,
    resolved: String,
    integrity: String,
    dependencies: IndexMap<String, String>,
}

impl ResolvedPackage {
    /// Create a resolved package record.
    ///
    /// The `name` may carry a scope prefix such as `@alice/postgres`. The
    /// `dependencies` map dependency names to their range-specifier strings
    /// and may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::EmptyField`] if `name`, `version`, `resolved`,
    /// or `integrity` is empty.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        resolved: impl Into<String>,
        integrity: impl Into<String>,
        dependencies: IndexMap<String, String>,
    ) -> Result<Self, PackageError> {
        let pkg = Self {
            name: name.into(),
            version: version.into(),
            resolved: resolved.into(),
            integrity: integrity.into(),
            dependencies,
        };

        if pkg.name.is_empty() {
            return Err(PackageError::EmptyField("name"));
        }
        if pkg.version.is_empty() {
            return Err(PackageError::EmptyField("version"));
        }
        if pkg.resolved.is_empty() {
            return Err(PackageError::EmptyField("resolved"));
        }
        if pkg.integrity.is_empty() {
            return Err(PackageError::EmptyField("integrity"));
        }

        Ok(pkg)
    }

    /// The package name, including any scope prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The source URL the package artifact was resolved to.
    #[must_use]
    pub fn resolved(&self) -> &str {
        &self.resolved
    }

    /// The integrity digest, conventionally `<algorithm>-<digest>`. Opaque
    /// to this crate.
    #[must_use]
    pub fn integrity(&self) -> &str {
        &self.integrity
    }

    /// Direct dependencies: dependency name to range-specifier string, in
    /// insertion order.
    #[must_use]
    pub fn dependencies(&self) -> &IndexMap<String, String> {
        &self.dependencies
    }

    /// The `name@version` identifier keying this package in a lock file.
    #[must_use]
    pub fn full_identifier(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}
