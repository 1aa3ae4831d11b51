//! Package version and lock file tooling for the Qilletni language.
//!
//! This crate provides:
//! - Parsing, ordering, and rendering of `<major>.<minor>.<patch>[-SNAPSHOT]`
//!   versions and their `^`/`~` range constraints
//! - Validated resolved-package records
//! - Reading and writing the `qilletni.lock` file with stable round-trips
//! - Parsing the dependency slice of `qilletni_info.yml` manifests
//! - Locating the manifest and lock files on disk

mod locate;
mod lockfile;
mod manifest;
mod package;
mod version;

pub use locate::{ManifestLocator, MANIFEST_FILE, SOURCE_DIR};
pub use lockfile::{LockError, LockFile, LOCK_FILE};
pub use manifest::{Manifest, ManifestError};
pub use package::{PackageError, ResolvedPackage};
pub use version::{
    ComparableVersion, RangeSpecifier, Version, VersionError, SNAPSHOT_SUFFIX,
};
