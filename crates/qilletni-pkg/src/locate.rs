//! Locating the manifest and lock files on disk.
//!
//! A Qilletni project keeps `qilletni_info.yml` and `qilletni.lock` either
//! directly in the project directory or inside a `qilletni-src`
//! subdirectory. The locator resolves against an explicit base directory so
//! callers (and tests) never depend on the process working directory.

use crate::lockfile::LOCK_FILE;
use std::path::{Path, PathBuf};

/// The manifest filename.
pub const MANIFEST_FILE: &str = "qilletni_info.yml";

/// The source subdirectory searched when a file is absent at the base.
pub const SOURCE_DIR: &str = "qilletni-src";

/// Resolves manifest and lock file paths against a base directory.
#[derive(Debug, Clone)]
pub struct ManifestLocator {
    base: PathBuf,
}

impl ManifestLocator {
    /// Create a locator rooted at the given directory.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The resolved path of `qilletni_info.yml`.
    ///
    /// The returned path may not exist; callers that need the file must
    /// check separately (see [`Self::has_manifest`]).
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.locate(MANIFEST_FILE)
    }

    /// The resolved path of `qilletni.lock`.
    #[must_use]
    pub fn lockfile_path(&self) -> PathBuf {
        self.locate(LOCK_FILE)
    }

    /// Whether the resolved manifest path exists right now.
    #[must_use]
    pub fn has_manifest(&self) -> bool {
        self.manifest_path().exists()
    }

    /// Resolve a filename against the base directory, falling back into
    /// `qilletni-src` when the file is absent at the base and that
    /// subdirectory exists.
    fn locate(&self, filename: &str) -> PathBuf {
        let direct = self.base.join(filename);
        if !direct.exists() {
            let source_dir = self.base.join(SOURCE_DIR);
            if source_dir.exists() {
                return source_dir.join(filename);
            }
        }
        direct
    }

    /// Base directory this locator resolves against.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }
}
