//! Qilletni package version parsing, ordering, and range comparison.
//!
//! Versions follow the `<major>.<minor>.<patch>[-SNAPSHOT]` grammar. A
//! version constraint may carry a range specifier prefix (`^` or `~`) that
//! widens which concrete versions satisfy it.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Suffix marking an unstable pre-release build. Case-sensitive.
pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Errors that can occur when parsing version strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version '{0}': expected <major>.<minor>.<patch>[-SNAPSHOT]")]
    InvalidFormat(String),
}

/// A package version: a `(major, minor, patch)` triple with an optional
/// snapshot flag.
///
/// Equality, hashing, and ordering are defined on the numeric triple only;
/// the snapshot flag is preserved by the value and its rendering but never
/// participates in comparison.
#[derive(Debug, Clone, Copy)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    snapshot: bool,
}

impl Version {
    /// Create a release version.
    #[must_use]
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            snapshot: false,
        }
    }

    /// Create a snapshot version.
    #[must_use]
    pub fn new_snapshot(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            snapshot: true,
        }
    }

    /// The major version number.
    #[must_use]
    pub fn major(&self) -> u64 {
        self.major
    }

    /// The minor version number.
    #[must_use]
    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// The patch version number.
    #[must_use]
    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Whether this is a snapshot (pre-release) build.
    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        self.snapshot
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        (self.major, self.minor, self.patch) == (other.major, other.minor, other.patch)
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.major, self.minor, self.patch).hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.snapshot {
            f.write_str(SNAPSHOT_SUFFIX)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (numbers, snapshot) = match s.strip_suffix(SNAPSHOT_SUFFIX) {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        let mut segments = numbers.split('.');
        let (Some(major), Some(minor), Some(patch), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(VersionError::InvalidFormat(s.to_string()));
        };

        Ok(Self {
            major: parse_component(major, s)?,
            minor: parse_component(minor, s)?,
            patch: parse_component(patch, s)?,
            snapshot,
        })
    }
}

/// Parse one numeric segment, rejecting signs, whitespace, and empty input
/// that `u64::from_str` would otherwise tolerate.
fn parse_component(segment: &str, input: &str) -> Result<u64, VersionError> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::InvalidFormat(input.to_string()));
    }
    segment
        .parse()
        .map_err(|_| VersionError::InvalidFormat(input.to_string()))
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Which range of versions a constraint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RangeSpecifier {
    /// No prefix: only the exact version matches.
    #[default]
    Exact,
    /// `^`: compatible within the same major version, narrowed to the same
    /// minor version when major is 0.
    Caret,
    /// `~`: compatible within the same major.minor version.
    Tilde,
}

impl RangeSpecifier {
    /// The prefix character this specifier renders as, if any.
    #[must_use]
    pub fn prefix(self) -> Option<char> {
        match self {
            Self::Exact => None,
            Self::Caret => Some('^'),
            Self::Tilde => Some('~'),
        }
    }

    /// The specifier for a prefix character, if it is one.
    #[must_use]
    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            '^' => Some(Self::Caret),
            '~' => Some(Self::Tilde),
            _ => None,
        }
    }
}

/// A version constraint: a [`Version`] qualified by a [`RangeSpecifier`].
///
/// Rendered as the specifier prefix (nothing for exact) followed by the
/// version, e.g. `^1.2.3`, `~2.0.1`, `3.0.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComparableVersion {
    version: Version,
    specifier: RangeSpecifier,
}

impl ComparableVersion {
    /// Create a constraint from a version and a specifier.
    #[must_use]
    pub fn new(version: Version, specifier: RangeSpecifier) -> Self {
        Self { version, specifier }
    }

    /// The embedded version.
    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The range specifier.
    #[must_use]
    pub fn specifier(&self) -> RangeSpecifier {
        self.specifier
    }

    /// Whether a candidate version falls inside this constraint's range.
    ///
    /// Snapshot flags are ignored: two versions differing only by snapshot
    /// are range-equivalent.
    #[must_use]
    pub fn satisfies(&self, candidate: &Version) -> bool {
        match self.specifier {
            RangeSpecifier::Exact => *candidate == self.version,
            RangeSpecifier::Caret => {
                if self.version.major() == 0 {
                    // 0.x releases treat every minor bump as breaking.
                    candidate.major() == 0
                        && candidate.minor() == self.version.minor()
                        && *candidate >= self.version
                } else {
                    candidate.major() == self.version.major() && *candidate >= self.version
                }
            }
            RangeSpecifier::Tilde => {
                candidate.major() == self.version.major()
                    && candidate.minor() == self.version.minor()
                    && *candidate >= self.version
            }
        }
    }
}

impl fmt::Display for ComparableVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = self.specifier.prefix() {
            write!(f, "{prefix}")?;
        }
        write!(f, "{}", self.version)
    }
}

impl FromStr for ComparableVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let specifier = chars.next().and_then(RangeSpecifier::from_prefix);
        let remainder = match specifier {
            Some(_) => chars.as_str(),
            None => s,
        };

        let version = remainder
            .parse()
            .map_err(|_| VersionError::InvalidFormat(s.to_string()))?;

        Ok(Self {
            version,
            specifier: specifier.unwrap_or_default(),
        })
    }
}

impl Serialize for ComparableVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ComparableVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
