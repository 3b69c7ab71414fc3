use std::{
    cmp::Ordering,
    fmt::Display,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a string cannot be parsed into a [`SolcVersion`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid solc version: '{0}'")]
pub struct ParseVersionError(pub String);

/// Represents a solc compiler version.
///
/// Versions are ordered and compared strictly on `major.minor.patch`. The optional build
/// metadata (prerelease tag, commit hash) is kept for display only and never takes part in
/// equality or ordering, so `0.8.19` and `0.8.19+commit.7dd6d404` are the same version.
#[derive(Debug, Clone)]
pub struct SolcVersion {
    /// The major version number.
    pub major: u32,
    /// The minor version number.
    pub minor: u32,
    /// The patch version number.
    pub patch: u32,
    /// Optional build metadata, e.g. `commit.7dd6d404` or `nightly.2020.12.1+commit.abcd`.
    pub build: Option<String>,
}

impl SolcVersion {
    /// Creates a release version without build metadata.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch, build: None }
    }

    /// Returns the numeric `(major, minor, patch)` triple used for comparisons.
    pub const fn triple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }

    /// Returns the smallest version strictly greater than this one, or `None` when the patch
    /// number is already at its maximum.
    pub const fn next_patch(&self) -> Option<Self> {
        match self.patch.checked_add(1) {
            Some(patch) => Some(Self::new(self.major, self.minor, patch)),
            None => None,
        }
    }

    /// Returns a copy of this version with the build metadata stripped.
    pub fn release(&self) -> Self {
        Self::new(self.major, self.minor, self.patch)
    }
}

impl PartialEq for SolcVersion {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Eq for SolcVersion {}

impl PartialOrd for SolcVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SolcVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }
}

impl Hash for SolcVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.triple().hash(state);
    }
}

impl Display for SolcVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(build) = &self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

impl FromStr for SolcVersion {
    type Err = ParseVersionError;

    /// Parses `0.8.19`, `v0.8.19`, `0.8.19+commit.7dd6d404` and prerelease strings like
    /// `0.8.0-nightly.2020.12.1+commit.abcd`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError(s.to_string());

        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

        // split the numeric triple from any prerelease or build suffix
        let split_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
        let (numeric, suffix) = trimmed.split_at(split_at);

        let parts = numeric
            .split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<u32>, _>>()
            .map_err(|_| invalid())?;

        let &[major, minor, patch] = parts.as_slice() else {
            return Err(invalid());
        };

        let build = suffix.get(1..).filter(|build| !build.is_empty()).map(str::to_string);
        if !suffix.is_empty() && build.is_none() {
            return Err(invalid());
        }

        Ok(Self { major, minor, patch, build })
    }
}

impl Serialize for SolcVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SolcVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
