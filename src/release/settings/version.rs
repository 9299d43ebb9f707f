//! The release version read at pipeline start.

use crate::release::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static VERSION_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("static version regex is valid")
});

/// A `MAJOR.MINOR.PATCH` release version.
///
/// This is the only value substituted into metadata files, archive paths and
/// artifact names. Pre-release and build suffixes are rejected, and so are
/// leading zeros in any component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion {
    raw: String,
    parsed: semver::Version,
}

impl ReleaseVersion {
    /// Parses and validates a version string.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if !VERSION_FORMAT.is_match(raw) {
            return Err(Error::InvalidVersion(raw.to_string()));
        }
        let parsed =
            semver::Version::parse(raw).map_err(|_| Error::InvalidVersion(raw.to_string()))?;
        Ok(Self {
            raw: raw.to_string(),
            parsed,
        })
    }

    /// The version exactly as declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed semantic version.
    pub fn semver(&self) -> &semver::Version {
        &self.parsed
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for ReleaseVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
