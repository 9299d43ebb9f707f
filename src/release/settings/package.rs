//! Package metadata from `package.json`.

use super::ReleaseVersion;
use crate::release::{Result, error::ErrorExt};
use serde::Deserialize;
use std::path::Path;

/// The subset of `package.json` the release needs.
#[derive(Debug, Clone, Deserialize)]
struct PackageJson {
    version: String,
}

/// Package metadata declared by the source tree.
#[derive(Debug, Clone)]
pub struct PackageSettings {
    /// Declared release version.
    pub version: ReleaseVersion,
}

impl PackageSettings {
    /// Reads `<root>/package.json` and validates its version.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("package.json");
        let text = std::fs::read_to_string(&path).fs_context("reading", &path)?;
        Self::parse(&text)
    }

    /// Parses `package.json` text.
    pub fn parse(text: &str) -> Result<Self> {
        let package: PackageJson = serde_json::from_str(text)?;
        Ok(Self {
            version: ReleaseVersion::parse(&package.version)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::Error;

    #[test]
    fn reads_version_from_package_json() {
        let package =
            PackageSettings::parse(r#"{"name":"snappymail","version":"2.3.1","private":true}"#)
                .unwrap();
        assert_eq!(package.version.as_str(), "2.3.1");
    }

    #[test]
    fn invalid_version_is_rejected() {
        let err = PackageSettings::parse(r#"{"version":"2.3"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidVersion(_)));
    }
}
