//! `release.toml` configuration.
//!
//! Every section and field is optional; an absent file yields the defaults,
//! which describe the SnappyMail repository.
//!
//! ```toml
//! [layout]
//! product_name = "snappymail"
//!
//! [tools]
//! timeout_secs = 600
//!
//! [signing]
//! key = "1016E47079145542F8BA133548208BA13290F3EB"
//! required = true
//! ```

use super::{ArchSettings, DebianSettings, ReleaseLayout};
use crate::release::{Result, error::ErrorExt};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Root of `release.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Input and output paths.
    pub layout: ReleaseLayout,
    /// External tool settings.
    pub tools: ToolSettings,
    /// Asset compression settings.
    pub compression: CompressionSettings,
    /// Detached signature settings.
    pub signing: SigningSettings,
    /// Docker image settings.
    pub docker: DockerSettings,
    /// Arch User Repository settings.
    pub arch: ArchSettings,
    /// Debian package settings.
    pub debian: DebianSettings,
}

impl ReleaseConfig {
    /// Reads `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).fs_context("reading release config", path)?;
        Self::parse(&text)
    }

    /// Reads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            log::debug!("Loading release config from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// External tool settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ToolSettings {
    /// Per-invocation timeout in seconds; `0` waits forever.
    pub timeout_secs: u64,
    /// Front-end build tool run before compression.
    pub build_tool: String,
    /// Plugin packager command line, run for `--plugins`.
    pub plugins_command: Vec<String>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            timeout_secs: crate::release::tools::DEFAULT_TOOL_TIMEOUT.as_secs(),
            build_tool: "gulp".into(),
            plugins_command: vec!["php".into(), "build/plugins.php".into()],
        }
    }
}

impl ToolSettings {
    /// Timeout as a duration, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Asset compression settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionSettings {
    /// Fail when neither gzip nor brotli is installed.
    pub required: bool,
}

/// Detached signature settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SigningSettings {
    /// Signing key passed to `gpg --local-user`.
    pub key: String,
    /// Treat a signing failure as a failed release (exit code 3).
    pub required: bool,
}

impl Default for SigningSettings {
    fn default() -> Self {
        Self {
            key: "1016E47079145542F8BA133548208BA13290F3EB".into(),
            required: false,
        }
    }
}

/// Docker image settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DockerSettings {
    /// Build context that receives a copy of the zip.
    pub context: String,
    /// Image repository; tagged with the version.
    pub image: String,
}

impl Default for DockerSettings {
    fn default() -> Self {
        Self {
            context: ".docker/release".into(),
            image: "snappymail".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(ReleaseConfig::parse("").unwrap(), ReleaseConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = ReleaseConfig::parse(
            r#"
            [layout]
            product_name = "webmail"

            [tools]
            timeout_secs = 0

            [signing]
            required = true
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.product_name, "webmail");
        assert_eq!(config.layout.placeholder_version, "0.0.0");
        assert_eq!(config.tools.timeout(), None);
        assert_eq!(config.tools.build_tool, "gulp");
        assert!(config.signing.required);
        assert_eq!(config.signing.key, SigningSettings::default().key);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ReleaseConfig::parse("[layout]\nproduct = \"x\"\n").is_err());
    }
}
