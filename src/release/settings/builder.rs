//! Builder for constructing [`ReleaseContext`].

use super::{BuildOptions, PackageSettings, ReleaseConfig, ReleaseContext, ReleaseVersion};
use crate::release::Result;
use std::path::{Path, PathBuf};

/// Builder for [`ReleaseContext`].
///
/// When no version is set explicitly, it is read from `<source_root>/package.json`.
#[derive(Debug, Default)]
pub struct ReleaseContextBuilder {
    source_root: Option<PathBuf>,
    version: Option<String>,
    options: BuildOptions,
    config: Option<ReleaseConfig>,
}

impl ReleaseContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the repository root.
    ///
    /// Default: current directory
    pub fn source_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the release version instead of reading `package.json`.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets build options.
    ///
    /// Default: all options off
    pub fn options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the configuration.
    ///
    /// Default: `<source_root>/release.toml` if present, otherwise built-in defaults
    pub fn config(mut self, config: ReleaseConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Validates the options and builds the context.
    ///
    /// # Errors
    ///
    /// - [`Error::ConflictingOptions`](crate::release::Error::ConflictingOptions) for `--aur`
    ///   with `--debian`
    /// - [`Error::InvalidVersion`](crate::release::Error::InvalidVersion) for a malformed version
    /// - I/O or JSON errors while reading `package.json`
    pub fn build(self) -> Result<ReleaseContext> {
        self.options.validate()?;

        let source_root = self.source_root.unwrap_or_else(|| PathBuf::from("."));
        let version = match self.version {
            Some(raw) => ReleaseVersion::parse(&raw)?,
            None => PackageSettings::load(&source_root)?.version,
        };
        let config = match self.config {
            Some(config) => config,
            None => ReleaseConfig::load_or_default(&source_root.join("release.toml"))?,
        };

        Ok(ReleaseContext::new(source_root, version, self.options, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::Error;

    #[test]
    fn conflicting_options_fail_before_reading_anything() {
        let err = ReleaseContextBuilder::new()
            .source_root("/nonexistent/source/root")
            .options(BuildOptions {
                aur: true,
                debian: true,
                ..Default::default()
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ConflictingOptions(_)));
    }

    #[test]
    fn artifact_paths_carry_the_version() {
        let context = ReleaseContextBuilder::new()
            .source_root("/src")
            .version("2.3.1")
            .config(ReleaseConfig::default())
            .build()
            .unwrap();
        assert_eq!(
            context.zip_path(),
            PathBuf::from("/src/build/dist/releases/webmail/2.3.1/snappymail-2.3.1.zip")
        );
        assert_eq!(
            context.tar_gz_path().file_name().unwrap(),
            "snappymail-2.3.1.tar.gz"
        );
    }

    #[test]
    fn version_is_read_from_package_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), r#"{"version":"1.2.3"}"#).unwrap();
        let context = ReleaseContextBuilder::new()
            .source_root(dir.path())
            .build()
            .unwrap();
        assert_eq!(context.version().as_str(), "1.2.3");
    }
}
