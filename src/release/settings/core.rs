//! Immutable per-run release context.

use super::{BuildOptions, ReleaseConfig, ReleaseLayout, ReleaseVersion};
use std::path::{Path, PathBuf};

/// Everything a stage needs to know about the current run.
///
/// Constructed once via [`ReleaseContextBuilder`](super::ReleaseContextBuilder)
/// and passed by reference to every stage. Nothing in it changes while the
/// pipeline runs.
///
/// # Examples
///
/// ```no_run
/// use snappymail_release::release::{BuildOptions, ReleaseContextBuilder};
///
/// # fn example() -> snappymail_release::release::Result<()> {
/// let context = ReleaseContextBuilder::new()
///     .source_root(".")
///     .version("2.3.1")
///     .options(BuildOptions { sign: true, ..Default::default() })
///     .build()?;
/// assert_eq!(context.artifact_stem(), "snappymail-2.3.1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    source_root: PathBuf,
    version: ReleaseVersion,
    options: BuildOptions,
    config: ReleaseConfig,
}

impl ReleaseContext {
    pub(super) fn new(
        source_root: PathBuf,
        version: ReleaseVersion,
        options: BuildOptions,
        config: ReleaseConfig,
    ) -> Self {
        Self {
            source_root,
            version,
            options,
            config,
        }
    }

    /// Repository root every relative path is resolved against.
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// The release version.
    pub fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    /// Selected build options.
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Loaded configuration.
    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    /// Input/output layout.
    pub fn layout(&self) -> &ReleaseLayout {
        &self.config.layout
    }

    /// Resolves a root-relative path.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.source_root.join(relative)
    }

    /// Per-version output directory.
    pub fn release_dir(&self) -> PathBuf {
        self.layout()
            .release_dir(&self.source_root, self.version.as_str())
    }

    /// `<name>-<version>`
    pub fn artifact_stem(&self) -> String {
        self.layout().artifact_stem(self.version.as_str())
    }

    /// Destination of the zip artifact.
    pub fn zip_path(&self) -> PathBuf {
        self.release_dir()
            .join(format!("{}.zip", self.artifact_stem()))
    }

    /// Destination of the intermediate, uncompressed tar.
    pub fn tar_path(&self) -> PathBuf {
        self.release_dir()
            .join(format!("{}.tar", self.artifact_stem()))
    }

    /// Destination of the gzipped tar artifact.
    pub fn tar_gz_path(&self) -> PathBuf {
        self.release_dir()
            .join(format!("{}.tar.gz", self.artifact_stem()))
    }
}
