//! Version propagation into metadata files.
//!
//! Container descriptors, app manifests and platform plugin files each embed
//! the release version in their own format. [`VersionPropagator`] rewrites
//! them in place from the single [`ReleaseVersion`].

use crate::release::{
    Error, ReleaseVersion, Result,
    error::ErrorExt,
    utils::fs::write_if_changed,
};
use regex::{NoExpand, Regex};
use std::path::{Path, PathBuf};

/// Placeholder substituted with the version in replacement templates.
const VERSION_TOKEN: &str = "{version}";

/// How the version is located inside a metadata file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Every match of the regex is replaced.
    Pattern(String),
    /// The whole file content is the version.
    WholeFile,
}

/// A metadata file carrying an embedded version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTarget {
    /// Path relative to the source root.
    pub path: PathBuf,
    /// Locates the version token.
    pub matcher: Matcher,
    /// Replacement text; `{version}` is substituted.
    pub replacement: String,
}

impl MetadataTarget {
    /// Target whose matches of `pattern` become `replacement`.
    pub fn pattern(path: impl Into<PathBuf>, pattern: &str, replacement: &str) -> Self {
        Self {
            path: path.into(),
            matcher: Matcher::Pattern(pattern.to_string()),
            replacement: replacement.to_string(),
        }
    }

    /// Target whose entire content is the version.
    pub fn whole_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            matcher: Matcher::WholeFile,
            replacement: VERSION_TOKEN.to_string(),
        }
    }

    /// Returns `text` with the version applied.
    ///
    /// # Errors
    ///
    /// [`Error::PatternNotFound`] when the pattern does not occur in `text`.
    pub fn apply(&self, text: &str, version: &ReleaseVersion) -> Result<String> {
        let replacement = self.replacement.replace(VERSION_TOKEN, version.as_str());
        match &self.matcher {
            Matcher::WholeFile => Ok(replacement),
            Matcher::Pattern(pattern) => {
                let regex = Regex::new(pattern)?;
                if !regex.is_match(text) {
                    return Err(Error::PatternNotFound {
                        path: self.path.clone(),
                        pattern: pattern.clone(),
                    });
                }
                Ok(regex
                    .replace_all(text, NoExpand(&replacement))
                    .into_owned())
            }
        }
    }
}

/// The metadata files of the SnappyMail tree.
pub fn default_targets() -> Vec<MetadataTarget> {
    vec![
        // cloudron
        MetadataTarget::pattern(
            "integrations/cloudron/Dockerfile",
            r"VERSION=[0-9.]+",
            "VERSION={version}",
        ),
        MetadataTarget::pattern(
            "integrations/cloudron/DESCRIPTION.md",
            r"<upstream>[^<]*<",
            "<upstream>{version}<",
        ),
        // docker
        MetadataTarget::pattern(
            ".docker/release/files/usr/local/include/application.ini",
            r#"current = "[0-9.]+""#,
            r#"current = "{version}""#,
        ),
        // nextcloud
        MetadataTarget::whole_file("integrations/nextcloud/snappymail/VERSION"),
        MetadataTarget::pattern(
            "integrations/nextcloud/snappymail/appinfo/info.xml",
            r"<version>[^<]*<",
            "<version>{version}<",
        ),
        // virtualmin
        MetadataTarget::pattern(
            "integrations/virtualmin/snappymail.pl",
            r#"return \( "[0-9]+\.[0-9]+\.[0-9]+" \)"#,
            r#"return ( "{version}" )"#,
        ),
    ]
}

/// Result of propagating into one metadata file.
#[derive(Debug)]
pub struct PropagationOutcome {
    /// Metadata file, relative to the source root.
    pub path: PathBuf,
    /// `Ok(true)` when the file was rewritten, `Ok(false)` when already current.
    pub result: Result<bool>,
}

/// Rewrites metadata files to the release version.
#[derive(Debug, Clone)]
pub struct VersionPropagator {
    targets: Vec<MetadataTarget>,
}

impl Default for VersionPropagator {
    fn default() -> Self {
        Self::new(default_targets())
    }
}

impl VersionPropagator {
    /// Creates a propagator over `targets`.
    pub fn new(targets: Vec<MetadataTarget>) -> Self {
        Self { targets }
    }

    /// Configured targets.
    pub fn targets(&self) -> &[MetadataTarget] {
        &self.targets
    }

    /// Applies `version` to every target under `root`.
    ///
    /// Every target is attempted; failures are reported per file so one
    /// drifted file does not hide the others. Files already carrying the
    /// version are left untouched, so a second run is a no-op.
    pub async fn propagate(
        &self,
        root: &Path,
        version: &ReleaseVersion,
    ) -> Vec<PropagationOutcome> {
        let mut outcomes = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let result = Self::propagate_one(root, target, version).await;
            match &result {
                Ok(true) => log::info!("Set version {} in {}", version, target.path.display()),
                Ok(false) => log::debug!("{} already at {}", target.path.display(), version),
                Err(e) => log::error!("{}", e),
            }
            outcomes.push(PropagationOutcome {
                path: target.path.clone(),
                result,
            });
        }
        outcomes
    }

    async fn propagate_one(
        root: &Path,
        target: &MetadataTarget,
        version: &ReleaseVersion,
    ) -> Result<bool> {
        let path = root.join(&target.path);
        let current = match target.matcher {
            Matcher::WholeFile => String::new(),
            Matcher::Pattern(_) => tokio::fs::read_to_string(&path)
                .await
                .fs_context("reading metadata file", &path)?,
        };
        let updated = target.apply(&current, version)?;
        write_if_changed(&path, &updated).await
    }
}
