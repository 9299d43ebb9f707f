//! Source tree and output layout.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where the pipeline finds its inputs and writes its outputs.
///
/// All paths are relative to the source root. The defaults describe the
/// SnappyMail repository; `release.toml` may override any of them under
/// `[layout]`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseLayout {
    /// Artifact base name (`<name>-<version>.zip`).
    pub product_name: String,

    /// Parent of the placeholder version directory.
    pub versions_dir: PathBuf,

    /// Placeholder directory name standing in for the real version.
    pub placeholder_version: String,

    /// Static assets inside the version directory.
    pub static_dir: PathBuf,

    /// Release output root; the version is appended.
    pub output_dir: PathBuf,

    /// Descriptor file name written into the per-version output directory.
    pub descriptor_file: String,

    /// Value of the descriptor's `file` field.
    pub descriptor_latest: String,

    /// Bootstrap script whose placeholder version is rewritten in the archive copy.
    pub index_file: PathBuf,

    /// Bootstrap override shipped for non-AUR installs.
    pub include_file: PathBuf,

    /// Data directory returned by the generated AUR `include.php`.
    pub aur_data_path: String,

    /// Service worker copied into the archive root.
    pub serviceworker_source: PathBuf,
}

impl Default for ReleaseLayout {
    fn default() -> Self {
        Self {
            product_name: "snappymail".into(),
            versions_dir: PathBuf::from("snappymail/v"),
            placeholder_version: "0.0.0".into(),
            static_dir: PathBuf::from("static"),
            output_dir: PathBuf::from("build/dist/releases/webmail"),
            descriptor_file: "core.json".into(),
            descriptor_latest: "../latest.tar.gz".into(),
            index_file: PathBuf::from("index.php"),
            include_file: PathBuf::from("_include.php"),
            aur_data_path: "/var/lib/snappymail".into(),
            // Development copy, not static/js/min/serviceworker.min.js.
            serviceworker_source: PathBuf::from("dev/serviceworker.js"),
        }
    }
}

impl ReleaseLayout {
    /// `<root>/snappymail/v/0.0.0`
    pub fn placeholder_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.versions_dir).join(&self.placeholder_version)
    }

    /// `<root>/snappymail/v/<version>`
    pub fn versioned_dir(&self, root: &Path, version: &str) -> PathBuf {
        root.join(&self.versions_dir).join(version)
    }

    /// Static assets of the placeholder tree.
    pub fn static_assets_dir(&self, root: &Path) -> PathBuf {
        self.placeholder_dir(root).join(&self.static_dir)
    }

    /// `<root>/build/dist/releases/webmail/<version>`
    pub fn release_dir(&self, root: &Path, version: &str) -> PathBuf {
        root.join(&self.output_dir).join(version)
    }

    /// `<name>-<version>` stem shared by every artifact.
    pub fn artifact_stem(&self, version: &str) -> String {
        format!("{}-{}", self.product_name, version)
    }
}
