//! Pre-compression of built static assets.
//!
//! Web servers serve `app.js.gz` / `app.js.br` next to `app.js` when the
//! client accepts it. This stage produces those siblings with the external
//! `gzip` and `brotli` tools, each of which is optional.

use crate::release::{
    Error, Result,
    tools::{ToolInvocation, ToolRunner},
    utils::fs::remove_file_if_exists,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Asset globs relative to the static directory.
pub const ASSET_PATTERNS: &[&str] = &["js/*.js", "js/min/*.js", "css/admin*.css", "css/app*.css"];

/// Assets shipped uncompressed; their compressed siblings are deleted.
pub const UNCOMPRESSED_ASSETS: &[&str] = &["js/boot.js", "js/min/boot.min.js"];

/// A supported compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compressor {
    /// `gzip` → `.gz`
    Gzip,
    /// `brotli` → `.br`
    Brotli,
}

impl Compressor {
    /// All compressors in the order they run.
    pub const ALL: [Compressor; 2] = [Compressor::Gzip, Compressor::Brotli];

    /// Executable name.
    pub fn tool(self) -> &'static str {
        match self {
            Compressor::Gzip => "gzip",
            Compressor::Brotli => "brotli",
        }
    }

    /// Extension of the produced sibling, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Compressor::Gzip => "gz",
            Compressor::Brotli => "br",
        }
    }

    fn sibling(self, path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(self.extension());
        PathBuf::from(name)
    }
}

/// What the compression stage did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressionReport {
    /// Compressed files present after the run (exclusions removed).
    pub produced: Vec<PathBuf>,
    /// Compressors that were not installed.
    pub skipped_tools: Vec<&'static str>,
    /// Non-fatal notes for the run summary.
    pub warnings: Vec<String>,
}

/// Produces `.gz` / `.br` siblings for the static asset bundles.
pub struct AssetCompressor<'a, R: ToolRunner> {
    runner: &'a R,
    timeout: Option<Duration>,
    required: bool,
}

impl<'a, R: ToolRunner> AssetCompressor<'a, R> {
    /// Creates a compressor using `runner` for the external tools.
    pub fn new(runner: &'a R) -> Self {
        Self {
            runner,
            timeout: None,
            required: false,
        }
    }

    /// Per-invocation timeout.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fail when no compressor is installed instead of warning.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Compresses every asset under `asset_dir` matching [`ASSET_PATTERNS`].
    ///
    /// # Errors
    ///
    /// - [`Error::ToolMissing`] if `required` and neither tool is installed
    /// - [`Error::ToolFailed`] if a compressor exits nonzero
    pub async fn compress(&self, asset_dir: &Path) -> Result<CompressionReport> {
        let mut report = CompressionReport::default();

        let available: Vec<Compressor> = Compressor::ALL
            .into_iter()
            .filter(|c| {
                let found = self.runner.has(c.tool());
                if !found {
                    log::warn!("{} not installed, skipping .{} assets", c.tool(), c.extension());
                    report.skipped_tools.push(c.tool());
                    report.warnings.push(format!(
                        "{} not installed; .{} assets not produced",
                        c.tool(),
                        c.extension()
                    ));
                }
                found
            })
            .collect();

        if available.is_empty() && self.required {
            return Err(Error::ToolMissing {
                tool: "gzip".into(),
                hint: "asset compression is required but neither gzip nor brotli is installed"
                    .into(),
            });
        }

        let groups = Self::expand_patterns(asset_dir)?;

        for compressor in available {
            log::info!("Compressing *.js and *.css with {}", compressor.tool());
            for files in groups.iter().filter(|g| !g.is_empty()) {
                let invocation = ToolInvocation::new(compressor.tool())
                    .args(["-k", "-f", "--best"])
                    .args(files.iter().map(|f| f.to_string_lossy().into_owned()))
                    .timeout(self.timeout);
                self.runner
                    .run(&invocation)
                    .await?
                    .into_checked(compressor.tool())?;

                report.produced.extend(
                    files
                        .iter()
                        .map(|f| compressor.sibling(f))
                        .filter(|s| s.is_file()),
                );
            }

            for excluded in UNCOMPRESSED_ASSETS {
                let sibling = compressor.sibling(&asset_dir.join(excluded));
                if remove_file_if_exists(&sibling).await? {
                    log::debug!("Removed {}", sibling.display());
                }
                report.produced.retain(|p| p != &sibling);
            }
        }

        Ok(report)
    }

    /// Matches each pattern; an empty group is not an error.
    fn expand_patterns(asset_dir: &Path) -> Result<Vec<Vec<PathBuf>>> {
        let base = glob::Pattern::escape(&asset_dir.to_string_lossy());
        let mut groups = Vec::with_capacity(ASSET_PATTERNS.len());
        for pattern in ASSET_PATTERNS {
            let mut files: Vec<PathBuf> = glob::glob(&format!("{base}/{pattern}"))?
                .filter_map(|entry| entry.ok())
                .filter(|path| path.is_file())
                .collect();
            files.sort();
            if files.is_empty() {
                log::debug!("No assets match {}", pattern);
            }
            groups.push(files);
        }
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::tools::testing::FakeRunner;

    fn asset_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("js/min")).unwrap();
        std::fs::create_dir_all(root.join("css")).unwrap();
        for file in [
            "js/app.js",
            "js/boot.js",
            "js/min/app.min.js",
            "js/min/boot.min.js",
            "css/app.css",
            "css/admin.css",
            "css/other.css",
        ] {
            std::fs::write(root.join(file), "content").unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn no_compressors_is_graceful() {
        let dir = asset_tree();
        let runner = FakeRunner::with_tools(&[]);
        let report = AssetCompressor::new(&runner)
            .compress(dir.path())
            .await
            .unwrap();
        assert!(report.produced.is_empty());
        assert_eq!(report.skipped_tools, vec!["gzip", "brotli"]);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn no_compressors_fails_when_required() {
        let dir = asset_tree();
        let runner = FakeRunner::with_tools(&[]);
        let err = AssetCompressor::new(&runner)
            .required(true)
            .compress(dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ToolMissing { .. }));
    }

    #[tokio::test]
    async fn boot_scripts_stay_uncompressed() {
        let dir = asset_tree();
        let runner = FakeRunner::with_tools(&["gzip", "brotli"]);
        let report = AssetCompressor::new(&runner)
            .compress(dir.path())
            .await
            .unwrap();

        let root = dir.path();
        assert!(root.join("js/app.js.gz").is_file());
        assert!(root.join("js/min/app.min.js.br").is_file());
        assert!(root.join("css/admin.css.gz").is_file());
        assert!(!root.join("css/other.css.gz").exists());
        assert!(!root.join("js/boot.js.gz").exists());
        assert!(!root.join("js/min/boot.min.js.br").exists());
        assert!(!report.produced.contains(&root.join("js/boot.js.br")));
        // 6 matched assets, 2 of which are excluded, times two tools
        assert_eq!(report.produced.len(), 8);
        assert_eq!(runner.calls_to("gzip").len(), 4);
    }

    #[tokio::test]
    async fn empty_asset_dir_runs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::with_tools(&["gzip"]);
        let report = AssetCompressor::new(&runner)
            .compress(dir.path())
            .await
            .unwrap();
        assert!(report.produced.is_empty());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn compressor_failure_is_fatal() {
        let dir = asset_tree();
        let runner = FakeRunner::with_tools(&["gzip"]).failing("gzip", 1);
        let err = AssetCompressor::new(&runner)
            .compress(dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ToolFailed { code: 1, .. }));
    }
}
