//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap and maps the flags
//! onto [`BuildOptions`].

use crate::release::BuildOptions;
use clap::Parser;
use std::path::PathBuf;

/// Release packager for SnappyMail
#[derive(Parser, Debug)]
#[command(
    name = "snappymail_release",
    version,
    about = "Builds SnappyMail release archives",
    long_about = "Propagates the version from package.json into every integration's metadata,
runs the front-end build, compresses static assets and packs the release zip and tar.gz.

Usage:
  snappymail_release
  snappymail_release --set-version
  snappymail_release --aur --sign
  snappymail_release --debian --docker --skip-gulp

Artifacts are written to build/dist/releases/webmail/<version>/."
)]
pub struct Args {
    /// Produce Arch User Repository metadata (.SRCINFO, PKGBUILD)
    #[arg(long, conflicts_with = "debian")]
    pub aur: bool,

    /// Build a Docker image from the release zip
    #[arg(long)]
    pub docker: bool,

    /// Run the plugin packager before archiving
    #[arg(long)]
    pub plugins: bool,

    /// Only propagate the version into metadata files, then stop
    #[arg(long = "set-version")]
    pub set_version: bool,

    /// Skip the gulp build and asset compression
    #[arg(long = "skip-gulp")]
    pub skip_gulp: bool,

    /// Build a Debian package and apt repository metadata
    #[arg(long)]
    pub debian: bool,

    /// Sign the artifacts with gpg
    #[arg(long)]
    pub sign: bool,

    /// SnappyMail source tree
    #[arg(short = 's', long, value_name = "DIR", default_value = ".")]
    pub source: PathBuf,

    /// Release configuration (default: <SOURCE>/release.toml when present)
    #[arg(short = 'c', long, value_name = "FILE", env = "SNAPPYMAIL_RELEASE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the version from package.json
    #[arg(long = "release-version", value_name = "X.Y.Z")]
    pub release_version: Option<String>,

    /// Show debug output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Build options selected by the flags.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            aur: self.aur,
            docker: self.docker,
            debian: self.debian,
            plugins: self.plugins,
            set_version_only: self.set_version,
            skip_compress: self.skip_gulp,
            sign: self.sign,
        }
    }

    /// Default `log` filter for this invocation.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Error
        } else {
            log::LevelFilter::Warn
        }
    }
}
