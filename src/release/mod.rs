//! Release packaging pipeline for SnappyMail.
//!
//! Turns a prepared source tree into versioned, reproducible distributables:
//! version metadata is propagated, static assets are compressed, the
//! placeholder tree is packed into a zip and a tar.gz, and optional Arch,
//! Debian and Docker targets plus detached signatures follow.
//!
//! Every stage takes the immutable [`ReleaseContext`]; external programs are
//! reached through a [`tools::ToolRunner`].

pub mod archive;
pub mod builder;
pub mod compress;
pub mod descriptor;
pub mod error;
pub mod platform;
pub mod propagate;
pub mod settings;
pub mod tools;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{ReleaseOrchestrator, ReleaseOutcome, ReleaseReport, ReleaseStage};
pub use error::{Context, Error, ErrorExt, Result};
pub use settings::{
    ArchSettings, BuildOptions, CompressionSettings, DebianSettings, DockerSettings,
    PackageSettings, PackageTarget, ReleaseConfig, ReleaseContext, ReleaseContextBuilder,
    ReleaseLayout, ReleaseVersion, SigningSettings, ToolSettings,
};
