//! Configuration structures for a release run.
//!
//! This module provides the release version, build options, the source/output
//! layout, `release.toml` sections and the immutable [`ReleaseContext`]
//! handed to every pipeline stage.

mod builder;
mod config;
mod core;
mod layout;
mod linux;
mod options;
mod package;
mod version;

// Re-export all public types
pub use builder::ReleaseContextBuilder;
pub use config::{
    CompressionSettings, DockerSettings, ReleaseConfig, SigningSettings, ToolSettings,
};
pub use self::core::ReleaseContext;
pub use layout::ReleaseLayout;
pub use linux::{ArchSettings, DebianSettings};
pub use options::{BuildOptions, PackageTarget};
pub use package::PackageSettings;
pub use version::ReleaseVersion;
