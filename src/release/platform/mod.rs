//! Packaging targets run after the archives exist.
//!
//! - [`arch`] - `.SRCINFO` and `PKGBUILD` for the Arch User Repository
//! - [`debian`] - `.deb` plus `Packages`/`Release`
//! - [`docker`] - image built from the release zip

pub mod arch;
pub mod debian;
pub mod docker;

pub use arch::ArchPackage;
pub use debian::DebianPackage;
pub use docker::DockerImage;
