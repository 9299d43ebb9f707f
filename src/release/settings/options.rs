//! Build options selected on the command line.

use crate::release::{Error, Result};

/// Which stages and packaging targets a run performs.
///
/// Immutable once the pipeline starts. `aur` and `debian` select mutually
/// exclusive packaging targets; `docker` composes with either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Produce Arch User Repository metadata and the AUR `include.php` override.
    pub aur: bool,
    /// Build a Docker image from the zip artifact.
    pub docker: bool,
    /// Build a Debian package and repository metadata.
    pub debian: bool,
    /// Run the external plugin packager before archiving.
    pub plugins: bool,
    /// Stop after rewriting version metadata.
    pub set_version_only: bool,
    /// Skip the front-end build and asset compression.
    pub skip_compress: bool,
    /// Create detached signatures for the artifacts.
    pub sign: bool,
}

/// Packaging target chosen after archiving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageTarget {
    /// Arch User Repository (`.SRCINFO`, `PKGBUILD`).
    Arch,
    /// Debian package and apt repository metadata.
    Debian,
    /// Docker image.
    Docker,
}

impl std::fmt::Display for PackageTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PackageTarget::Arch => "Arch",
            PackageTarget::Debian => "Debian",
            PackageTarget::Docker => "Docker",
        })
    }
}

impl BuildOptions {
    /// Rejects combinations that cannot be honored.
    pub fn validate(&self) -> Result<()> {
        if self.aur && self.debian {
            return Err(Error::ConflictingOptions(
                "--aur and --debian select mutually exclusive packaging targets".into(),
            ));
        }
        Ok(())
    }

    /// Packaging targets in execution order.
    pub fn package_targets(&self) -> Vec<PackageTarget> {
        let mut targets = Vec::new();
        if self.aur {
            targets.push(PackageTarget::Arch);
        } else if self.debian {
            targets.push(PackageTarget::Debian);
        }
        if self.docker {
            targets.push(PackageTarget::Docker);
        }
        targets
    }
}
