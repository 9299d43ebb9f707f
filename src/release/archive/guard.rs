//! RAII guard for the temporary version directory rename.
//!
//! The source tree keeps its assets under a placeholder directory
//! (`snappymail/v/0.0.0`). While archiving, that directory is renamed to the
//! real version so archive paths carry it. The guard renames it back when
//! dropped: on success, on `?` early returns, on panic unwind and when the
//! owning future is cancelled.

use crate::{
    bail,
    release::{Result, error::ErrorExt},
};
use std::path::{Path, PathBuf};

/// Holds `placeholder` renamed to `versioned` until released.
#[derive(Debug)]
pub struct VersionDirGuard {
    placeholder: PathBuf,
    versioned: PathBuf,
    active: bool,
}

impl VersionDirGuard {
    /// Renames `placeholder` to `versioned`.
    ///
    /// A `versioned` directory left behind by a killed run (placeholder
    /// missing) is renamed back first. When both paths are equal the guard
    /// does nothing.
    ///
    /// # Errors
    ///
    /// Fails if the placeholder is missing, if both directories exist, or if
    /// the rename itself fails.
    pub fn acquire(placeholder: impl Into<PathBuf>, versioned: impl Into<PathBuf>) -> Result<Self> {
        let placeholder = placeholder.into();
        let versioned = versioned.into();

        if placeholder == versioned {
            log::debug!("Version equals placeholder, no rename needed");
            return Ok(Self {
                placeholder,
                versioned,
                active: false,
            });
        }

        if !placeholder.exists() && versioned.is_dir() {
            log::warn!(
                "Found {} from an interrupted run, restoring {}",
                versioned.display(),
                placeholder.display()
            );
            std::fs::rename(&versioned, &placeholder)
                .fs_context("restoring stale version directory", &versioned)?;
        }

        if !placeholder.is_dir() {
            bail!(
                "placeholder directory {} does not exist",
                placeholder.display()
            );
        }
        if versioned.exists() {
            bail!(
                "{} already exists next to {}; remove it before releasing",
                versioned.display(),
                placeholder.display()
            );
        }

        std::fs::rename(&placeholder, &versioned)
            .fs_context("temporarily renaming", &placeholder)?;
        log::debug!(
            "Renamed {} -> {}",
            placeholder.display(),
            versioned.display()
        );

        Ok(Self {
            placeholder,
            versioned,
            active: true,
        })
    }

    /// Where the tree currently lives.
    pub fn path(&self) -> &Path {
        if self.active {
            &self.versioned
        } else {
            &self.placeholder
        }
    }

    /// Renames the directory back, reporting failure instead of only logging it.
    pub fn restore(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        std::fs::rename(&self.versioned, &self.placeholder)
            .fs_context("restoring version directory", &self.versioned)?;
        log::debug!(
            "Restored {} -> {}",
            self.versioned.display(),
            self.placeholder.display()
        );
        Ok(())
    }
}

impl Drop for VersionDirGuard {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::error!("{}", e);
        }
    }
}
