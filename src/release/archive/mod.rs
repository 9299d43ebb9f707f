//! Release archive creation.
//!
//! [`ArchiveBuilder`] produces `<name>-<version>.zip` and
//! `<name>-<version>.tar.gz` from the placeholder version tree plus a set of
//! passthrough and synthesized files.
//!
//! # Process
//!
//! 1. Remove stale artifacts of the same version
//! 2. Rename `snappymail/v/0.0.0` to `snappymail/v/<version>` ([`VersionDirGuard`])
//! 3. List the tree in pre-order and append the release extras
//! 4. Write zip and tar from the same list, gzip the tar
//! 5. Rename the tree back (also on any failure)

mod entries;
mod guard;
mod writer;

pub use entries::{ArchiveEntry, EntrySource, collect_tree, release_extras};
pub use guard::VersionDirGuard;

use crate::release::{
    Context, ReleaseContext, Result,
    utils::fs::{create_dir_all, remove_file_if_exists},
};
use std::path::PathBuf;

/// Archive format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// `.zip`
    Zip,
    /// `.tar.gz`
    TarGz,
}

/// A finished archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveArtifact {
    /// Format.
    pub kind: ArchiveKind,
    /// Location on disk.
    pub path: PathBuf,
    /// Member names in archive order.
    pub entries: Vec<String>,
}

/// Both archives of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveArtifacts {
    /// The zip.
    pub zip: ArchiveArtifact,
    /// The gzipped tar.
    pub tar_gz: ArchiveArtifact,
}

/// Builds the release archives for a [`ReleaseContext`].
pub struct ArchiveBuilder<'a> {
    context: &'a ReleaseContext,
}

impl<'a> ArchiveBuilder<'a> {
    /// Creates a builder for `context`.
    pub fn new(context: &'a ReleaseContext) -> Self {
        Self { context }
    }

    /// Deletes zip, tar and tar.gz left by an earlier run of the same version.
    pub async fn remove_stale(&self) -> Result<()> {
        for path in [
            self.context.zip_path(),
            self.context.tar_path(),
            self.context.tar_gz_path(),
        ] {
            if remove_file_if_exists(&path).await? {
                log::debug!("Removed stale {}", path.display());
            }
        }
        Ok(())
    }

    /// Builds both archives.
    ///
    /// # Errors
    ///
    /// [`Error::ArchiveIo`](crate::release::Error::ArchiveIo) for any read or write failure.
    /// The version directory is renamed back before this returns, whatever the outcome.
    pub async fn build(&self) -> Result<ArchiveArtifacts> {
        let context = self.context;
        let layout = context.layout();
        let root = context.source_root().to_path_buf();

        create_dir_all(&context.release_dir()).await?;
        self.remove_stale().await?;

        let guard = VersionDirGuard::acquire(
            layout.placeholder_dir(&root),
            layout.versioned_dir(&root, context.version().as_str()),
        )?;

        let tree = guard.path().to_path_buf();
        let mut entries = {
            let root = root.clone();
            blocking(move || collect_tree(&root, &tree)).await?
        };
        entries.extend(release_extras(context)?);
        log::info!("Packing {} entries", entries.len());

        let zip_path = context.zip_path();
        let tar_path = context.tar_path();
        let tar_gz_path = context.tar_gz_path();
        let names = {
            let (zip_path, tar_path, tar_gz_path) =
                (zip_path.clone(), tar_path.clone(), tar_gz_path.clone());
            blocking(move || {
                let names = writer::write_archives(&entries, &zip_path, &tar_path)?;
                writer::gzip_tar(&tar_path, &tar_gz_path)?;
                Ok(names)
            })
            .await?
        };

        guard.restore()?;

        log::info!("✓ Created {}", zip_path.display());
        log::info!("✓ Created {}", tar_gz_path.display());

        Ok(ArchiveArtifacts {
            zip: ArchiveArtifact {
                kind: ArchiveKind::Zip,
                path: zip_path,
                entries: names.clone(),
            },
            tar_gz: ArchiveArtifact {
                kind: ArchiveKind::TarGz,
                path: tar_gz_path,
                entries: names,
            },
        })
    }
}

/// Runs blocking archive work on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("Archive task panicked")?
}
