//! File system utilities for release stages.
//!
//! Idempotent helpers: removing something that is already gone and creating
//! something that already exists both succeed.

use crate::{
    bail,
    release::{Result, error::ErrorExt},
};
use std::{io, path::Path};
use tokio::fs;

/// Creates all of the directories of the specified path.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes a file if it exists. Returns whether something was removed.
pub async fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).fs_context("removing file", path),
    }
}

/// Blocking variant of [`remove_file_if_exists`] for use inside `spawn_blocking`.
pub fn remove_file_if_exists_sync(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).fs_context("removing file", path),
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        bail!("{:?} does not exist", from);
    }
    if !from.is_file() {
        bail!("{:?} is not a file", from);
    }
    if let Some(dest_dir) = to.parent() {
        create_dir_all(dest_dir).await?;
    }
    fs::copy(from, to).await.fs_context("copying to", to)?;
    Ok(())
}

/// Writes `contents` only when it differs from what is on disk.
///
/// Returns whether the file was written.
pub async fn write_if_changed(path: &Path, contents: &str) -> Result<bool> {
    match fs::read_to_string(path).await {
        Ok(current) if current == contents => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e).fs_context("reading", path),
    }
    if let Some(parent) = path.parent() {
        create_dir_all(parent).await?;
    }
    fs::write(path, contents).await.fs_context("writing", path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn removing_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        assert!(!remove_file_if_exists(&path).await.unwrap());
        std::fs::write(&path, "x").unwrap();
        assert!(remove_file_if_exists(&path).await.unwrap());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn write_if_changed_skips_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/file.txt");
        assert!(write_if_changed(&path, "a").await.unwrap());
        assert!(!write_if_changed(&path, "a").await.unwrap());
        assert!(write_if_changed(&path, "b").await.unwrap());
    }

    #[tokio::test]
    async fn copy_file_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(dir.path(), &dir.path().join("copy"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("is not a file"));
    }
}
