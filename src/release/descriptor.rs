//! Release descriptor (`core.json`) consumed by the in-app updater.

use crate::release::{ReleaseContext, Result, error::ErrorExt, utils::fs::create_dir_all};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `{"version", "file", "warnings"}` as published next to the archives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDescriptor {
    /// Released version.
    pub version: String,
    /// Download path relative to the descriptor.
    pub file: String,
    /// Updater warnings; the pipeline never emits any.
    pub warnings: Vec<String>,
}

impl ReleaseDescriptor {
    /// Descriptor for the context's version.
    pub fn for_release(context: &ReleaseContext) -> Self {
        Self {
            version: context.version().to_string(),
            file: context.layout().descriptor_latest.clone(),
            warnings: Vec::new(),
        }
    }

    /// Writes pretty-printed JSON to `<release dir>/<descriptor file>`.
    pub async fn write(&self, context: &ReleaseContext) -> Result<PathBuf> {
        let dir = context.release_dir();
        create_dir_all(&dir).await?;
        let path = dir.join(&context.layout().descriptor_file);
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&path, json)
            .await
            .fs_context("writing release descriptor", &path)?;
        log::info!("✓ Wrote {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_empty_warnings() {
        let descriptor = ReleaseDescriptor {
            version: "2.3.1".into(),
            file: "../latest.tar.gz".into(),
            warnings: Vec::new(),
        };
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"version": "2.3.1", "file": "../latest.tar.gz", "warnings": []})
        );
    }
}
