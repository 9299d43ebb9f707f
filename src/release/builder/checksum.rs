//! Artifact checksum calculation.
//!
//! SHA-256 of release files is computed in process. BLAKE2b, which the Arch
//! packaging files use, comes from the external `b2sum` tool. [`Digests`]
//! hashes in-memory blobs for the apt repository indexes.

use crate::release::{
    Context, Result,
    error::ErrorExt,
    tools::{ToolInvocation, ToolRunner},
};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncReadExt;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    /// SHA-256 (in process).
    Sha256,
    /// BLAKE2b-512 via `b2sum`.
    Blake2b,
}

/// Hex digest of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    /// Digested file.
    pub path: PathBuf,
    /// Algorithm used.
    pub algorithm: DigestAlgorithm,
    /// Lowercase hex digest.
    pub hex: String,
}

/// Computes the digest of every path, in order.
pub async fn digest_files<R: ToolRunner>(
    runner: &R,
    paths: &[PathBuf],
    algorithm: DigestAlgorithm,
    timeout: Option<Duration>,
) -> Result<Vec<Checksum>> {
    let mut checksums = Vec::with_capacity(paths.len());
    for path in paths {
        let hex = match algorithm {
            DigestAlgorithm::Sha256 => calculate_sha256(path).await?,
            DigestAlgorithm::Blake2b => calculate_b2sum(runner, path, timeout).await?,
        };
        log::debug!("{:?} {} {}", algorithm, hex, path.display());
        checksums.push(Checksum {
            path: path.clone(),
            algorithm,
            hex,
        });
    }
    Ok(checksums)
}

/// Calculates the SHA-256 checksum of a file.
///
/// Reads the file in 8KB chunks to handle large files efficiently.
pub async fn calculate_sha256(file_path: &Path) -> Result<String> {
    hash_file::<Sha256>(file_path).await
}

/// Hex digests of one blob, in apt field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digests {
    /// MD5
    pub md5: String,
    /// SHA-1
    pub sha1: String,
    /// SHA-256
    pub sha256: String,
}

impl Digests {
    /// Digests `data` in memory.
    pub fn of(data: &[u8]) -> Self {
        Self {
            md5: md5_hex(data),
            sha1: hex::encode(Sha1::digest(data)),
            sha256: hex::encode(Sha256::digest(data)),
        }
    }
}

/// Lowercase hex MD5 of `data`, as `md5sums` lists it.
pub fn md5_hex(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}

async fn hash_file<D: Digest>(file_path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(file_path)
        .await
        .fs_context("opening file for hashing", file_path)?;
    let mut hasher = D::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", file_path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Runs `b2sum --binary <file>` and returns the first token of its output.
pub async fn calculate_b2sum<R: ToolRunner>(
    runner: &R,
    file_path: &Path,
    timeout: Option<Duration>,
) -> Result<String> {
    let output = runner
        .run(
            &ToolInvocation::new("b2sum")
                .arg("--binary")
                .arg_path(file_path)
                .timeout(timeout),
        )
        .await?
        .into_checked("b2sum")?;

    output
        .stdout
        .split_whitespace()
        .next()
        .map(str::to_string)
        .with_context(|| format!("b2sum printed nothing for {}", file_path.display()))
}
