//! Digests and detached signatures for release artifacts.
//!
//! Signing is delegated to `gpg`; this module only builds its arguments and
//! interprets its exit status. A signing failure never removes or
//! invalidates an artifact, it only voids the "signed release" guarantee.

use super::checksum::{Checksum, DigestAlgorithm, digest_files};
use crate::release::{
    Error, Result,
    tools::{ToolInvocation, ToolRunner},
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A signature produced for an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureFile {
    /// Signed input.
    pub artifact: PathBuf,
    /// Signature written by the signer.
    pub signature: PathBuf,
}

/// Computes digests and signs artifacts with one signing identity.
pub struct ChecksumSigner<'a, R: ToolRunner> {
    runner: &'a R,
    identity: String,
    timeout: Option<Duration>,
}

impl<'a, R: ToolRunner> ChecksumSigner<'a, R> {
    /// Creates a signer for the `gpg --local-user` identity.
    pub fn new(runner: &'a R, identity: impl Into<String>) -> Self {
        Self {
            runner,
            identity: identity.into(),
            timeout: None,
        }
    }

    /// Per-invocation timeout.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Digests every path with `algorithm`.
    pub async fn digest(
        &self,
        paths: &[PathBuf],
        algorithm: DigestAlgorithm,
    ) -> Result<Vec<Checksum>> {
        digest_files(self.runner, paths, algorithm, self.timeout).await
    }

    /// Writes an ASCII-armored detached signature `<path>.asc`.
    pub async fn sign(&self, path: &Path) -> Result<SignatureFile> {
        let signature = with_suffix(path, ".asc");
        let invocation = self
            .gpg()
            .args(["--armor", "--detach-sign"])
            .arg_path(path);
        self.run_signer(invocation, path, signature).await
    }

    /// Writes a clear-signed copy of `path` to `output` (apt `InRelease`).
    pub async fn clearsign(&self, path: &Path, output: &Path) -> Result<SignatureFile> {
        let invocation = self
            .gpg()
            .args(["--digest-algo", "SHA512", "--clearsign", "--output"])
            .arg_path(output)
            .arg_path(path);
        self.run_signer(invocation, path, output.to_path_buf()).await
    }

    /// Writes an armored detached signature of `path` to `output` (apt `Release.gpg`).
    pub async fn sign_detached_to(&self, path: &Path, output: &Path) -> Result<SignatureFile> {
        let invocation = self
            .gpg()
            .args(["--digest-algo", "SHA512", "-abs", "--output"])
            .arg_path(output)
            .arg_path(path);
        self.run_signer(invocation, path, output.to_path_buf()).await
    }

    fn gpg(&self) -> ToolInvocation {
        ToolInvocation::new("gpg")
            .args(["--batch", "--yes", "--local-user", self.identity.as_str()])
            .timeout(self.timeout)
    }

    async fn run_signer(
        &self,
        invocation: ToolInvocation,
        artifact: &Path,
        signature: PathBuf,
    ) -> Result<SignatureFile> {
        let failed = |reason: String| Error::Signing {
            path: artifact.to_path_buf(),
            reason,
        };

        let output = self
            .runner
            .run(&invocation)
            .await
            .map_err(|e| failed(e.to_string()))?;
        if !output.success() {
            let stderr = output.stderr.trim();
            return Err(failed(if stderr.is_empty() {
                format!("gpg exited with code {}", output.code)
            } else {
                format!("gpg exited with code {}: {}", output.code, stderr)
            }));
        }
        if !signature.is_file() {
            return Err(failed(format!(
                "gpg succeeded but {} was not written",
                signature.display()
            )));
        }

        log::info!("✓ Signed {}", artifact.display());
        Ok(SignatureFile {
            artifact: artifact.to_path_buf(),
            signature,
        })
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
