//! Top-level error types for the release CLI.
//!
//! Stage errors live in [`crate::release::Error`]; this layer adds CLI
//! failures and maps everything onto process exit codes.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for the release CLI
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Release pipeline errors
    #[error("{0}")]
    Release(#[from] crate::release::Error),

    /// Generic errors from anyhow
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// `signing.required` is set and at least one artifact was not signed
    #[error("{failed} artifact(s) could not be signed and signing is required")]
    SigningRequired {
        /// Number of signing failures
        failed: usize,
    },
}

impl ReleaseError {
    /// Process exit code for this error.
    ///
    /// A failing build tool's own exit code is handled by the CLI before an
    /// error is produced; everything else is 1, except a required signing
    /// failure which is 3.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::Cli(CliError::SigningRequired { .. }) => 3,
            _ => 1,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::release::Error;

        match self {
            ReleaseError::Release(Error::ToolMissing { tool, .. }) => {
                vec![format!("Install `{tool}` and make sure it is on PATH")]
            }
            ReleaseError::Release(Error::ToolTimeout { .. }) => {
                vec![
                    "Raise tools.timeout_secs in release.toml (0 disables the timeout)".to_string(),
                ]
            }
            ReleaseError::Release(Error::PatternNotFound { .. }) => {
                vec!["Check that the metadata file still carries a version string".to_string()]
            }
            ReleaseError::Cli(CliError::SigningRequired { .. }) => vec![
                "Check that gpg is installed and the signing key is in the keyring".to_string(),
                "Set signing.required = false to accept unsigned artifacts".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}
