//! Error types for release pipeline stages.
//!
//! Every stage returns [`Result`]. Fatal and non-fatal conditions share one
//! enum; the orchestrator decides which variants abort the run.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};
use thiserror::Error as DeriveError;

/// Result type alias for release stages.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by release pipeline stages.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// A required external tool is not installed.
    #[error("required tool `{tool}` not found in PATH: {hint}")]
    ToolMissing {
        /// Tool name as looked up in PATH.
        tool: String,
        /// What the tool is needed for.
        hint: String,
    },

    /// An external tool exited with a nonzero status.
    #[error("`{tool}` failed with exit code {code}{}", stderr_suffix(.stderr))]
    ToolFailed {
        /// Tool name.
        tool: String,
        /// Exit code, -1 when killed by a signal.
        code: i32,
        /// Trimmed stderr of the tool.
        stderr: String,
    },

    /// An external tool did not finish within its timeout.
    #[error("`{tool}` timed out after {secs}s and was terminated")]
    ToolTimeout {
        /// Tool name.
        tool: String,
        /// Timeout that elapsed.
        secs: u64,
    },

    /// A metadata file no longer contains the version token it is expected to carry.
    #[error(
        "version pattern `{pattern}` not found in {}; the metadata target needs updating",
        .path.display()
    )]
    PatternNotFound {
        /// Metadata file.
        path: PathBuf,
        /// Pattern that did not match.
        pattern: String,
    },

    /// The declared release version is not `MAJOR.MINOR.PATCH`.
    #[error("invalid release version `{0}`: expected MAJOR.MINOR.PATCH")]
    InvalidVersion(String),

    /// Build options that cannot be combined.
    #[error("conflicting build options: {0}")]
    ConflictingOptions(String),

    /// Failure while writing a zip or tar archive.
    #[error("archive {}: {context}: {source}", .path.display())]
    ArchiveIo {
        /// What was being done.
        context: String,
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Detached signing of an artifact failed.
    #[error("signing {} failed: {reason}", .path.display())]
    Signing {
        /// Artifact that was not signed.
        path: PathBuf,
        /// Reason reported by the signer.
        reason: String,
    },

    /// Arch, Debian or Docker packaging failed.
    #[error("{target} packaging failed: {reason}")]
    Packaging {
        /// Packaging target name.
        target: &'static str,
        /// Failure description.
        reason: String,
    },

    /// Filesystem error with the failing path attached.
    #[error("{context} {}: {source}", .path.display())]
    Fs {
        /// What was being done.
        context: &'static str,
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Plain I/O error.
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    /// `release.toml` parse error.
    #[error("{0}")]
    TomlError(#[from] toml::de::Error),

    /// Invalid regular expression in a metadata target.
    #[error("{0}")]
    RegexError(#[from] regex::Error),

    /// Invalid glob pattern.
    #[error("{0}")]
    GlobPatternError(#[from] glob::PatternError),

    /// Zip writer error.
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Directory traversal error.
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Anything else, with a message.
    #[error("{0}")]
    GenericError(String),
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(":\n{stderr}")
    }
}

impl Error {
    /// Whether this error only affects the "signed release" guarantee.
    pub fn is_signing(&self) -> bool {
        matches!(self, Error::Signing { .. })
    }
}

/// Attach a message to `Option::None` or to a foreign error.
pub trait Context<T> {
    /// Converts into [`Error::GenericError`] with the given message.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Lazily evaluated variant of [`Context::context`].
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

impl<T, E: std::error::Error> Context<T> for std::result::Result<T, E> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::GenericError(format!("{}: {e}", f())))
    }
}

/// Extension for I/O results that records which path failed.
pub trait ErrorExt<T> {
    /// Wraps the I/O error into [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;

    /// Wraps the I/O error into [`Error::ArchiveIo`].
    fn archive_context(self, context: impl Into<String>, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    fn archive_context(self, context: impl Into<String>, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::ArchiveIo {
            context: context.into(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Returns early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::release::Error::GenericError($msg.into()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::release::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
