//! Release packager for the SnappyMail webmail application.
//!
//! Produces the versioned distributables of a SnappyMail source tree:
//! - zip and tar.gz archives with a `core.json` update descriptor
//! - Arch User Repository metadata, a Debian package, a Docker image
//! - gpg signatures for all of the above
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod release;

// Re-export commonly used types
pub use error::{CliError, ReleaseError, Result};
