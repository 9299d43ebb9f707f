//! Release orchestration and coordination.
//!
//! This module provides the [`ReleaseOrchestrator`] that sequences the
//! pipeline stages for one [`ReleaseContext`](crate::release::ReleaseContext).
//!
//! # Overview
//!
//! The orchestrator:
//! 1. Validates [`BuildOptions`](crate::release::BuildOptions)
//! 2. Propagates the version into every metadata file
//! 3. Runs the front-end build and asset compression
//! 4. Builds the zip and tar.gz, then the descriptor
//! 5. Runs the selected packaging targets
//! 6. Signs the artifacts when requested
//!
//! # Example
//!
//! ```no_run
//! use snappymail_release::release::{
//!     BuildOptions, ReleaseContextBuilder, ReleaseOrchestrator, ReleaseOutcome,
//!     tools::SystemToolRunner,
//! };
//!
//! # async fn example() -> snappymail_release::release::Result<()> {
//! let context = ReleaseContextBuilder::new()
//!     .source_root(".")
//!     .options(BuildOptions { sign: true, ..Default::default() })
//!     .build()?;
//!
//! let runner = SystemToolRunner::new(context.config().tools.timeout());
//! let outcome = ReleaseOrchestrator::new(context, runner).run().await?;
//! if let ReleaseOutcome::Released(report) = outcome {
//!     println!("Created {}", report.archives.zip.path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA-256 of files, MD5/SHA-1/SHA-256 of blobs, BLAKE2b via `b2sum`
//! - [`orchestrator`] - [`ReleaseOrchestrator`] and [`ReleaseReport`]
//! - [`signing`] - detached and clear signatures via `gpg`
//! - [`tool_detection`] - external tool availability checking

pub mod checksum;
pub mod orchestrator;
pub mod signing;
pub mod tool_detection;

pub use checksum::{Checksum, DigestAlgorithm, Digests};
pub use orchestrator::{
    PackageFiles, ReleaseOrchestrator, ReleaseOutcome, ReleaseReport, ReleaseStage,
};
pub use signing::{ChecksumSigner, SignatureFile};
