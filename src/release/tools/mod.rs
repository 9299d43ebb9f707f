//! External tool invocation.
//!
//! Every external program the pipeline touches (gulp, gzip, brotli, b2sum,
//! gpg, docker, the plugin packager) goes through a [`ToolRunner`]. The
//! production implementation is [`SystemToolRunner`]; tests substitute doubles
//! that simulate missing tools and failures without spawning processes.

mod invocation;
mod system;

#[cfg(test)]
pub(crate) mod testing;

pub use invocation::{ToolInvocation, ToolOutput};
pub use system::{DEFAULT_TOOL_TIMEOUT, SystemToolRunner};

use crate::release::Result;
use std::future::Future;
use std::path::PathBuf;

/// Capability to find and run external tools.
pub trait ToolRunner {
    /// Returns the resolved path of `tool`, or `None` when it is not installed.
    fn locate(&self, tool: &str) -> Option<PathBuf>;

    /// Runs the invocation to completion and returns its exit code and output.
    ///
    /// A nonzero exit is *not* an error at this level; callers decide via
    /// [`ToolOutput::into_checked`].
    fn run(&self, invocation: &ToolInvocation) -> impl Future<Output = Result<ToolOutput>>;

    /// Whether `tool` is available.
    fn has(&self, tool: &str) -> bool {
        self.locate(tool).is_some()
    }
}

impl<R: ToolRunner> ToolRunner for &R {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        (**self).locate(tool)
    }

    fn run(&self, invocation: &ToolInvocation) -> impl Future<Output = Result<ToolOutput>> {
        (**self).run(invocation)
    }
}
