//! External tool availability checking.
//!
//! Required tools fail the stage that needs them; optional tools turn into a
//! warning and the dependent step is skipped.

use crate::release::{Error, Result, tools::ToolRunner};
use std::path::PathBuf;

/// Returns the path of a tool the current stage cannot do without.
pub fn require_tool<R: ToolRunner>(runner: &R, tool: &str, hint: &str) -> Result<PathBuf> {
    match runner.locate(tool) {
        Some(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            Ok(path)
        }
        None => Err(Error::ToolMissing {
            tool: tool.to_string(),
            hint: hint.to_string(),
        }),
    }
}

/// Looks up an optional tool, recording a warning when it is absent.
pub fn optional_tool<R: ToolRunner>(
    runner: &R,
    tool: &str,
    consequence: &str,
    warnings: &mut Vec<String>,
) -> Option<PathBuf> {
    let found = runner.locate(tool);
    if found.is_none() {
        let message = format!("{} not installed; {}", tool, consequence);
        log::warn!("{}", message);
        warnings.push(message);
    }
    found
}
