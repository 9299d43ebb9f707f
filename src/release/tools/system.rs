//! Process-backed [`ToolRunner`].

use super::{ToolInvocation, ToolOutput, ToolRunner};
use crate::release::{Error, Result};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Default timeout for a single tool invocation (30 minutes).
/// Front-end builds and image builds are the slow ones.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(1800);

/// Runs tools as child processes found through `PATH`.
#[derive(Debug, Clone)]
pub struct SystemToolRunner {
    default_timeout: Option<Duration>,
}

impl Default for SystemToolRunner {
    fn default() -> Self {
        Self::new(Some(DEFAULT_TOOL_TIMEOUT))
    }
}

impl SystemToolRunner {
    /// Creates a runner; `None` disables the timeout for invocations that do not set one.
    pub fn new(default_timeout: Option<Duration>) -> Self {
        Self { default_timeout }
    }
}

impl ToolRunner for SystemToolRunner {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        match which::which(tool) {
            Ok(path) => {
                log::debug!("Found {} at: {}", tool, path.display());
                Some(path)
            }
            Err(e) => {
                log::debug!("{} not found in PATH: {}", tool, e);
                None
            }
        }
    }

    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        let tool = invocation.program().to_string();
        let program = self.locate(&tool).ok_or_else(|| Error::ToolMissing {
            tool: tool.clone(),
            hint: format!("needed to run `{}`", invocation.display()),
        })?;

        log::debug!("Running: {}", invocation.display());

        let mut command = Command::new(&program);
        command
            .args(invocation.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = invocation.current_dir() {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|e| {
            Error::GenericError(format!("Failed to execute '{}': {}", tool, e))
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let collect = async {
            let (out, err) = tokio::join!(drain(stdout, &tool), drain(stderr, &tool));
            (out, err, child.wait().await)
        };

        let limit = invocation.timeout_limit().or(self.default_timeout);
        let finished = match limit {
            Some(limit) => tokio::time::timeout(limit, collect).await.ok(),
            None => Some(collect.await),
        };

        let Some((stdout, stderr, status)) = finished else {
            let secs = limit.map(|d| d.as_secs()).unwrap_or_default();
            log::warn!("{} timed out after {}s, terminating process...", tool, secs);
            if let Err(e) = child.kill().await {
                log::warn!("Failed to kill {}: {}", tool, e);
            }
            return Err(Error::ToolTimeout { tool, secs });
        };

        let status = status?;
        Ok(ToolOutput {
            code: status.code().unwrap_or(-1),
            stdout,
            stderr,
        })
    }
}

/// Reads a child stream line by line, echoing to the debug log.
async fn drain<R: AsyncRead + Unpin>(stream: Option<R>, tool: &str) -> String {
    let mut captured = String::new();
    if let Some(stream) = stream {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            log::debug!("[{}] {}", tool, line);
            captured.push_str(&line);
            captured.push('\n');
        }
    }
    captured
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let runner = SystemToolRunner::default();
        let output = runner
            .run(&ToolInvocation::new("sh").args(["-c", "echo hello; exit 3"]))
            .await
            .unwrap();
        assert_eq!(output.code, 3);
        assert_eq!(output.stdout.trim(), "hello");
        assert!(output.into_checked("sh").is_err());
    }

    #[tokio::test]
    async fn missing_tool_is_reported() {
        let runner = SystemToolRunner::default();
        let err = runner
            .run(&ToolInvocation::new("definitely-not-a-real-tool-xyz"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ToolMissing { .. }));
    }

    #[tokio::test]
    async fn slow_tool_times_out() {
        let runner = SystemToolRunner::default();
        let err = runner
            .run(
                &ToolInvocation::new("sleep")
                    .arg("5")
                    .timeout(Some(Duration::from_millis(100))),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ToolTimeout { .. }));
    }
}
