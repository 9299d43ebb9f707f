//! In-memory tool runner for unit tests.

use super::{ToolInvocation, ToolOutput, ToolRunner};
use crate::release::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Records invocations and emulates the side effects of the tools the
/// pipeline relies on (compressed siblings, `.asc` files, b2sum output).
#[derive(Default)]
pub(crate) struct FakeRunner {
    available: HashSet<String>,
    exit_codes: HashMap<String, i32>,
    calls: Mutex<Vec<ToolInvocation>>,
}

impl FakeRunner {
    pub(crate) fn with_tools(tools: &[&str]) -> Self {
        Self {
            available: tools.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    pub(crate) fn failing(mut self, tool: &str, code: i32) -> Self {
        self.exit_codes.insert(tool.to_string(), code);
        self
    }

    pub(crate) fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_to(&self, tool: &str) -> Vec<ToolInvocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.program() == tool)
            .collect()
    }
}

impl ToolRunner for FakeRunner {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        self.available
            .contains(tool)
            .then(|| PathBuf::from(format!("/usr/bin/{tool}")))
    }

    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        let tool = invocation.program();
        if !self.available.contains(tool) {
            return Err(Error::ToolMissing {
                tool: tool.to_string(),
                hint: "not installed in test".into(),
            });
        }
        self.calls.lock().unwrap().push(invocation.clone());

        if let Some(code) = self.exit_codes.get(tool) {
            return Ok(ToolOutput {
                code: *code,
                stdout: String::new(),
                stderr: format!("{tool} failed"),
            });
        }
        emulate(invocation)
    }
}

fn emulate(invocation: &ToolInvocation) -> Result<ToolOutput> {
    let files = invocation
        .arguments()
        .iter()
        .filter(|a| !a.starts_with('-'))
        .map(PathBuf::from);
    match invocation.program() {
        "gzip" | "brotli" => {
            let ext = if invocation.program() == "gzip" { "gz" } else { "br" };
            for file in files {
                std::fs::write(sibling(&file, ext), b"compressed")?;
            }
            Ok(ToolOutput::ok(""))
        }
        "gpg" => {
            let args = invocation.arguments();
            let output = args
                .iter()
                .position(|a| a == "--output")
                .and_then(|i| args.get(i + 1))
                .map(PathBuf::from);
            let target = PathBuf::from(args.last().cloned().unwrap_or_default());
            let output = output.unwrap_or_else(|| sibling(&target, "asc"));
            std::fs::write(output, b"-----BEGIN PGP SIGNATURE-----\n")?;
            Ok(ToolOutput::ok(""))
        }
        "b2sum" => {
            let file = invocation.arguments().last().cloned().unwrap_or_default();
            Ok(ToolOutput::ok(format!("{} *{}\n", "ab".repeat(64), file)))
        }
        _ => Ok(ToolOutput::ok("")),
    }
}

fn sibling(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
