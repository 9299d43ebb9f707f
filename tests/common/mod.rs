//! Shared fixtures for integration tests.
#![allow(dead_code)]

use snappymail_release::release::{
    BuildOptions, ReleaseContextBuilder, ReleaseOrchestrator, Result,
    tools::{ToolInvocation, ToolOutput, ToolRunner},
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const VERSION: &str = "2.3.1";

pub const METADATA_FILES: &[&str] = &[
    "integrations/cloudron/Dockerfile",
    "integrations/cloudron/DESCRIPTION.md",
    ".docker/release/files/usr/local/include/application.ini",
    "integrations/nextcloud/snappymail/VERSION",
    "integrations/nextcloud/snappymail/appinfo/info.xml",
    "integrations/virtualmin/snappymail.pl",
];

const TREE: &[(&str, &str)] = &[
    ("package.json", r#"{"name": "snappymail", "version": "2.3.1"}"#),
    ("integrations/cloudron/Dockerfile", "FROM cloudron/base\nENV VERSION=2.2.0\n"),
    ("integrations/cloudron/DESCRIPTION.md", "<upstream>2.2.0</upstream>\n"),
    (
        ".docker/release/files/usr/local/include/application.ini",
        "[version]\ncurrent = \"2.2.0\"\n",
    ),
    ("integrations/nextcloud/snappymail/VERSION", "2.2.0"),
    (
        "integrations/nextcloud/snappymail/appinfo/info.xml",
        "<?xml version=\"1.0\"?>\n<info><version>2.2.0</version></info>\n",
    ),
    (
        "integrations/virtualmin/snappymail.pl",
        "sub script_snappymail_versions\n{\nreturn ( \"2.2.0\" );\n}\n",
    ),
    ("snappymail/v/0.0.0/app/handle.php", "<?php\n"),
    ("snappymail/v/0.0.0/app/libraries/RainLoop/Api.php", "<?php\nclass Api {}\n"),
    ("snappymail/v/0.0.0/static/js/app.js", "app();"),
    ("snappymail/v/0.0.0/static/js/boot.js", "boot();"),
    ("snappymail/v/0.0.0/static/js/min/app.min.js", "app()"),
    ("snappymail/v/0.0.0/static/js/min/boot.min.js", "boot()"),
    ("snappymail/v/0.0.0/static/css/app.css", "body{}"),
    ("snappymail/v/0.0.0/static/css/admin.css", "body{}"),
    ("data/.htaccess", "Require all denied\n"),
    ("data/README.md", "data\n"),
    ("_include.php", "<?php\n"),
    (".htaccess", "Options -Indexes\n"),
    ("index.php", "<?php\ndefine('APP_VERSION', '0.0.0');\n"),
    ("README.md", "# SnappyMail\n"),
    ("dev/serviceworker.js", "self.addEventListener('push', () => {});\n"),
    ("build/arch/snappymail.sysusers", "u snappymail - - /var/lib/snappymail\n"),
    ("build/arch/snappymail.tmpfiles", "d /var/lib/snappymail 0750 snappymail snappymail\n"),
    (
        "build/arch/PKGBUILD",
        "pkgname=snappymail\npkgver=2.2.0\npkgrel=1\n\
         b2sums=('old'\n        'old'\n        'old')\n",
    ),
];

/// A temporary SnappyMail source tree.
pub fn source_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, contents) in TREE {
        let path = dir.path().join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }
    dir
}

pub fn read(root: &Path, path: &str) -> String {
    std::fs::read_to_string(root.join(path)).unwrap()
}

pub fn orchestrator(
    root: &Path,
    options: BuildOptions,
    runner: StubRunner,
) -> ReleaseOrchestrator<StubRunner> {
    let context = ReleaseContextBuilder::new()
        .source_root(root)
        .version(VERSION)
        .options(options)
        .build()
        .unwrap();
    ReleaseOrchestrator::new(context, runner)
}

pub fn zip_names(path: &Path) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().trim_end_matches('/').to_string())
        .collect()
}

pub fn tar_gz_names(path: &Path) -> Vec<String> {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
    archive
        .entries()
        .unwrap()
        .map(|e| {
            e.unwrap()
                .path()
                .unwrap()
                .to_string_lossy()
                .trim_end_matches('/')
                .to_string()
        })
        .collect()
}

/// Records invocations and fakes the output files of compressors and gpg.
#[derive(Default)]
pub struct StubRunner {
    available: HashSet<String>,
    exit_codes: HashMap<String, i32>,
    calls: Mutex<Vec<ToolInvocation>>,
}

impl StubRunner {
    pub fn with_tools(tools: &[&str]) -> Self {
        Self {
            available: tools.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing(mut self, tool: &str, code: i32) -> Self {
        self.exit_codes.insert(tool.to_string(), code);
        self
    }

    pub fn calls_to(&self, tool: &str) -> Vec<ToolInvocation> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.program() == tool)
            .cloned()
            .collect()
    }
}

impl ToolRunner for StubRunner {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        self.available
            .contains(tool)
            .then(|| PathBuf::from("/usr/bin").join(tool))
    }

    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        self.calls.lock().unwrap().push(invocation.clone());
        let tool = invocation.program();
        if let Some(code) = self.exit_codes.get(tool) {
            return Ok(ToolOutput {
                code: *code,
                stdout: String::new(),
                stderr: format!("{tool}: simulated failure"),
            });
        }

        let args = invocation.arguments();
        match tool {
            "gzip" | "brotli" => {
                let ext = if tool == "gzip" { "gz" } else { "br" };
                for file in args.iter().filter(|a| !a.starts_with('-')) {
                    std::fs::write(format!("{file}.{ext}"), b"compressed")?;
                }
            }
            "gpg" => {
                let output = match args.iter().position(|a| a == "--output") {
                    Some(i) => args[i + 1].clone(),
                    None => format!("{}.asc", args[args.len() - 1]),
                };
                std::fs::write(output, b"-----BEGIN PGP SIGNATURE-----\n")?;
            }
            "b2sum" => {
                let file = &args[args.len() - 1];
                return Ok(ToolOutput::ok(format!("{} *{}\n", "0f".repeat(64), file)));
            }
            _ => {}
        }
        Ok(ToolOutput::ok(""))
    }
}
