mod common;

use assert_cmd::Command;
use common::{VERSION, read, source_tree};
use predicates::prelude::*;

fn release_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("snappymail_release"))
}

#[test]
fn help_lists_release_flags() {
    release_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--set-version"))
        .stdout(predicate::str::contains("--skip-gulp"))
        .stdout(predicate::str::contains("--debian"));
}

#[test]
fn aur_and_debian_together_are_rejected() {
    let dir = source_tree();
    release_cmd()
        .arg("--source")
        .arg(dir.path())
        .args(["--aur", "--debian"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));

    assert_eq!(read(dir.path(), "integrations/nextcloud/snappymail/VERSION"), "2.2.0");
}

#[test]
fn set_version_only_rewrites_metadata() {
    let dir = source_tree();
    release_cmd()
        .arg("--source")
        .arg(dir.path())
        .arg("--set-version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Version set to 2.3.1"));

    assert_eq!(read(dir.path(), "integrations/nextcloud/snappymail/VERSION"), VERSION);
    assert!(!dir.path().join("build/dist").exists());
}

#[test]
fn skip_gulp_release_needs_no_external_tools() {
    let dir = source_tree();
    release_cmd()
        .arg("--source")
        .arg(dir.path())
        .arg("--skip-gulp")
        .env("PATH", "")
        .assert()
        .success()
        .stdout(predicate::str::contains("snappymail-2.3.1.zip"));

    let release_dir = dir.path().join("build/dist/releases/webmail/2.3.1");
    assert!(release_dir.join("snappymail-2.3.1.tar.gz").is_file());
    assert!(release_dir.join("core.json").is_file());
    assert!(dir.path().join("snappymail/v/0.0.0").is_dir());
}

#[test]
fn invalid_config_fails_with_context() {
    let dir = source_tree();
    std::fs::write(dir.path().join("release.toml"), "[tools]\nunknown = 1\n").unwrap();

    release_cmd()
        .arg("--source")
        .arg(dir.path())
        .arg("--set-version")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn missing_build_tool_exits_with_hint() {
    let dir = source_tree();
    release_cmd()
        .arg("--source")
        .arg(dir.path())
        .env("PATH", "")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("gulp"));
}
