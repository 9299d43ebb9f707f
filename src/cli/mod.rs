//! Command line interface for the SnappyMail release packager.
//!
//! Parses arguments, loads `release.toml`, runs the
//! [`ReleaseOrchestrator`] and reports the outcome.

mod args;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::error::{CliError, Result};
use crate::release::{
    Error, ReleaseConfig, ReleaseContextBuilder, ReleaseOrchestrator, ReleaseOutcome, ReleaseReport,
    tools::SystemToolRunner,
};
use anyhow::Context as _;

/// Main CLI entry point. Returns the process exit code.
pub async fn run(args: Args) -> Result<i32> {
    let output = OutputManager::new(args.verbose, args.quiet);

    let config = match &args.config {
        Some(path) => ReleaseConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => {
            let path = args.source.join("release.toml");
            ReleaseConfig::load_or_default(&path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
    };

    let mut builder = ReleaseContextBuilder::new()
        .source_root(&args.source)
        .options(args.build_options())
        .config(config);
    if let Some(version) = &args.release_version {
        builder = builder.version(version);
    }
    let context = builder.build()?;

    output.section(&format!(
        "Releasing {} {}",
        context.layout().product_name,
        context.version()
    ))?;

    let build_tool = context.config().tools.build_tool.clone();
    let signing_required = context.config().signing.required;
    let runner = SystemToolRunner::new(context.config().tools.timeout());

    let outcome = match ReleaseOrchestrator::new(context, runner).run().await {
        Ok(outcome) => outcome,
        Err(Error::ToolFailed { tool, code, stderr }) if tool == build_tool && code > 0 => {
            output.error(&format!("{tool} failed with exit code {code}"))?;
            if !stderr.is_empty() {
                output.indent(&stderr)?;
            }
            return Ok(code);
        }
        Err(e) => return Err(e.into()),
    };

    match outcome {
        ReleaseOutcome::VersionSet {
            version,
            propagated,
        } => {
            output.success(&format!("Version set to {version}"))?;
            for path in &propagated {
                output.indent(&path.display().to_string())?;
            }
            Ok(0)
        }
        ReleaseOutcome::Released(report) => {
            print_report(&output, &report)?;
            if signing_required && !report.fully_signed() {
                return Err(CliError::SigningRequired {
                    failed: report.signing_errors.len(),
                }
                .into());
            }
            Ok(0)
        }
    }
}

fn print_report(output: &OutputManager, report: &ReleaseReport) -> std::io::Result<()> {
    if !report.propagated.is_empty() {
        output.progress(&format!(
            "Version {} written to {} metadata file(s)",
            report.version,
            report.propagated.len()
        ))?;
    }
    if let Some(compression) = &report.compression {
        output.progress(&format!(
            "Compressed {} asset file(s)",
            compression.produced.len()
        ))?;
    }

    output.section("Artifacts")?;
    for archive in [&report.archives.zip, &report.archives.tar_gz] {
        output.success(&format!(
            "{} ({} entries)",
            archive.path.display(),
            archive.entries.len()
        ))?;
    }
    output.success(&report.descriptor.display().to_string())?;

    if let Some(arch) = &report.packages.arch {
        output.success(&arch.srcinfo.display().to_string())?;
        if let Some(pkgbuild) = &arch.pkgbuild {
            output.success(&pkgbuild.display().to_string())?;
        }
    }
    if let Some(debian) = &report.packages.debian {
        for path in [&debian.deb, &debian.packages, &debian.release] {
            output.success(&path.display().to_string())?;
        }
    }
    if let Some(image) = &report.packages.docker {
        output.success(&format!("docker image {}", image.tag))?;
    }
    for signature in &report.signatures {
        output.success(&signature.signature.display().to_string())?;
    }
    for checksum in &report.checksums {
        output.verbose(&format!("sha256 {}  {}", checksum.hex, checksum.path.display()))?;
    }

    for warning in &report.warnings {
        output.warn(warning)?;
    }
    for error in &report.signing_errors {
        output.warn(&error.to_string())?;
    }
    Ok(())
}
