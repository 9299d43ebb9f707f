//! Main release orchestration.
//!
//! [`ReleaseOrchestrator`] owns the [`ReleaseContext`] for one run and walks
//! the stages in order. The first failing stage aborts the run; the version
//! directory rename is undone by its guard whatever happens.

use super::{
    checksum::{Checksum, DigestAlgorithm},
    signing::{ChecksumSigner, SignatureFile},
    tool_detection::require_tool,
};
use crate::release::{
    Error, PackageTarget, ReleaseContext, ReleaseVersion, Result,
    archive::{ArchiveArtifacts, ArchiveBuilder},
    compress::{AssetCompressor, CompressionReport},
    descriptor::ReleaseDescriptor,
    platform::{ArchPackage, DebianPackage, DockerImage, arch, debian, docker},
    propagate::VersionPropagator,
    tools::{ToolInvocation, ToolRunner},
};
use std::fmt;
use std::path::PathBuf;

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStage {
    /// Option validation.
    Init,
    /// Rewriting version metadata.
    PropagateVersion,
    /// External plugin packager.
    Plugins,
    /// Front-end build tool.
    Build,
    /// gzip/brotli siblings of static assets.
    Compress,
    /// zip, tar.gz and descriptor.
    Archive,
    /// One packaging target.
    Package(PackageTarget),
    /// Checksums and signatures.
    Sign,
    /// Finished.
    Done,
    /// Aborted by an error.
    Failed,
}

impl fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseStage::Init => f.write_str("init"),
            ReleaseStage::PropagateVersion => f.write_str("propagate version"),
            ReleaseStage::Plugins => f.write_str("plugins"),
            ReleaseStage::Build => f.write_str("build"),
            ReleaseStage::Compress => f.write_str("compress"),
            ReleaseStage::Archive => f.write_str("archive"),
            ReleaseStage::Package(target) => write!(f, "package ({target})"),
            ReleaseStage::Sign => f.write_str("sign"),
            ReleaseStage::Done => f.write_str("done"),
            ReleaseStage::Failed => f.write_str("failed"),
        }
    }
}

/// Output of the packaging targets that ran.
#[derive(Debug, Default)]
pub struct PackageFiles {
    /// AUR metadata.
    pub arch: Option<ArchPackage>,
    /// Debian package and repository metadata.
    pub debian: Option<DebianPackage>,
    /// Docker image; `None` also when docker was not installed.
    pub docker: Option<DockerImage>,
}

/// Everything a full release run produced.
#[derive(Debug)]
pub struct ReleaseReport {
    /// Released version.
    pub version: ReleaseVersion,
    /// Metadata files whose content changed.
    pub propagated: Vec<PathBuf>,
    /// `None` when the build and compression were skipped.
    pub compression: Option<CompressionReport>,
    /// zip and tar.gz.
    pub archives: ArchiveArtifacts,
    /// Written `core.json`.
    pub descriptor: PathBuf,
    /// Packaging target output.
    pub packages: PackageFiles,
    /// SHA-256 of the archives.
    pub checksums: Vec<Checksum>,
    /// Signatures written.
    pub signatures: Vec<SignatureFile>,
    /// Signing failures; the artifacts themselves are intact.
    pub signing_errors: Vec<Error>,
    /// Non-fatal conditions, such as a missing optional tool.
    pub warnings: Vec<String>,
}

impl ReleaseReport {
    /// True when no signing error was recorded.
    pub fn fully_signed(&self) -> bool {
        self.signing_errors.is_empty()
    }
}

/// How a successful run ended.
#[derive(Debug)]
pub enum ReleaseOutcome {
    /// `--set-version`: metadata rewritten, nothing built.
    VersionSet {
        /// Propagated version.
        version: ReleaseVersion,
        /// Metadata files whose content changed.
        propagated: Vec<PathBuf>,
    },
    /// Full release.
    Released(Box<ReleaseReport>),
}

/// Sequences the release stages.
///
/// ```text
/// Init -> PropagateVersion -> (stop if set-version) -> Plugins -> Build
///      -> Compress -> Archive -> Package{Arch|Debian, Docker} -> Sign -> Done
/// ```
pub struct ReleaseOrchestrator<R: ToolRunner> {
    context: ReleaseContext,
    runner: R,
}

impl<R: ToolRunner> fmt::Debug for ReleaseOrchestrator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseOrchestrator")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl<R: ToolRunner> ReleaseOrchestrator<R> {
    /// Creates an orchestrator for one run.
    pub fn new(context: ReleaseContext, runner: R) -> Self {
        Self { context, runner }
    }

    /// The run's context.
    pub fn context(&self) -> &ReleaseContext {
        &self.context
    }

    /// The tool runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs every stage selected by the build options.
    ///
    /// # Errors
    ///
    /// The error of the first failing stage. Signing errors are not
    /// returned here; they are collected in [`ReleaseReport::signing_errors`].
    pub async fn run(&self) -> Result<ReleaseOutcome> {
        let mut stage = ReleaseStage::Init;
        let result = self.run_stages(&mut stage).await;
        if let Err(e) = &result {
            log::error!("Release failed during {} stage: {}", stage, e);
            enter(&mut stage, ReleaseStage::Failed);
        }
        result
    }

    async fn run_stages(&self, stage: &mut ReleaseStage) -> Result<ReleaseOutcome> {
        let context = &self.context;
        let options = context.options();
        options.validate()?;

        enter(stage, ReleaseStage::PropagateVersion);
        let propagated = self.propagate_version().await?;
        if options.set_version_only {
            enter(stage, ReleaseStage::Done);
            return Ok(ReleaseOutcome::VersionSet {
                version: context.version().clone(),
                propagated,
            });
        }

        let mut warnings = Vec::new();
        ArchiveBuilder::new(context).remove_stale().await?;

        if options.plugins {
            enter(stage, ReleaseStage::Plugins);
            self.package_plugins().await?;
        }

        let compression = if options.skip_compress {
            log::info!("Skipping front-end build and asset compression");
            None
        } else {
            enter(stage, ReleaseStage::Build);
            self.run_build_tool().await?;

            enter(stage, ReleaseStage::Compress);
            let report = AssetCompressor::new(&self.runner)
                .timeout(context.config().tools.timeout())
                .required(context.config().compression.required)
                .compress(&context.layout().static_assets_dir(context.source_root()))
                .await?;
            warnings.extend(report.warnings.iter().cloned());
            Some(report)
        };

        enter(stage, ReleaseStage::Archive);
        let archives = ArchiveBuilder::new(context).build().await?;
        let descriptor = ReleaseDescriptor::for_release(context).write(context).await?;

        let mut packages = PackageFiles::default();
        for target in options.package_targets() {
            enter(stage, ReleaseStage::Package(target));
            match target {
                PackageTarget::Arch => {
                    let tar_gz = &archives.tar_gz.path;
                    packages.arch =
                        Some(arch::package(context, &self.runner, tar_gz, &mut warnings).await?);
                }
                PackageTarget::Debian => {
                    packages.debian = Some(debian::package(context, &archives.tar_gz.path).await?);
                }
                PackageTarget::Docker => {
                    let zip = &archives.zip.path;
                    packages.docker =
                        docker::package(context, &self.runner, zip, &mut warnings).await?;
                }
            }
        }

        enter(stage, ReleaseStage::Sign);
        let signer = ChecksumSigner::new(&self.runner, &context.config().signing.key)
            .timeout(context.config().tools.timeout());
        let artifacts = vec![archives.tar_gz.path.clone(), archives.zip.path.clone()];
        let checksums = signer.digest(&artifacts, DigestAlgorithm::Sha256).await?;
        let (signatures, signing_errors) = if options.sign {
            sign_artifacts(&signer, &artifacts, &packages).await
        } else {
            (Vec::new(), Vec::new())
        };

        enter(stage, ReleaseStage::Done);
        Ok(ReleaseOutcome::Released(Box::new(ReleaseReport {
            version: context.version().clone(),
            propagated,
            compression,
            archives,
            descriptor,
            packages,
            checksums,
            signatures,
            signing_errors,
            warnings,
        })))
    }

    /// Rewrites every metadata file; any failure is fatal.
    async fn propagate_version(&self) -> Result<Vec<PathBuf>> {
        let version = self.context.version();
        let outcomes = VersionPropagator::default()
            .propagate(self.context.source_root(), version)
            .await;

        let mut changed = Vec::new();
        for outcome in outcomes {
            if outcome.result? {
                changed.push(outcome.path);
            }
        }
        Ok(changed)
    }

    async fn package_plugins(&self) -> Result<()> {
        let Some((program, args)) = self.context.config().tools.plugins_command.split_first() else {
            log::warn!("No plugin packager configured, skipping plugins");
            return Ok(());
        };
        require_tool(&self.runner, program, "it runs the plugin packager for --plugins")?;

        let invocation = ToolInvocation::new(program)
            .args(args)
            .dir(self.context.source_root())
            .timeout(self.context.config().tools.timeout());
        log::info!("Packaging plugins: {}", invocation.display());
        self.runner.run(&invocation).await?.into_checked(program)?;
        Ok(())
    }

    async fn run_build_tool(&self) -> Result<()> {
        let tool = &self.context.config().tools.build_tool;
        require_tool(&self.runner, tool, "install it with `npm install --global gulp-cli`")?;

        let invocation = ToolInvocation::new(tool)
            .dir(self.context.source_root())
            .timeout(self.context.config().tools.timeout());
        log::info!("Running {}", invocation.display());
        self.runner.run(&invocation).await?.into_checked(tool)?;
        Ok(())
    }
}

fn enter(stage: &mut ReleaseStage, next: ReleaseStage) {
    log::debug!("Stage: {} -> {}", stage, next);
    *stage = next;
}

/// Signs the archives and, for Debian, the package and repository files.
/// Failures are collected instead of aborting.
async fn sign_artifacts<R: ToolRunner>(
    signer: &ChecksumSigner<'_, R>,
    artifacts: &[PathBuf],
    packages: &PackageFiles,
) -> (Vec<SignatureFile>, Vec<Error>) {
    let mut signatures = Vec::new();
    let mut errors = Vec::new();

    for artifact in artifacts {
        record(signer.sign(artifact).await, &mut signatures, &mut errors);
    }
    if let Some(deb) = &packages.debian {
        record(signer.sign(&deb.deb).await, &mut signatures, &mut errors);
        record(
            signer.clearsign(&deb.release, &deb.release.with_file_name("InRelease")).await,
            &mut signatures,
            &mut errors,
        );
        record(
            signer
                .sign_detached_to(&deb.release, &deb.release.with_file_name("Release.gpg"))
                .await,
            &mut signatures,
            &mut errors,
        );
    }

    (signatures, errors)
}

fn record(
    result: Result<SignatureFile>,
    signatures: &mut Vec<SignatureFile>,
    errors: &mut Vec<Error>,
) {
    match result {
        Ok(signature) => signatures.push(signature),
        Err(e) => {
            log::warn!("{}", e);
            errors.push(e);
        }
    }
}
