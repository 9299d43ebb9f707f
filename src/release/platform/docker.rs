//! Docker image from the release zip.

use crate::release::{
    Context, Error, ReleaseContext, Result,
    builder::tool_detection::optional_tool,
    tools::{ToolInvocation, ToolRunner},
    utils::fs::copy_file,
};
use std::path::{Path, PathBuf};

/// A built image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerImage {
    /// `<image>:<version>`
    pub tag: String,
    /// Zip copied into the build context.
    pub context_zip: PathBuf,
}

/// Copies `zip` into the Docker build context and builds the image.
///
/// Returns `Ok(None)` when docker is not installed; the zip is still copied
/// so the context can be built elsewhere.
pub async fn package<R: ToolRunner>(
    context: &ReleaseContext,
    runner: &R,
    zip: &Path,
    warnings: &mut Vec<String>,
) -> Result<Option<DockerImage>> {
    let settings = &context.config().docker;
    let build_context = context.path(&settings.context);
    let zip_name = zip
        .file_name()
        .with_context(|| format!("{} has no file name", zip.display()))?;
    let context_zip = build_context.join(zip_name);

    copy_file(zip, &context_zip).await?;
    log::info!("Copied {} into {}", zip.display(), build_context.display());

    if optional_tool(runner, "docker", "Docker image not built", warnings).is_none() {
        return Ok(None);
    }

    let tag = format!("{}:{}", settings.image, context.version());
    let invocation = ToolInvocation::new("docker")
        .arg("build")
        .arg_path(&build_context)
        .arg("--build-arg")
        .arg(format!("FILES_ZIP={}", zip_name.to_string_lossy()))
        .args(["-t", tag.as_str()])
        .dir(context.source_root())
        .timeout(context.config().tools.timeout());

    let output = runner.run(&invocation).await.map_err(|e| Error::Packaging {
        target: "Docker",
        reason: e.to_string(),
    })?;
    if !output.success() {
        return Err(Error::Packaging {
            target: "Docker",
            reason: format!(
                "docker build exited with code {}: {}",
                output.code,
                output.stderr.trim()
            ),
        });
    }

    log::info!("✓ Built Docker image {}", tag);
    Ok(Some(DockerImage { tag, context_zip }))
}
