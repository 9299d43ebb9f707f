//! Arch User Repository packaging metadata.
//!
//! Writes `.SRCINFO` and updates `pkgver`/`b2sums` in `PKGBUILD`. BLAKE2b
//! digests come from `b2sum`; without it the digest list is empty and a
//! warning is recorded.

use crate::release::{
    ArchSettings, ReleaseContext, Result,
    builder::{DigestAlgorithm, checksum::digest_files, tool_detection::optional_tool},
    error::ErrorExt,
    tools::ToolRunner,
    utils::fs::write_if_changed,
};
use regex::{NoExpand, Regex};
use std::path::{Path, PathBuf};

/// Files written for the AUR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchPackage {
    /// Generated `.SRCINFO`.
    pub srcinfo: PathBuf,
    /// Updated `PKGBUILD`, if one exists.
    pub pkgbuild: Option<PathBuf>,
    /// BLAKE2b digests in source order.
    pub b2sums: Vec<String>,
}

/// Produces AUR metadata for the gzipped release tarball.
pub async fn package<R: ToolRunner>(
    context: &ReleaseContext,
    runner: &R,
    tar_gz: &Path,
    warnings: &mut Vec<String>,
) -> Result<ArchPackage> {
    let settings = &context.config().arch;
    let arch_dir = context.path(&settings.dir);
    let timeout = context.config().tools.timeout();

    let b2sums = if optional_tool(runner, "b2sum", "AUR b2sums left empty", warnings).is_some() {
        let mut sources = vec![tar_gz.to_path_buf()];
        sources.extend(settings.sources.iter().map(|s| arch_dir.join(s)));
        digest_files(runner, &sources, DigestAlgorithm::Blake2b, timeout)
            .await?
            .into_iter()
            .map(|c| c.hex)
            .collect()
    } else {
        Vec::new()
    };

    let version = context.version().as_str();
    let product = &context.layout().product_name;

    let srcinfo = arch_dir.join(".SRCINFO");
    write_if_changed(&srcinfo, &render_srcinfo(settings, product, version, &b2sums)).await?;
    log::info!("✓ Wrote {}", srcinfo.display());

    let pkgbuild_path = arch_dir.join("PKGBUILD");
    let pkgbuild = if pkgbuild_path.is_file() {
        let text = tokio::fs::read_to_string(&pkgbuild_path)
            .await
            .fs_context("reading", &pkgbuild_path)?;
        write_if_changed(&pkgbuild_path, &update_pkgbuild(&text, version, &b2sums)?).await?;
        log::info!("✓ Updated {}", pkgbuild_path.display());
        Some(pkgbuild_path)
    } else {
        log::debug!("No PKGBUILD at {}", pkgbuild_path.display());
        None
    };

    Ok(ArchPackage {
        srcinfo,
        pkgbuild,
        b2sums,
    })
}

/// Renders `.SRCINFO`.
pub fn render_srcinfo(
    settings: &ArchSettings,
    product: &str,
    version: &str,
    b2sums: &[String],
) -> String {
    let mut lines = vec![
        format!("pkgbase = {product}"),
        format!("\tpkgdesc = {}", settings.pkgdesc),
        format!("\tpkgver = {version}"),
        "\tpkgrel = 1".to_string(),
        format!("\turl = {}", settings.url),
        "\tarch = any".to_string(),
        format!("\tlicense = {}", settings.license),
    ];
    lines.extend(settings.makedepends.iter().map(|d| format!("\tmakedepends = {d}")));
    lines.extend(settings.depends.iter().map(|d| format!("\tdepends = {d}")));
    lines.extend(settings.optdepends.iter().map(|d| format!("\toptdepends = {d}")));
    lines.push(format!(
        "\tsource = {product}-{version}.tar.gz::{}/archive/v{version}.tar.gz",
        settings.url
    ));
    lines.extend(settings.sources.iter().map(|s| format!("\tsource = {s}")));
    lines.extend(b2sums.iter().map(|b| format!("\tb2sums = {b}")));
    lines.push(String::new());
    lines.push(format!("pkgname = {product}"));
    lines.push(String::new());
    lines.join("\n")
}

/// Sets `pkgver=` and replaces the `b2sums=(...)` array.
pub fn update_pkgbuild(text: &str, version: &str, b2sums: &[String]) -> Result<String> {
    let pkgver = Regex::new(r"pkgver=[0-9.]+")?;
    let sums = Regex::new(r"(?s)b2sums=\([^)]*\)")?;

    let text = pkgver.replace_all(text, NoExpand(&format!("pkgver={version}")));
    let quoted: Vec<String> = b2sums.iter().map(|b| format!("'{b}'")).collect();
    let array = format!("b2sums=({})", quoted.join("\n        "));
    Ok(sums.replace_all(&text, NoExpand(&array)).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srcinfo_lists_version_sources_and_sums() {
        let srcinfo = render_srcinfo(
            &ArchSettings::default(),
            "snappymail",
            "2.3.1",
            &["aa".to_string(), "bb".to_string(), "cc".to_string()],
        );
        assert!(
            srcinfo.starts_with("pkgbase = snappymail\n\tpkgdesc = modern PHP webmail client\n")
        );
        assert!(srcinfo.contains("\tpkgver = 2.3.1\n"));
        assert!(srcinfo.contains(
            "\tsource = snappymail-2.3.1.tar.gz::https://github.com/the-djmaze/snappymail/archive/v2.3.1.tar.gz\n"
        ));
        assert!(srcinfo.contains(
            "\tsource = snappymail.tmpfiles\n\tb2sums = aa\n\tb2sums = bb\n\tb2sums = cc\n"
        ));
        assert!(srcinfo.ends_with("\npkgname = snappymail\n"));
    }

    #[test]
    fn pkgbuild_gets_new_version_and_sums() {
        let pkgbuild = "pkgname=snappymail\npkgver=2.2.0\npkgrel=1\n\
                        b2sums=('old1'\n        'old2')\npackage() {}\n";
        let updated = update_pkgbuild(pkgbuild, "2.3.1", &["n1".into(), "n2".into()]).unwrap();
        assert_eq!(
            updated,
            "pkgname=snappymail\npkgver=2.3.1\npkgrel=1\n\
             b2sums=('n1'\n        'n2')\npackage() {}\n"
        );
        // rerunning is stable
        assert_eq!(
            update_pkgbuild(&updated, "2.3.1", &["n1".into(), "n2".into()]).unwrap(),
            updated
        );
    }
}
