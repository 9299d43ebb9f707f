//! Debian package and flat apt repository metadata.
//!
//! The `.deb` is assembled in process: an `ar` archive holding
//! `debian-binary`, `control.tar.gz` (`control`, `md5sums`) and
//! `data.tar.gz`, the latter being the release tarball re-rooted under the
//! install prefix. `Packages` and `Release` are written next to it so the
//! version directory can be served as an apt repository.

use crate::release::{DebianSettings, ReleaseContext, Result, builder::Digests};
use std::path::{Path, PathBuf};

/// Files produced by the Debian target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebianPackage {
    /// `<name>_<version>-<revision>_all.deb`
    pub deb: PathBuf,
    /// apt `Packages` index.
    pub packages: PathBuf,
    /// apt `Release` file, signed later into `InRelease`/`Release.gpg`.
    pub release: PathBuf,
}

/// Builds the `.deb`, `Packages` and `Release` from the gzipped release tarball.
#[cfg(target_os = "linux")]
pub async fn package(context: &ReleaseContext, tar_gz: &Path) -> Result<DebianPackage> {
    use crate::release::Error;

    let settings = context.config().debian.clone();
    let product = context.layout().product_name.clone();
    let version = context.version().to_string();
    let out_dir = context.release_dir();
    let tar_gz = tar_gz.to_path_buf();

    let package = tokio::task::spawn_blocking(move || {
        build::build_package(&settings, &product, &version, &tar_gz, &out_dir)
    })
    .await
    .map_err(|e| Error::Packaging {
        target: "Debian",
        reason: format!("packaging task panicked: {e}"),
    })??;

    log::info!("✓ Created {}", package.deb.display());
    Ok(package)
}

/// Debian packages are only assembled on Linux.
#[cfg(not(target_os = "linux"))]
pub async fn package(_context: &ReleaseContext, _tar_gz: &Path) -> Result<DebianPackage> {
    Err(crate::release::Error::Packaging {
        target: "Debian",
        reason: "Debian packages can only be built on Linux".into(),
    })
}

/// Full package version, `<upstream>-<revision>`.
pub fn package_version(settings: &DebianSettings, version: &str) -> String {
    format!("{}-{}", version, settings.revision)
}

/// File name of the `.deb`.
pub fn deb_file_name(settings: &DebianSettings, product: &str, version: &str) -> String {
    format!("{}_{}_all.deb", product, package_version(settings, version))
}

/// Renders the binary package `control` file.
pub fn render_control(
    settings: &DebianSettings,
    product: &str,
    version: &str,
    installed_kib: u64,
) -> String {
    let mut control = format!(
        "Package: {product}\n\
         Version: {}\n\
         Architecture: all\n\
         Maintainer: {}\n\
         Installed-Size: {installed_kib}\n",
        package_version(settings, version),
        settings.maintainer,
    );
    if !settings.depends.is_empty() {
        control.push_str(&format!("Depends: {}\n", settings.depends.join(", ")));
    }
    if !settings.recommends.is_empty() {
        control.push_str(&format!("Recommends: {}\n", settings.recommends.join(", ")));
    }
    control.push_str(&format!(
        "Section: {}\nPriority: {}\nHomepage: {}\nDescription: {}\n",
        settings.section, settings.priority, settings.homepage, settings.description
    ));
    control
}

/// Renders the `Packages` stanza for one `.deb`.
pub fn render_packages(control: &str, filename: &str, size: u64, digests: &Digests) -> String {
    format!(
        "{control}Filename: {filename}\nSize: {size}\nMD5sum: {}\nSHA1: {}\nSHA256: {}\n\n",
        digests.md5, digests.sha1, digests.sha256
    )
}

/// Renders the repository `Release` file covering `Packages`.
pub fn render_release(
    settings: &DebianSettings,
    date: &str,
    packages_size: u64,
    digests: &Digests,
) -> String {
    format!(
        "Origin: {origin}\n\
         Label: {origin}\n\
         Suite: {suite}\n\
         Codename: {suite}\n\
         Date: {date}\n\
         Architectures: all\n\
         Components: main\n\
         Description: {origin} packages\n\
         MD5Sum:\n {} {packages_size} Packages\n\
         SHA1:\n {} {packages_size} Packages\n\
         SHA256:\n {} {packages_size} Packages\n",
        digests.md5,
        digests.sha1,
        digests.sha256,
        origin = settings.origin,
        suite = settings.suite,
    )
}

#[cfg(target_os = "linux")]
mod build {
    use super::*;
    use crate::release::{builder::checksum::md5_hex, error::ErrorExt};
    use flate2::{Compression, read::GzDecoder, write::GzEncoder};
    use std::fs::File;
    use std::io::Read;

    const ENTRY_MTIME: u64 = 315_532_800;

    pub(super) fn build_package(
        settings: &DebianSettings,
        product: &str,
        version: &str,
        tar_gz: &Path,
        out_dir: &Path,
    ) -> Result<DebianPackage> {
        let (data, md5sums, installed_bytes) = data_archive(settings, tar_gz)?;
        let control = render_control(settings, product, version, installed_bytes.div_ceil(1024));
        let control_archive = control_archive(&control, &md5sums, tar_gz)?;

        let deb_name = deb_file_name(settings, product, version);
        let deb = out_dir.join(&deb_name);
        write_ar(
            &deb,
            &[
                ("debian-binary", b"2.0\n".as_slice()),
                ("control.tar.gz", control_archive.as_slice()),
                ("data.tar.gz", data.as_slice()),
            ],
        )?;

        let deb_bytes = std::fs::read(&deb).archive_context("reading", &deb)?;
        let packages_text = render_packages(
            &control,
            &deb_name,
            deb_bytes.len() as u64,
            &Digests::of(&deb_bytes),
        );
        let packages = out_dir.join("Packages");
        std::fs::write(&packages, &packages_text).fs_context("writing", &packages)?;

        let date = chrono::Utc::now().format("%a, %d %b %Y %H:%M:%S UTC").to_string();
        let release_text = render_release(
            settings,
            &date,
            packages_text.len() as u64,
            &Digests::of(packages_text.as_bytes()),
        );
        let release = out_dir.join("Release");
        std::fs::write(&release, release_text).fs_context("writing", &release)?;

        Ok(DebianPackage { deb, packages, release })
    }

    /// Re-roots the release tarball under the install prefix. Returns the
    /// gzipped tar, the `md5sums` listing and the installed byte count.
    fn data_archive(settings: &DebianSettings, tar_gz: &Path) -> Result<(Vec<u8>, String, u64)> {
        let prefix = settings.install_prefix.trim_matches('/');
        let file = File::open(tar_gz).archive_context("opening", tar_gz)?;
        let mut source = tar::Archive::new(GzDecoder::new(file));
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::best()));

        let mut parent = String::from(".");
        for component in prefix.split('/') {
            parent = format!("{parent}/{component}");
            let mut header = header(tar::EntryType::Directory, 0, 0o755);
            builder
                .append_data(&mut header, format!("{parent}/"), std::io::empty())
                .archive_context("adding directory", tar_gz)?;
        }

        let mut md5sums = String::new();
        let mut installed = 0u64;
        for entry in source.entries().archive_context("reading", tar_gz)? {
            let mut entry = entry.archive_context("reading entry", tar_gz)?;
            let name = entry
                .path()
                .archive_context("reading entry path", tar_gz)?
                .to_string_lossy()
                .trim_end_matches('/')
                .to_string();
            let target = format!("{prefix}/{name}");

            if entry.header().entry_type().is_dir() {
                let mut header = header(tar::EntryType::Directory, 0, 0o755);
                builder
                    .append_data(&mut header, format!("./{target}/"), std::io::empty())
                    .archive_context("adding directory", tar_gz)?;
                continue;
            }

            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .archive_context("reading entry", tar_gz)?;
            installed += data.len() as u64;
            md5sums.push_str(&format!("{}  {target}\n", md5_hex(&data)));

            let mut header = header(tar::EntryType::Regular, data.len() as u64, 0o644);
            builder
                .append_data(&mut header, format!("./{target}"), data.as_slice())
                .archive_context("adding file", tar_gz)?;
        }

        let data = builder
            .into_inner()
            .archive_context("finishing data.tar.gz", tar_gz)?
            .finish()
            .archive_context("finishing data.tar.gz", tar_gz)?;
        Ok((data, md5sums, installed))
    }

    fn control_archive(control: &str, md5sums: &str, tar_gz: &Path) -> Result<Vec<u8>> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::best()));
        for (name, text) in [("./control", control), ("./md5sums", md5sums)] {
            let mut header = header(tar::EntryType::Regular, text.len() as u64, 0o644);
            builder
                .append_data(&mut header, name, text.as_bytes())
                .archive_context("adding control file", tar_gz)?;
        }
        builder
            .into_inner()
            .archive_context("finishing control.tar.gz", tar_gz)?
            .finish()
            .archive_context("finishing control.tar.gz", tar_gz)
    }

    fn write_ar(path: &Path, members: &[(&str, &[u8])]) -> Result<()> {
        let file = File::create(path).archive_context("creating", path)?;
        let mut ar = ar::Builder::new(file);
        for (name, data) in members {
            let mut header = ar::Header::new(name.as_bytes().to_vec(), data.len() as u64);
            header.set_mode(0o100644);
            header.set_mtime(ENTRY_MTIME);
            ar.append(&header, *data)
                .archive_context(format!("adding {name}"), path)?;
        }
        Ok(())
    }

    fn header(kind: tar::EntryType, size: u64, mode: u32) -> tar::Header {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(kind);
        header.set_size(size);
        header.set_mode(mode);
        header.set_mtime(ENTRY_MTIME);
        header.set_uid(0);
        header.set_gid(0);
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_lists_dependencies_and_revision() {
        let control = render_control(&DebianSettings::default(), "snappymail", "2.3.1", 12);
        assert!(control.starts_with("Package: snappymail\nVersion: 2.3.1-1\nArchitecture: all\n"));
        assert!(control.contains("Installed-Size: 12\n"));
        assert!(
            control.contains("Depends: php (>= 7.4), php-curl, php-json, php-mbstring, php-xml\n")
        );
        assert!(control.ends_with("Description: modern PHP webmail client\n"));
    }

    #[test]
    fn release_covers_packages_with_all_digests() {
        let digests = Digests::of(b"abc");
        let release = render_release(
            &DebianSettings::default(),
            "Mon, 19 Oct 2026 00:00:00 UTC",
            3,
            &digests,
        );
        assert!(release.contains("MD5Sum:\n 900150983cd24fb0d6963f7d28e17f72 3 Packages\n"));
        assert!(release.contains("SHA1:\n a9993e364706816aba3e25717850c26c9cd0d89d 3 Packages\n"));
        assert!(release.contains(
            "SHA256:\n ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad 3 Packages\n"
        ));
    }

    #[test]
    fn deb_name_follows_debian_convention() {
        assert_eq!(
            deb_file_name(&DebianSettings::default(), "snappymail", "2.3.1"),
            "snappymail_2.3.1-1_all.deb"
        );
    }
}
