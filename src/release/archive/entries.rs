//! The logical content of a release archive.

use crate::release::{Context, ReleaseContext, Result, error::ErrorExt};
use std::path::{Path, PathBuf};

/// Where an entry's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    /// An empty directory entry.
    Directory,
    /// Content read from disk at write time.
    File(PathBuf),
    /// Content synthesized in memory.
    Generated(Vec<u8>),
}

/// One archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Archive path, `/`-separated, no trailing slash.
    pub name: String,
    /// Content source.
    pub source: EntrySource,
}

impl ArchiveEntry {
    fn generated(name: &str, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.to_string(),
            source: EntrySource::Generated(data.into()),
        }
    }

    fn file(root: &Path, name: impl AsRef<Path>) -> Self {
        let name = name.as_ref();
        Self {
            name: archive_name(name),
            source: EntrySource::File(root.join(name)),
        }
    }
}

/// `/`-separated archive name for a relative path.
fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Pre-order listing of `tree` (itself included), named relative to `root`.
///
/// Siblings are sorted by file name so unchanged trees always list in the
/// same order. Entries that are neither directories nor files (for example
/// dangling symlinks) are skipped.
pub fn collect_tree(root: &Path, tree: &Path) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::new();
    for entry in walkdir::WalkDir::new(tree)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("{} is outside {}", entry.path().display(), root.display()))?;
        let name = archive_name(relative);

        if entry.file_type().is_dir() {
            entries.push(ArchiveEntry {
                name,
                source: EntrySource::Directory,
            });
        } else if entry.path().is_file() {
            entries.push(ArchiveEntry {
                name,
                source: EntrySource::File(entry.path().to_path_buf()),
            });
        } else {
            log::debug!("Skipping {}: not a regular file", entry.path().display());
        }
    }
    Ok(entries)
}

/// AUR data-path override; the AUR package keeps its data in `aur_data_path`.
fn aur_include(aur_data_path: &str) -> String {
    format!(
        "<?php\nfunction __get_custom_data_full_path()\n{{\n\treturn '{aur_data_path}';\n}}\n"
    )
}

/// Files appended after the source tree: passthrough files from the
/// repository root and entries that only exist in the archive.
pub fn release_extras(context: &ReleaseContext) -> Result<Vec<ArchiveEntry>> {
    let root = context.source_root();
    let layout = context.layout();
    let version = context.version().as_str();

    let mut extras = vec![
        ArchiveEntry::file(root, "data/.htaccess"),
        ArchiveEntry::generated("data/VERSION", version),
        ArchiveEntry::file(root, "data/README.md"),
    ];

    if context.options().aur {
        extras.push(ArchiveEntry::generated(
            "include.php",
            aur_include(&layout.aur_data_path),
        ));
    } else {
        extras.push(ArchiveEntry::file(root, &layout.include_file));
    }

    extras.push(ArchiveEntry::file(root, ".htaccess"));

    let index_path = context.path(&layout.index_file);
    let index = std::fs::read_to_string(&index_path).archive_context("reading", &index_path)?;
    extras.push(ArchiveEntry::generated(
        &archive_name(&layout.index_file),
        index.replace(&layout.placeholder_version, version),
    ));

    extras.push(ArchiveEntry::file(root, "README.md"));

    // Ships the development service worker rather than the minified build.
    let worker_path = context.path(&layout.serviceworker_source);
    let worker = std::fs::read(&worker_path).archive_context("reading", &worker_path)?;
    extras.push(ArchiveEntry::generated("serviceworker.js", worker));

    Ok(extras)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_is_listed_parent_first_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("snappymail/v/2.3.1");
        std::fs::create_dir_all(tree.join("b/inner")).unwrap();
        std::fs::create_dir_all(tree.join("a")).unwrap();
        std::fs::write(tree.join("b/inner/z.txt"), "z").unwrap();
        std::fs::write(tree.join("a/y.txt"), "y").unwrap();
        std::fs::write(tree.join("index.php"), "x").unwrap();

        let names: Vec<String> = collect_tree(dir.path(), &tree)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "snappymail/v/2.3.1",
                "snappymail/v/2.3.1/a",
                "snappymail/v/2.3.1/a/y.txt",
                "snappymail/v/2.3.1/b",
                "snappymail/v/2.3.1/b/inner",
                "snappymail/v/2.3.1/b/inner/z.txt",
                "snappymail/v/2.3.1/index.php",
            ]
        );
    }

    #[test]
    fn aur_include_returns_data_path() {
        let php = aur_include("/var/lib/snappymail");
        assert!(php.starts_with("<?php\n"));
        assert!(php.contains("return '/var/lib/snappymail';"));
    }
}
