//! Zip and tar.gz writers fed from one entry list.
//!
//! Blocking code; run it inside `spawn_blocking`.

use super::entries::{ArchiveEntry, EntrySource};
use crate::release::{Result, error::ErrorExt, utils::fs::remove_file_if_exists_sync};
use flate2::{Compression, write::GzEncoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

/// Fixed timestamp for every entry: 1980-01-01T00:00:00Z, the zip epoch.
const ENTRY_MTIME: u64 = 315_532_800;

const FILE_MODE: u32 = 0o644;
const DIR_MODE: u32 = 0o755;

/// Writes `entries` in order into a new zip at `zip_path` and a new tar at
/// `tar_path`. Returns the entry names written, identical for both.
pub fn write_archives(
    entries: &[ArchiveEntry],
    zip_path: &Path,
    tar_path: &Path,
) -> Result<Vec<String>> {
    let zip_file = File::create(zip_path).archive_context("creating", zip_path)?;
    let tar_file = File::create(tar_path).archive_context("creating", tar_path)?;

    let mut zip = zip::ZipWriter::new(BufWriter::new(zip_file));
    let mut tar = tar::Builder::new(BufWriter::new(tar_file));
    tar.mode(tar::HeaderMode::Deterministic);

    let file_options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(FILE_MODE);
    let dir_options = file_options.unix_permissions(DIR_MODE);

    let mut names = Vec::with_capacity(entries.len());
    for entry in entries {
        match &entry.source {
            EntrySource::Directory => {
                zip.add_directory(entry.name.as_str(), dir_options)?;
                let mut header = header(tar::EntryType::Directory, 0, DIR_MODE);
                tar.append_data(&mut header, format!("{}/", entry.name), std::io::empty())
                    .archive_context("adding directory", tar_path)?;
            }
            EntrySource::File(path) => {
                let data = std::fs::read(path).archive_context("reading", path)?;
                append_file(
                    &mut zip,
                    &mut tar,
                    &entry.name,
                    &data,
                    file_options,
                    zip_path,
                    tar_path,
                )?;
            }
            EntrySource::Generated(data) => {
                append_file(
                    &mut zip,
                    &mut tar,
                    &entry.name,
                    data,
                    file_options,
                    zip_path,
                    tar_path,
                )?;
            }
        }
        names.push(entry.name.clone());
    }

    zip.finish()?
        .flush()
        .archive_context("finishing", zip_path)?;
    tar.into_inner()
        .archive_context("finishing", tar_path)?
        .flush()
        .archive_context("finishing", tar_path)?;

    Ok(names)
}

fn append_file<Z: std::io::Write + std::io::Seek, T: std::io::Write>(
    zip: &mut zip::ZipWriter<Z>,
    tar: &mut tar::Builder<T>,
    name: &str,
    data: &[u8],
    options: SimpleFileOptions,
    zip_path: &Path,
    tar_path: &Path,
) -> Result<()> {
    zip.start_file(name, options)?;
    zip.write_all(data).archive_context("writing", zip_path)?;

    let mut header = header(tar::EntryType::Regular, data.len() as u64, FILE_MODE);
    tar.append_data(&mut header, name, data)
        .archive_context("adding file", tar_path)?;
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

/// Compresses `tar_path` into `tar_gz_path` with best compression and
/// removes the uncompressed tar.
pub fn gzip_tar(tar_path: &Path, tar_gz_path: &Path) -> Result<()> {
    let mut input = File::open(tar_path).archive_context("opening", tar_path)?;
    let output = File::create(tar_gz_path).archive_context("creating", tar_gz_path)?;

    let mut encoder = GzEncoder::new(BufWriter::new(output), Compression::best());
    std::io::copy(&mut input, &mut encoder).archive_context("compressing", tar_gz_path)?;
    encoder
        .finish()
        .archive_context("finishing", tar_gz_path)?
        .flush()
        .archive_context("finishing", tar_gz_path)?;

    drop(input);
    remove_file_if_exists_sync(tar_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn zip_and_tar_hold_the_same_entries_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let on_disk = dir.path().join("a.txt");
        std::fs::write(&on_disk, "from disk").unwrap();
        let entries = vec![
            ArchiveEntry {
                name: "snappymail".into(),
                source: EntrySource::Directory,
            },
            ArchiveEntry {
                name: "snappymail/a.txt".into(),
                source: EntrySource::File(on_disk),
            },
            ArchiveEntry {
                name: "data/VERSION".into(),
                source: EntrySource::Generated(b"2.3.1".to_vec()),
            },
        ];
        let zip_path = dir.path().join("out.zip");
        let tar_path = dir.path().join("out.tar");
        let tar_gz_path = dir.path().join("out.tar.gz");

        write_archives(&entries, &zip_path, &tar_path).unwrap();
        gzip_tar(&tar_path, &tar_gz_path).unwrap();
        assert!(!tar_path.exists());

        let mut zip = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let zip_names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().trim_end_matches('/').to_string())
            .collect();
        let mut version = String::new();
        zip.by_name("data/VERSION")
            .unwrap()
            .read_to_string(&mut version)
            .unwrap();
        assert_eq!(version, "2.3.1");

        let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(
            File::open(&tar_gz_path).unwrap(),
        ));
        let tar_names: Vec<String> = tar
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
            .collect();

        assert_eq!(zip_names, vec!["snappymail", "snappymail/a.txt", "data/VERSION"]);
        assert_eq!(zip_names, tar_names);
    }
}
