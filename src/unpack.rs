//! Extraction of the per-student submission archives.
//!
//! The course platform exports one `<random>-<handle>.zip` per student. Each
//! archive is unpacked into `<id>-<handle>/` next to it and then removed.

use anyhow::{Context, Result, anyhow, bail};
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::read::ZipArchive;

use crate::roster::Student;

/// Extracts the handle from an archive name such as `x7Q2-jdoe.zip`.
pub fn handle_from_archive(path: &Path) -> Option<&str> {
    let stem = path.file_stem()?.to_str()?;
    stem.rsplit('-').next().filter(|h| !h.is_empty())
}

/// Unpacks every `.zip` archive in `submissions_dir` and deletes it.
///
/// Returns the number of archives extracted.
///
/// # Errors
///
/// Fails if an archive's handle is not on the roster, if an archive is
/// unreadable, or if an entry would escape its destination directory.
#[tracing::instrument(skip_all, fields(dir = %submissions_dir.display()))]
pub fn unpack_submissions(submissions_dir: &Path, roster: &[Student]) -> Result<usize> {
    let by_handle: HashMap<&str, &Student> =
        roster.iter().map(|s| (s.handle.as_str(), s)).collect();

    let mut archives: Vec<PathBuf> = fs::read_dir(submissions_dir)
        .with_context(|| format!("failed to read '{}'", submissions_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("zip"))
        .collect();
    archives.sort();

    let mut extracted = 0;
    for archive in archives {
        let handle = handle_from_archive(&archive)
            .ok_or_else(|| anyhow!("cannot read a handle from '{}'", archive.display()))?;
        let student = by_handle
            .get(handle)
            .ok_or_else(|| anyhow!("archive '{}' belongs to unknown handle '{handle}'", archive.display()))?;

        let destination = submissions_dir.join(student.dir_name());
        extract_zip(&archive, &destination)?;
        fs::remove_file(&archive)?;

        debug!(student = student.id, handle, destination = %destination.display(), "Archive extracted");
        extracted += 1;
    }

    info!(extracted, "Submissions unpacked");
    Ok(extracted)
}

/// Extracts a zip file into `destination_dir`, rejecting entries that
/// resolve outside of it.
pub fn extract_zip(archive_path: &Path, destination_dir: &Path) -> Result<()> {
    let file = File::open(archive_path)
        .with_context(|| format!("failed to open '{}'", archive_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("'{}' is not a zip archive", archive_path.display()))?;

    fs::create_dir_all(destination_dir)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            bail!(
                "'{}' contains an entry outside the archive root: {}",
                archive_path.display(),
                entry.name()
            );
        };
        let outpath = destination_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)?;
            std::io::copy(&mut entry, &mut outfile)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    fn fresh_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_handle_from_archive() {
        assert_eq!(handle_from_archive(Path::new("Ab-12-cd-jdoe.zip")), Some("jdoe"));
        assert_eq!(handle_from_archive(Path::new("jdoe.zip")), Some("jdoe"));
        assert_eq!(handle_from_archive(Path::new("trailing-.zip")), None);
    }

    #[test]
    fn test_unpack_submissions_extracts_and_removes() {
        let dir = fresh_dir("peer_grader_test_unpack");
        let roster = vec![
            Student::new(1, "alice", "Smith, Alice"),
            Student::new(2, "bob", "Jones, Bob"),
        ];
        write_zip(&dir.join("r4nd0m-alice.zip"), &[("report.md", "# alice")]);
        write_zip(&dir.join("x-y-bob.zip"), &[("sub/report.md", "# bob")]);
        fs::write(dir.join("readme.txt"), "not an archive").unwrap();

        let count = unpack_submissions(&dir, &roster).unwrap();

        assert_eq!(count, 2);
        assert_eq!(fs::read_to_string(dir.join("1-alice/report.md")).unwrap(), "# alice");
        assert_eq!(fs::read_to_string(dir.join("2-bob/sub/report.md")).unwrap(), "# bob");
        assert!(!dir.join("r4nd0m-alice.zip").exists());
        assert!(dir.join("readme.txt").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unpack_submissions_unknown_handle_fails() {
        let dir = fresh_dir("peer_grader_test_unpack_unknown");
        let roster = vec![Student::new(1, "alice", "Smith, Alice")];
        write_zip(&dir.join("r-mallory.zip"), &[("report.md", "x")]);

        assert!(unpack_submissions(&dir, &roster).is_err());
        assert!(dir.join("r-mallory.zip").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_extract_zip_rejects_escaping_entries() {
        let dir = fresh_dir("peer_grader_test_zip_slip");
        let archive = dir.join("evil-alice.zip");
        write_zip(&archive, &[("../escaped.md", "x")]);

        assert!(extract_zip(&archive, &dir.join("out")).is_err());
        assert!(!dir.join("escaped.md").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
