//! Scratch directory builders and filesystem assertions.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Contents recorded for each entry of a snapshotted tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    /// A directory (contents are captured as separate entries).
    Dir,
    /// A regular file and its bytes.
    File(Vec<u8>),
    /// A symbolic link and the path it points at; the target is not followed.
    Link(PathBuf),
}

/// Create a scratch directory that is removed when the handle drops.
///
/// # Errors
///
/// Returns an error if the temporary directory cannot be created.
pub fn temp_dir() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix("sheetmove-")
        .tempdir()
        .context("failed to create scratch directory")
}

/// Create `root/name` and populate it with the given relative files.
///
/// Nested paths such as `scans/a.dcm` create intermediate directories.
///
/// # Errors
///
/// Returns an error if any directory or file cannot be written.
pub fn create_folder(root: &Path, name: &str, files: &[(&str, &[u8])]) -> Result<PathBuf> {
    let folder = root.join(name);
    fs::create_dir_all(&folder)
        .with_context(|| format!("failed to create folder {}", folder.display()))?;
    for (relative, bytes) in files {
        let path = folder.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(folder)
}

/// Capture every entry below `root`, keyed by path relative to `root`.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or a file cannot be read.
pub fn snapshot_tree(root: &Path) -> Result<BTreeMap<PathBuf, TreeEntry>> {
    let mut entries = BTreeMap::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        let relative = entry.path().strip_prefix(root)?.to_path_buf();
        let recorded = if entry.file_type().is_dir() {
            TreeEntry::Dir
        } else if entry.file_type().is_symlink() {
            TreeEntry::Link(
                fs::read_link(entry.path())
                    .with_context(|| format!("failed to read link {}", entry.path().display()))?,
            )
        } else {
            TreeEntry::File(
                fs::read(entry.path())
                    .with_context(|| format!("failed to read {}", entry.path().display()))?,
            )
        };
        entries.insert(relative, recorded);
    }
    Ok(entries)
}

/// Names of the direct subdirectories of `root`, sorted.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
pub fn subdirectory_names(root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("failed to list {}", root.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Write a CSV file whose first record is treated as the header by default.
///
/// # Errors
///
/// Returns an error if the file cannot be created or a record cannot be written.
pub fn write_csv(path: &Path, rows: &[&[&str]]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer.write_record(*row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tree_records_nested_files() -> Result<()> {
        let temp = temp_dir()?;
        create_folder(
            temp.path(),
            "1234-Alice",
            &[("notes.txt", b"hello"), ("scans/a.bin", &[0, 1, 2])],
        )?;

        let snapshot = snapshot_tree(temp.path())?;
        assert_eq!(snapshot.get(Path::new("1234-Alice")), Some(&TreeEntry::Dir));
        assert_eq!(
            snapshot.get(Path::new("1234-Alice/scans/a.bin")),
            Some(&TreeEntry::File(vec![0, 1, 2]))
        );
        assert_eq!(snapshot.len(), 4);
        Ok(())
    }

    #[test]
    fn subdirectory_names_ignores_files() -> Result<()> {
        let temp = temp_dir()?;
        create_folder(temp.path(), "b", &[])?;
        create_folder(temp.path(), "a", &[])?;
        fs::write(temp.path().join("file.txt"), b"x")?;

        assert_eq!(subdirectory_names(temp.path())?, vec!["a", "b"]);
        Ok(())
    }

    #[test]
    fn write_csv_round_trips_through_reader() -> Result<()> {
        let temp = temp_dir()?;
        let path = temp.path().join("rows.csv");
        write_csv(&path, &[&["PatientID", "Diagnosis"], &["1234", "UA"]])?;

        let text = fs::read_to_string(&path)?;
        assert_eq!(text, "PatientID,Diagnosis\n1234,UA\n");
        Ok(())
    }
}
