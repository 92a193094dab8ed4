//! Filesystem capability used by the folder mover.
//!
//! # Design
//! - The mover only needs four primitives; everything else (matching, conflict handling,
//!   reporting) stays in `service.rs` and is exercised against the in-memory store.
//! - `OsFolderStore::move_dir` renames first and falls back to copy-then-remove only when
//!   the rename crosses devices. Any other rename error fails the folder untouched.
//! - A copy that fails part way is removed again, so a later run can retry the folder.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{FsOpsError, FsOpsResult};

/// Directory operations needed to relocate folders.
pub trait FolderStore {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Names of the direct subdirectories of `path`. Plain files are not listed.
    ///
    /// # Errors
    ///
    /// Returns an error when `path` cannot be read as a directory.
    fn list_subdirectories(&self, path: &Path) -> FsOpsResult<Vec<String>>;

    /// Create `path` and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error when a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> FsOpsResult<()>;

    /// Move the directory tree at `source` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::DestinationExists`] when `destination` is occupied, or an IO
    /// error when the tree cannot be moved.
    fn move_dir(&self, source: &Path, destination: &Path) -> FsOpsResult<()>;
}

impl<F: FolderStore + ?Sized> FolderStore for &F {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn list_subdirectories(&self, path: &Path) -> FsOpsResult<Vec<String>> {
        (**self).list_subdirectories(path)
    }

    fn create_dir_all(&self, path: &Path) -> FsOpsResult<()> {
        (**self).create_dir_all(path)
    }

    fn move_dir(&self, source: &Path, destination: &Path) -> FsOpsResult<()> {
        (**self).move_dir(source, destination)
    }
}

/// [`FolderStore`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFolderStore;

impl OsFolderStore {
    /// Construct the on-disk store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FolderStore for OsFolderStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_subdirectories(&self, path: &Path) -> FsOpsResult<Vec<String>> {
        let entries = fs::read_dir(path)
            .map_err(|source| FsOpsError::io("list_subdirectories.read_dir", path, source))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|source| FsOpsError::io("list_subdirectories.entry", path, source))?;
            let file_type = entry.file_type().map_err(|source| {
                FsOpsError::io("list_subdirectories.file_type", entry.path(), source)
            })?;
            if !file_type.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    warn!(
                        path = %path.display(),
                        name = %raw.to_string_lossy(),
                        "skipping folder with non UTF-8 name"
                    );
                }
            }
        }
        Ok(names)
    }

    fn create_dir_all(&self, path: &Path) -> FsOpsResult<()> {
        fs::create_dir_all(path).map_err(|source| FsOpsError::io("create_dir_all", path, source))
    }

    fn move_dir(&self, source: &Path, destination: &Path) -> FsOpsResult<()> {
        if destination.exists() {
            return Err(FsOpsError::DestinationExists {
                path: destination.to_path_buf(),
            });
        }
        if !source.is_dir() {
            return Err(FsOpsError::SourceMissing {
                path: source.to_path_buf(),
            });
        }
        move_tree(source, destination)
    }
}

fn move_tree(source: &Path, destination: &Path) -> FsOpsResult<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(rename_err) if rename_err.kind() == io::ErrorKind::CrossesDevices => {
            debug!(
                source = %source.display(),
                destination = %destination.display(),
                error = %rename_err,
                "rename crosses devices; copying tree instead"
            );
            copy_then_remove(source, destination)
        }
        Err(rename_err) => Err(FsOpsError::io("move_tree.rename", source, rename_err)),
    }
}

/// Copy `source` to `destination`, then delete `source`.
///
/// Once the copy is complete it is kept even if `source` cannot be fully removed.
fn copy_then_remove(source: &Path, destination: &Path) -> FsOpsResult<()> {
    copy_tree(source, destination)?;
    if let Err(remove_err) = fs::remove_dir_all(source)
        && remove_err.kind() != io::ErrorKind::NotFound
    {
        return Err(FsOpsError::io("move_tree.cleanup", source, remove_err));
    }
    Ok(())
}

fn discard_partial_copy(destination: &Path) {
    if let Err(err) = fs::remove_dir_all(destination)
        && err.kind() != io::ErrorKind::NotFound
    {
        warn!(
            destination = %destination.display(),
            error = %err,
            "failed to remove partial copy"
        );
    }
}

/// Copy the tree at `source` into a new directory `destination`.
///
/// A copy that fails part way removes whatever reached `destination`, leaving the folder as
/// if the move was never attempted.
fn copy_tree(source: &Path, destination: &Path) -> FsOpsResult<()> {
    fs::create_dir(destination)
        .map_err(|source_err| FsOpsError::io("copy_tree.create_dir", destination, source_err))?;
    copy_entries(source, destination).inspect_err(|_| discard_partial_copy(destination))
}

fn copy_entries(source: &Path, destination: &Path) -> FsOpsResult<()> {
    for entry in WalkDir::new(source).min_depth(1) {
        let entry =
            entry.map_err(|source_err| FsOpsError::walkdir("copy_tree.walk", source, source_err))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| FsOpsError::InvalidInput {
                field: "source_path",
                reason: "strip_prefix",
                value: Some(entry.path().to_string_lossy().into_owned()),
            })?;
        let target_path = destination.join(relative);
        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target_path).map_err(|source_err| {
                FsOpsError::io("copy_tree.create_dir", &target_path, source_err)
            })?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target_path)?;
        } else {
            fs::copy(entry.path(), &target_path).map_err(|source_err| {
                FsOpsError::io("copy_tree.copy_entry", &target_path, source_err)
            })?;
        }
    }

    Ok(())
}

/// Recreate the link at `link` under `target_path`, pointing at the same place.
#[cfg(unix)]
fn copy_symlink(link: &Path, target_path: &Path) -> FsOpsResult<()> {
    let points_to = fs::read_link(link)
        .map_err(|source_err| FsOpsError::io("copy_tree.read_link", link, source_err))?;
    std::os::unix::fs::symlink(&points_to, target_path)
        .map_err(|source_err| FsOpsError::io("copy_tree.symlink", target_path, source_err))
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target_path: &Path) -> FsOpsResult<()> {
    fs::copy(link, target_path)
        .map(|_| ())
        .map_err(|source_err| FsOpsError::io("copy_tree.copy_entry", target_path, source_err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use sheetmove_test_support::fixtures::{create_folder, snapshot_tree, temp_dir};

    #[test]
    fn lists_only_directories() -> Result<()> {
        let temp = temp_dir()?;
        create_folder(temp.path(), "1234-Alice", &[])?;
        create_folder(temp.path(), "5678-Bob", &[])?;
        fs::write(temp.path().join("9999-notes.txt"), b"not a folder")?;

        let mut names = OsFolderStore::new().list_subdirectories(temp.path())?;
        names.sort();
        assert_eq!(names, vec!["1234-Alice", "5678-Bob"]);
        Ok(())
    }

    #[test]
    fn listing_missing_directory_fails() -> Result<()> {
        let temp = temp_dir()?;
        let err = OsFolderStore::new()
            .list_subdirectories(&temp.path().join("absent"))
            .unwrap_err();
        assert!(matches!(
            err,
            FsOpsError::Io {
                operation: "list_subdirectories.read_dir",
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn copy_tree_preserves_nested_contents() -> Result<()> {
        let temp = temp_dir()?;
        let source = create_folder(
            temp.path(),
            "1234-Alice",
            &[("scan.dcm", b"\x00\x01\x02"), ("notes/visit.txt", b"follow-up")],
        )?;
        fs::create_dir_all(source.join("empty"))?;
        let destination = temp.path().join("copy");

        copy_tree(&source, &destination)?;
        assert_eq!(snapshot_tree(&source)?, snapshot_tree(&destination)?);
        Ok(())
    }

    #[test]
    fn move_dir_relocates_tree() -> Result<()> {
        let temp = temp_dir()?;
        let source = create_folder(temp.path(), "1234-Alice", &[("a/b.txt", b"bytes")])?;
        let before = snapshot_tree(&source)?;
        let destination = temp.path().join("dest").join("1234-Alice");
        fs::create_dir_all(temp.path().join("dest"))?;

        OsFolderStore::new().move_dir(&source, &destination)?;
        assert!(!source.exists());
        assert_eq!(snapshot_tree(&destination)?, before);
        Ok(())
    }

    #[test]
    fn move_dir_refuses_occupied_destination() -> Result<()> {
        let temp = temp_dir()?;
        let source = create_folder(temp.path(), "1234-Alice", &[("new.txt", b"new")])?;
        let destination =
            create_folder(&temp.path().join("dest"), "1234-Alice", &[("old.txt", b"old")])?;

        let err = OsFolderStore::new()
            .move_dir(&source, &destination)
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(source.join("new.txt").is_file());
        assert!(!destination.join("new.txt").exists());
        Ok(())
    }

    #[test]
    fn rename_failure_does_not_fall_back_to_copying() -> Result<()> {
        let temp = temp_dir()?;
        let source = create_folder(temp.path(), "1234-Alice", &[("a.txt", b"kept")])?;
        let destination = temp.path().join("absent").join("1234-Alice");

        let err = OsFolderStore::new()
            .move_dir(&source, &destination)
            .unwrap_err();
        assert!(matches!(
            err,
            FsOpsError::Io {
                operation: "move_tree.rename",
                ..
            }
        ));
        assert!(!temp.path().join("absent").exists());
        assert_eq!(fs::read(source.join("a.txt"))?, b"kept");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn copy_fallback_recreates_symlinks() -> Result<()> {
        use std::os::unix::fs::symlink;

        let temp = temp_dir()?;
        let source = create_folder(temp.path(), "1234-Alice", &[("a.txt", b"scan")])?;
        symlink("a.txt", source.join("latest"))?;
        symlink("missing-target", source.join("z-dangling"))?;
        let before = snapshot_tree(&source)?;
        let destination = temp.path().join("copy");

        copy_then_remove(&source, &destination)?;
        assert!(!source.exists());
        assert_eq!(snapshot_tree(&destination)?, before);
        assert_eq!(
            fs::read_link(destination.join("z-dangling"))?,
            Path::new("missing-target")
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn failed_copy_leaves_nothing_at_destination() -> Result<()> {
        use std::os::unix::net::UnixListener;

        let temp = temp_dir()?;
        let source = create_folder(temp.path(), "1234-Alice", &[("a.txt", b"scan")])?;
        let socket = source.join("agent.sock");
        let listener = UnixListener::bind(&socket)?;
        let destination = temp.path().join("copy");

        let err = copy_then_remove(&source, &destination).unwrap_err();
        assert!(matches!(
            err,
            FsOpsError::Io {
                operation: "copy_tree.copy_entry",
                ..
            }
        ));
        assert!(!destination.exists());
        assert_eq!(fs::read(source.join("a.txt"))?, b"scan");

        drop(listener);
        fs::remove_file(&socket)?;
        copy_then_remove(&source, &destination)?;
        assert_eq!(fs::read(destination.join("a.txt"))?, b"scan");
        Ok(())
    }
}
