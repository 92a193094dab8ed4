//! Simulated directory tree for exercising the mover without touching disk.
//!
//! # Design
//! - Directories and files are tracked as flat path sets; moving a folder re-keys every
//!   path below it.
//! - Failures are injected per path so tests can check that one bad folder does not stop
//!   the rest of a task.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{FsOpsError, FsOpsResult};
use crate::store::FolderStore;

#[derive(Debug, Default)]
struct MemoryTree {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
    failing_moves: BTreeSet<PathBuf>,
    failing_creates: BTreeSet<PathBuf>,
}

impl MemoryTree {
    fn add_dir_all(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.dirs.contains(path) || self.files.contains_key(path)
    }
}

/// In-memory [`FolderStore`] with per-path failure injection.
#[derive(Debug, Default)]
pub struct MemoryFolderStore {
    tree: RefCell<MemoryTree>,
}

impl MemoryFolderStore {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory and its ancestors.
    #[must_use]
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.tree.borrow_mut().add_dir_all(path.as_ref());
        self
    }

    /// Add a file, creating its parent directories.
    #[must_use]
    pub fn with_file(self, path: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) -> Self {
        let path = path.as_ref();
        {
            let mut tree = self.tree.borrow_mut();
            if let Some(parent) = path.parent() {
                tree.add_dir_all(parent);
            }
            tree.files.insert(path.to_path_buf(), bytes.into());
        }
        self
    }

    /// Make every move whose source is `path` fail.
    #[must_use]
    pub fn fail_move(self, path: impl AsRef<Path>) -> Self {
        self.tree
            .borrow_mut()
            .failing_moves
            .insert(path.as_ref().to_path_buf());
        self
    }

    /// Make creating `path` fail.
    #[must_use]
    pub fn fail_create(self, path: impl AsRef<Path>) -> Self {
        self.tree
            .borrow_mut()
            .failing_creates
            .insert(path.as_ref().to_path_buf());
        self
    }

    /// Whether `path` is a directory in the tree.
    #[must_use]
    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.tree.borrow().dirs.contains(path.as_ref())
    }

    /// Contents of the file at `path`, if present.
    #[must_use]
    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.tree.borrow().files.get(path.as_ref()).cloned()
    }
}

impl FolderStore for MemoryFolderStore {
    fn exists(&self, path: &Path) -> bool {
        self.tree.borrow().exists(path)
    }

    fn list_subdirectories(&self, path: &Path) -> FsOpsResult<Vec<String>> {
        let tree = self.tree.borrow();
        if !tree.dirs.contains(path) {
            return Err(FsOpsError::io(
                "list_subdirectories.read_dir",
                path,
                io::Error::from(io::ErrorKind::NotFound),
            ));
        }
        Ok(tree
            .dirs
            .iter()
            .filter(|dir| dir.parent() == Some(path))
            .filter_map(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    fn create_dir_all(&self, path: &Path) -> FsOpsResult<()> {
        let mut tree = self.tree.borrow_mut();
        if tree.failing_creates.contains(path) {
            return Err(FsOpsError::Injected {
                operation: "create_dir_all",
                path: path.to_path_buf(),
            });
        }
        if tree.files.contains_key(path) {
            return Err(FsOpsError::io(
                "create_dir_all",
                path,
                io::Error::from(io::ErrorKind::AlreadyExists),
            ));
        }
        tree.add_dir_all(path);
        Ok(())
    }

    fn move_dir(&self, source: &Path, destination: &Path) -> FsOpsResult<()> {
        let mut tree = self.tree.borrow_mut();
        if tree.failing_moves.contains(source) {
            return Err(FsOpsError::Injected {
                operation: "move_dir",
                path: source.to_path_buf(),
            });
        }
        if tree.exists(destination) {
            return Err(FsOpsError::DestinationExists {
                path: destination.to_path_buf(),
            });
        }
        if !tree.dirs.contains(source) {
            return Err(FsOpsError::SourceMissing {
                path: source.to_path_buf(),
            });
        }
        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
            && !tree.dirs.contains(parent)
        {
            return Err(FsOpsError::io(
                "move_dir.rename",
                destination,
                io::Error::from(io::ErrorKind::NotFound),
            ));
        }

        let rekey = |path: &Path| {
            path.strip_prefix(source)
                .ok()
                .map(|relative| destination.join(relative))
        };

        let moved_dirs: Vec<PathBuf> = tree
            .dirs
            .iter()
            .filter(|dir| dir.starts_with(source))
            .cloned()
            .collect();
        for dir in moved_dirs {
            tree.dirs.remove(&dir);
            if let Some(target) = rekey(&dir) {
                tree.dirs.insert(target);
            }
        }

        let moved_files: Vec<PathBuf> = tree
            .files
            .keys()
            .filter(|file| file.starts_with(source))
            .cloned()
            .collect();
        for file in moved_files {
            if let (Some(bytes), Some(target)) = (tree.files.remove(&file), rekey(&file)) {
                tree.files.insert(target, bytes);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryFolderStore {
        MemoryFolderStore::new()
            .with_file("src/1234-Alice/scan.dcm", b"\x00\x01".to_vec())
            .with_file("src/1234-Alice/notes/visit.txt", "follow-up")
            .with_dir("src/5678-Bob")
            .with_file("src/readme.txt", "not a folder")
            .with_dir("dest")
    }

    #[test]
    fn lists_direct_subdirectories_only() -> FsOpsResult<()> {
        let store = store();
        assert_eq!(
            store.list_subdirectories(Path::new("src"))?,
            vec!["1234-Alice", "5678-Bob"]
        );
        assert!(store.list_subdirectories(Path::new("missing")).is_err());
        Ok(())
    }

    #[test]
    fn move_rekeys_nested_entries() -> FsOpsResult<()> {
        let store = store();
        store.move_dir(Path::new("src/1234-Alice"), Path::new("dest/1234-Alice"))?;

        assert!(!store.exists(Path::new("src/1234-Alice")));
        assert!(store.is_dir("dest/1234-Alice/notes"));
        assert_eq!(
            store.file("dest/1234-Alice/scan.dcm"),
            Some(vec![0_u8, 1])
        );
        assert_eq!(
            store.file("dest/1234-Alice/notes/visit.txt"),
            Some(b"follow-up".to_vec())
        );
        Ok(())
    }

    #[test]
    fn move_into_occupied_destination_is_a_conflict() {
        let store = store().with_dir("dest/1234-Alice");
        let err = store
            .move_dir(Path::new("src/1234-Alice"), Path::new("dest/1234-Alice"))
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(store.file("src/1234-Alice/scan.dcm").is_some());
    }

    #[test]
    fn move_requires_destination_parent() {
        let err = store()
            .move_dir(Path::new("src/5678-Bob"), Path::new("absent/5678-Bob"))
            .unwrap_err();
        assert!(matches!(err, FsOpsError::Io { .. }));
    }

    #[test]
    fn injected_failures_fire_for_configured_paths() {
        let store = store()
            .fail_move("src/5678-Bob")
            .fail_create("locked");
        assert!(matches!(
            store.move_dir(Path::new("src/5678-Bob"), Path::new("dest/5678-Bob")),
            Err(FsOpsError::Injected {
                operation: "move_dir",
                ..
            })
        ));
        assert!(store.create_dir_all(Path::new("locked")).is_err());
        assert!(store.create_dir_all(Path::new("open/nested")).is_ok());
        assert!(store.is_dir("open"));
    }
}
