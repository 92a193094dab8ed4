//! Folder matching and relocation for a single task.
//!
//! # Design
//! - Folders are processed one at a time in name order; each one ends in exactly one
//!   [`FolderOutcome`], so a failure never aborts the rest of the task.
//! - The console receives one line per moved folder and nothing else; everything else
//!   goes to the tracing log.
//! - Only a missing or unreadable source directory fails the whole task.

use std::io::Write;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use sheetmove_roster::{IdentifierSet, normalize_identifier};
use tracing::{debug, error, info, warn};

use crate::error::{FsOpsError, FsOpsResult};
use crate::naming::parse_folder_name;
use crate::store::FolderStore;

/// Inputs for relocating the matching folders of one task.
#[derive(Debug, Clone, Copy)]
pub struct RelocationRequest<'a> {
    /// Directory whose direct subdirectories are candidates.
    pub source: &'a Path,
    /// Directory that receives matched subdirectories.
    pub destination: &'a Path,
    /// Normalized identifiers to match folder IDs against.
    pub identifiers: &'a IdentifierSet,
}

/// What happened to a single candidate folder.
#[derive(Debug)]
pub enum FolderOutcome {
    /// The folder was moved.
    Moved {
        /// Path the folder now lives at.
        destination: PathBuf,
        /// Normalized identifier that matched.
        matched: String,
    },
    /// The folder's identifier is not in the set; it stays in place.
    NotMatched,
    /// A same-named folder already exists at the destination; nothing was moved.
    Conflict {
        /// Occupied destination path.
        destination: PathBuf,
    },
    /// The move failed; the folder stays in place.
    Failed {
        /// Failure reported by the store.
        error: FsOpsError,
    },
}

/// Outcome of one candidate folder.
#[derive(Debug)]
pub struct FolderRecord {
    /// Folder name as listed in the source directory.
    pub name: String,
    /// What happened to it.
    pub outcome: FolderOutcome,
}

/// Per-outcome folder counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelocationCounts {
    /// Folders moved.
    pub moved: usize,
    /// Folders left in place because their identifier did not match.
    pub not_matched: usize,
    /// Folders skipped because the destination was occupied.
    pub conflicts: usize,
    /// Folders whose move failed.
    pub failed: usize,
}

impl AddAssign for RelocationCounts {
    fn add_assign(&mut self, other: Self) {
        self.moved += other.moved;
        self.not_matched += other.not_matched;
        self.conflicts += other.conflicts;
        self.failed += other.failed;
    }
}

/// Outcomes of every candidate folder of one task, in processing order.
#[derive(Debug, Default)]
pub struct RelocationReport {
    /// One record per subdirectory of the source.
    pub folders: Vec<FolderRecord>,
}

impl RelocationReport {
    /// Tally the outcomes.
    #[must_use]
    pub fn counts(&self) -> RelocationCounts {
        let mut counts = RelocationCounts::default();
        for record in &self.folders {
            match record.outcome {
                FolderOutcome::Moved { .. } => counts.moved += 1,
                FolderOutcome::NotMatched => counts.not_matched += 1,
                FolderOutcome::Conflict { .. } => counts.conflicts += 1,
                FolderOutcome::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }

    /// Names of the folders that were moved.
    #[must_use]
    pub fn moved(&self) -> Vec<&str> {
        self.folders
            .iter()
            .filter(|record| matches!(record.outcome, FolderOutcome::Moved { .. }))
            .map(|record| record.name.as_str())
            .collect()
    }
}

/// Moves folders whose identifier appears in a task's identifier set.
#[derive(Debug, Clone, Default)]
pub struct FolderMover<F> {
    store: F,
}

impl<F: FolderStore> FolderMover<F> {
    /// Create a mover over `store`.
    #[must_use]
    pub const fn new(store: F) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    #[must_use]
    pub const fn store(&self) -> &F {
        &self.store
    }

    /// Relocate every matching subdirectory of `request.source`.
    ///
    /// Moved folders are announced on `console`, one line each.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::SourceMissing`] when the source directory does not exist, or
    /// an IO error when it cannot be listed. Per-folder failures are recorded in the report
    /// instead.
    pub fn relocate(
        &self,
        request: RelocationRequest<'_>,
        console: &mut dyn Write,
    ) -> FsOpsResult<RelocationReport> {
        if !self.store.exists(request.source) {
            return Err(FsOpsError::SourceMissing {
                path: request.source.to_path_buf(),
            });
        }

        let mut names = self.store.list_subdirectories(request.source)?;
        names.sort();
        debug!(
            source = %request.source.display(),
            candidates = names.len(),
            "listed candidate folders"
        );

        let mut report = RelocationReport::default();
        for name in names {
            let outcome = self.relocate_folder(request, &name, console);
            report.folders.push(FolderRecord { name, outcome });
        }

        let counts = report.counts();
        info!(
            source = %request.source.display(),
            destination = %request.destination.display(),
            moved = counts.moved,
            not_matched = counts.not_matched,
            conflicts = counts.conflicts,
            failed = counts.failed,
            "relocation finished"
        );
        Ok(report)
    }

    fn relocate_folder(
        &self,
        request: RelocationRequest<'_>,
        name: &str,
        console: &mut dyn Write,
    ) -> FolderOutcome {
        let parsed = parse_folder_name(name);
        if !request.identifiers.contains(parsed.id) {
            debug!(folder = %name, id = %parsed.id, "folder not matched; skipping");
            return FolderOutcome::NotMatched;
        }

        let target = request.destination.join(name);
        if self.store.exists(&target) {
            warn!(
                folder = %name,
                destination = %target.display(),
                "destination already exists; skipping"
            );
            return FolderOutcome::Conflict {
                destination: target,
            };
        }

        if !self.store.exists(request.destination) {
            if let Err(error) = self.store.create_dir_all(request.destination) {
                error!(
                    folder = %name,
                    destination = %request.destination.display(),
                    error = %error,
                    detail = ?error,
                    "failed to create destination directory"
                );
                return FolderOutcome::Failed { error };
            }
            info!(destination = %request.destination.display(), "created destination directory");
        }

        match self.store.move_dir(&request.source.join(name), &target) {
            Ok(()) => {
                let matched = normalize_identifier(parsed.id).to_string();
                info!(
                    folder = %name,
                    destination = %target.display(),
                    matched = %matched,
                    "moved folder"
                );
                if let Err(err) = writeln!(
                    console,
                    "Moved folder '{name}' to '{}' (matched '{matched}')",
                    target.display()
                ) {
                    warn!(folder = %name, error = %err, "failed to write console line");
                }
                FolderOutcome::Moved {
                    destination: target,
                    matched,
                }
            }
            Err(error) if error.is_conflict() => {
                warn!(
                    folder = %name,
                    destination = %target.display(),
                    "destination already exists; skipping"
                );
                FolderOutcome::Conflict {
                    destination: target,
                }
            }
            Err(error) => {
                error!(
                    folder = %name,
                    error = %error,
                    detail = ?error,
                    "failed to move folder"
                );
                FolderOutcome::Failed { error }
            }
        }
    }
}
