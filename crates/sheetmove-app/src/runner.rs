//! Sequential task execution.
//!
//! # Design
//! - Tasks run strictly in order; a task that cannot load its spreadsheet or read its
//!   source directory is logged and skipped, and the next task still runs.
//! - There is no rollback: folders moved by earlier tasks stay moved.
//! - Each task runs inside a `task` span so every log line carries the task index.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, TimeDelta, Utc};
use sheetmove_config::MoveTask;
use sheetmove_fsops::{
    FolderMover, FolderStore, FsOpsError, RelocationCounts, RelocationReport, RelocationRequest,
};
use sheetmove_roster::{DataLoadError, IdentifierQuery, SheetSource, build_identifier_set};
use tracing::{error, info, info_span, warn};

/// How a task ended.
#[derive(Debug)]
pub enum TaskStatus {
    /// The task ran to completion; individual folders may still have failed.
    Completed {
        /// Number of normalized identifiers read from the spreadsheet.
        identifiers: usize,
        /// Per-folder outcomes.
        report: RelocationReport,
    },
    /// The spreadsheet could not yield an identifier set; no folder was examined.
    DataLoadFailed {
        /// Load failure.
        error: DataLoadError,
    },
    /// The source directory could not be read; no folder was examined.
    SourceFailed {
        /// Filesystem failure.
        error: FsOpsError,
    },
}

/// Outcome of one task.
#[derive(Debug)]
pub struct TaskReport {
    /// Position of the task in the plan, starting at 0.
    pub index: usize,
    /// Spreadsheet the task read.
    pub excel_path: PathBuf,
    /// How the task ended.
    pub status: TaskStatus,
}

impl TaskReport {
    /// Folder outcome counts; zero for tasks that did not reach the folder stage.
    #[must_use]
    pub fn counts(&self) -> RelocationCounts {
        match &self.status {
            TaskStatus::Completed { report, .. } => report.counts(),
            TaskStatus::DataLoadFailed { .. } | TaskStatus::SourceFailed { .. } => {
                RelocationCounts::default()
            }
        }
    }

    /// Whether the task was skipped because of an error.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !matches!(self.status, TaskStatus::Completed { .. })
    }
}

/// Outcome of a whole run.
#[derive(Debug)]
pub struct RunSummary {
    /// When the first task started.
    pub started_at: DateTime<Utc>,
    /// When the last task finished.
    pub finished_at: DateTime<Utc>,
    /// One report per task, in plan order.
    pub tasks: Vec<TaskReport>,
}

impl RunSummary {
    /// Folder outcome counts summed over every task.
    #[must_use]
    pub fn totals(&self) -> RelocationCounts {
        let mut totals = RelocationCounts::default();
        for task in &self.tasks {
            totals += task.counts();
        }
        totals
    }

    /// Number of tasks skipped because of an error.
    #[must_use]
    pub fn failed_tasks(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_failure()).count()
    }

    /// Wall-clock duration of the run.
    #[must_use]
    pub fn elapsed(&self) -> TimeDelta {
        self.finished_at - self.started_at
    }
}

/// Runs move tasks against a spreadsheet source and a folder store.
#[derive(Debug)]
pub struct TaskRunner<S, F> {
    sheets: S,
    mover: FolderMover<F>,
}

impl<S: SheetSource, F: FolderStore> TaskRunner<S, F> {
    /// Create a runner over the given capabilities.
    #[must_use]
    pub const fn new(sheets: S, folders: F) -> Self {
        Self {
            sheets,
            mover: FolderMover::new(folders),
        }
    }

    /// Run every task in order, announcing moved folders on `console`.
    pub fn run(&self, tasks: &[MoveTask], console: &mut dyn Write) -> RunSummary {
        let started_at = Utc::now();
        let mut reports = Vec::with_capacity(tasks.len());
        for (index, task) in tasks.iter().enumerate() {
            reports.push(self.run_task(index, task, console));
        }
        RunSummary {
            started_at,
            finished_at: Utc::now(),
            tasks: reports,
        }
    }

    /// Run a single task.
    pub fn run_task(&self, index: usize, task: &MoveTask, console: &mut dyn Write) -> TaskReport {
        let span = info_span!("task", index, excel = %task.excel_path.display());
        let _entered = span.enter();
        let filter = task.row_filter().map_or_else(
            || "none".to_string(),
            |filter| format!("{} == {}", filter.column, filter.value),
        );
        info!(
            sheet = %task.sheet_name,
            name_col = %task.name_col,
            header = task.header,
            source = %task.source_path.display(),
            destination = %task.destination_path.display(),
            filter = %filter,
            "task started"
        );

        let status = self.execute(task, console);
        match &status {
            TaskStatus::Completed { report, .. } => {
                let counts = report.counts();
                info!(
                    moved = counts.moved,
                    skipped = counts.not_matched + counts.conflicts + counts.failed,
                    "task finished"
                );
            }
            TaskStatus::DataLoadFailed { error } => {
                error!(
                    error = %error,
                    detail = ?error,
                    "failed to build identifier set; skipping task"
                );
            }
            TaskStatus::SourceFailed { error } => {
                error!(
                    error = %error,
                    detail = ?error,
                    "failed to read source directory; skipping task"
                );
            }
        }

        TaskReport {
            index,
            excel_path: task.excel_path.clone(),
            status,
        }
    }

    fn execute(&self, task: &MoveTask, console: &mut dyn Write) -> TaskStatus {
        let identifiers = match build_identifier_set(&self.sheets, IdentifierQuery::from(task)) {
            Ok(identifiers) => identifiers,
            Err(error) => return TaskStatus::DataLoadFailed { error },
        };
        if identifiers.is_empty() {
            warn!("identifier set is empty; no folder will match");
        }

        let request = RelocationRequest {
            source: &task.source_path,
            destination: &task.destination_path,
            identifiers: &identifiers,
        };
        match self.mover.relocate(request, console) {
            Ok(report) => TaskStatus::Completed {
                identifiers: identifiers.len(),
                report,
            },
            Err(error) => TaskStatus::SourceFailed { error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetmove_config::{ColumnRef, FilterValue, SheetRef};
    use sheetmove_fsops::MemoryFolderStore;
    use sheetmove_roster::{CellValue, MemorySheetSource};

    fn sheets() -> MemorySheetSource {
        MemorySheetSource::new().with_sheet(
            "patients.xlsx",
            "Sheet1",
            vec![
                vec!["PatientID".into(), "Diagnosis".into()],
                vec![1234_i64.into(), "UA".into()],
                vec!["001-5678".into(), "OA".into()],
                vec![9999_i64.into(), CellValue::Empty],
            ],
        )
    }

    fn task(excel: &str, source: &str) -> MoveTask {
        MoveTask {
            excel_path: PathBuf::from(excel),
            sheet_name: SheetRef::Index(0),
            name_col: ColumnRef::Name("PatientID".to_string()),
            header: 0,
            source_path: PathBuf::from(source),
            destination_path: PathBuf::from("dest"),
            filter_col: None,
            filter_value: None,
        }
    }

    #[test]
    fn failing_task_does_not_stop_later_tasks() {
        let folders = MemoryFolderStore::new()
            .with_dir("src/1234-Alice")
            .with_dir("src/5678-Bob");
        let runner = TaskRunner::new(sheets(), &folders);
        let tasks = vec![
            task("missing.xlsx", "src"),
            task("patients.xlsx", "absent"),
            task("patients.xlsx", "src"),
        ];

        let mut console = Vec::new();
        let summary = runner.run(&tasks, &mut console);

        assert!(matches!(
            summary.tasks[0].status,
            TaskStatus::DataLoadFailed {
                error: DataLoadError::Missing { .. }
            }
        ));
        assert!(matches!(
            summary.tasks[1].status,
            TaskStatus::SourceFailed {
                error: FsOpsError::SourceMissing { .. }
            }
        ));
        assert_eq!(summary.failed_tasks(), 2);
        assert_eq!(summary.totals().moved, 2);
        assert!(folders.is_dir("dest/1234-Alice"));
        assert!(folders.is_dir("dest/5678-Bob"));
        assert_eq!(String::from_utf8_lossy(&console).lines().count(), 2);
        assert!(summary.finished_at >= summary.started_at);
    }

    #[test]
    fn filter_restricts_identifiers() {
        let folders = MemoryFolderStore::new()
            .with_dir("src/1234-Alice")
            .with_dir("src/5678-Bob");
        let runner = TaskRunner::new(sheets(), &folders);
        let mut filtered = task("patients.xlsx", "src");
        filtered.filter_col = Some(ColumnRef::Index(1));
        filtered.filter_value = Some(FilterValue::Text("UA".to_string()));

        let report = runner.run_task(0, &filtered, &mut Vec::new());
        match &report.status {
            TaskStatus::Completed {
                identifiers,
                report,
            } => {
                assert_eq!(*identifiers, 1);
                assert_eq!(report.moved(), vec!["1234-Alice"]);
            }
            other => panic!("unexpected status: {other:?}"),
        }
        assert!(folders.is_dir("src/5678-Bob"));
    }

    #[test]
    fn tasks_share_destination_without_rollback() {
        let folders = MemoryFolderStore::new()
            .with_dir("first/1234-Alice")
            .with_dir("second/1234-Alice");
        let runner = TaskRunner::new(sheets(), &folders);
        let tasks = vec![task("patients.xlsx", "first"), task("patients.xlsx", "second")];

        let summary = runner.run(&tasks, &mut Vec::new());
        let totals = summary.totals();
        assert_eq!(totals.moved, 1);
        assert_eq!(totals.conflicts, 1);
        assert!(folders.is_dir("second/1234-Alice"));
        assert_eq!(summary.failed_tasks(), 0);
    }
}
