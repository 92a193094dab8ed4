use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use sheetmove_config::{LogFileFormat, MovePlan, PLAN_FILE_NAME, load_plan};
use sheetmove_fsops::{FolderStore, OsFolderStore};
use sheetmove_roster::{SheetSource, WorkbookSource};
use sheetmove_telemetry::{LogFormat, LoggingConfig};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::runner::{RunSummary, TaskRunner};

/// Dependencies required to run a plan from disk.
pub(crate) struct BootstrapDependencies {
    plan_path: PathBuf,
}

impl BootstrapDependencies {
    /// Locate the plan file in the process working directory.
    pub(crate) fn from_working_dir() -> AppResult<Self> {
        let cwd = env::current_dir().map_err(|err| AppError::io("current_dir", None, err))?;
        Ok(Self {
            plan_path: cwd.join(PLAN_FILE_NAME),
        })
    }
}

/// Entry point for a sheetmove run.
///
/// Loads the plan from the working directory, installs file logging, then runs every task
/// against the real filesystem. Moved folders are printed to stdout.
///
/// # Errors
///
/// Returns an error if the plan cannot be loaded or logging cannot be installed. Task and
/// folder failures are logged and do not produce an error.
pub fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_working_dir()?;
    run_app_with(dependencies)
}

/// Boot sequence driven entirely by injected dependencies.
pub(crate) fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    let BootstrapDependencies { plan_path } = dependencies;
    let plan = load_plan(&plan_path).map_err(|err| AppError::config("plan.load", err))?;

    sheetmove_telemetry::init_logging(&LoggingConfig {
        level: &plan.logging.level,
        format: log_format(plan.logging.format),
        file: &plan.logging.file,
    })
    .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    info!(
        plan = %plan_path.display(),
        tasks = plan.tasks.len(),
        "sheetmove run starting"
    );

    let stdout = io::stdout();
    let mut console = stdout.lock();
    run_plan(&plan, WorkbookSource::new(), OsFolderStore::new(), &mut console);
    Ok(())
}

/// Run every task of `plan` and log the run summary.
///
/// Tasks that set `filter_value` without `filter_col` are warned about and run unfiltered.
pub fn run_plan<S, F>(
    plan: &MovePlan,
    sheets: S,
    folders: F,
    console: &mut dyn Write,
) -> RunSummary
where
    S: SheetSource,
    F: FolderStore,
{
    for index in plan.ignored_filter_values() {
        warn!(
            task = index,
            "filter_value is set without filter_col; the value is ignored"
        );
    }

    let summary = TaskRunner::new(sheets, folders).run(&plan.tasks, console);
    log_run_summary(&summary);
    summary
}

fn log_run_summary(summary: &RunSummary) {
    let totals = summary.totals();
    info!(
        tasks = summary.tasks.len(),
        failed_tasks = summary.failed_tasks(),
        moved = totals.moved,
        not_matched = totals.not_matched,
        conflicts = totals.conflicts,
        failed = totals.failed,
        started_at = %summary.started_at.to_rfc3339(),
        elapsed_ms = summary.elapsed().num_milliseconds(),
        "sheetmove run finished"
    );
}

const fn log_format(format: LogFileFormat) -> LogFormat {
    match format {
        LogFileFormat::Text => LogFormat::Text,
        LogFileFormat::Json => LogFormat::Json,
    }
}
