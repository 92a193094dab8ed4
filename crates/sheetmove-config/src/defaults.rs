//! Default file names and logging levels for a run.
//!
//! # Design
//! - Both files live in the working directory so a run needs no flags or environment.
//! - The default level keeps per-folder skip entries in the log file.

/// Plan file read from the working directory at startup.
pub const PLAN_FILE_NAME: &str = "move_tasks.yaml";
/// Log file written in the working directory unless the plan overrides it.
pub const DEFAULT_LOG_FILE: &str = "move_file.log";
/// Log level used unless the plan overrides it.
pub const DEFAULT_LOG_LEVEL: &str = "debug";
