//! Structural checks applied when a plan is loaded.
//!
//! Only the checks later stages cannot recover from live here; paths, sheets and columns
//! are resolved when a task runs and fail that task alone.

use crate::error::{ConfigError, ConfigResult};
use crate::model::{MovePlan, MoveTask};

/// Validate every section of a parsed plan.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for the first offending field.
pub fn validate_plan(plan: &MovePlan) -> ConfigResult<()> {
    if plan.logging.level.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            section: "logging".to_string(),
            field: "level",
            reason: "must not be empty",
            value: None,
        });
    }
    if plan.logging.file.as_os_str().is_empty() {
        return Err(ConfigError::InvalidField {
            section: "logging".to_string(),
            field: "file",
            reason: "must not be empty",
            value: None,
        });
    }

    for (index, task) in plan.tasks.iter().enumerate() {
        validate_task(index, task)?;
    }
    Ok(())
}

fn validate_task(index: usize, task: &MoveTask) -> ConfigResult<()> {
    if let Some(column) = &task.filter_col
        && task.filter_value.is_none()
    {
        return Err(ConfigError::InvalidField {
            section: format!("tasks[{index}]"),
            field: "filter_value",
            reason: "required when filter_col is set",
            value: Some(column.to_string()),
        });
    }
    Ok(())
}
