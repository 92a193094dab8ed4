//! YAML plan loading.
//!
//! # Design
//! - Parse then validate; a plan that fails either step aborts the run before any
//!   folder is touched.
//! - Keep the on-disk entry point thin so tests can feed documents as strings.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::MovePlan;
use crate::validate::validate_plan;

/// Read and validate the plan file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a valid plan document, or fails
/// validation.
pub fn load_plan(path: &Path) -> ConfigResult<MovePlan> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        operation: "plan.read",
        path: path.to_path_buf(),
        source,
    })?;
    let plan = parse_plan(&text, Some(path))?;
    debug!(
        path = %path.display(),
        tasks = plan.tasks.len(),
        "loaded move plan"
    );
    Ok(plan)
}

impl MovePlan {
    /// Parse and validate a plan document held in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid plan document or fails validation.
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        parse_plan(text, None)
    }
}

fn parse_plan(text: &str, path: Option<&Path>) -> ConfigResult<MovePlan> {
    if text.trim().is_empty() {
        return Ok(MovePlan::default());
    }
    let plan: MovePlan = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.map(Path::to_path_buf),
        source,
    })?;
    validate_plan(&plan)?;
    Ok(plan)
}
