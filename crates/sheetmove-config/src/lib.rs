#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Task plan configuration for sheetmove runs.
//!
//! Layout: `model.rs` (typed task records), `loader.rs` (YAML plan loading),
//! `validate.rs` (structural checks applied at load), `defaults.rs` (file names and levels).

mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use defaults::{DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL, PLAN_FILE_NAME};
pub use error::{ConfigError, ConfigResult};
pub use loader::load_plan;
pub use model::{
    ColumnRef, FilterValue, LogFileFormat, LogSettings, MovePlan, MoveTask, RowFilter, SheetRef,
};
