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

//! Sheetmove application wiring.
//!
//! Layout: `bootstrap.rs` (plan loading, logging setup, production wiring), `runner.rs`
//! (sequential task execution and run summaries), `error.rs` (`AppError`).

/// Plan loading and process bootstrap.
pub mod bootstrap;
/// Application-level errors.
pub mod error;
/// Task execution.
pub mod runner;

pub use bootstrap::{run_app, run_plan};
pub use error::{AppError, AppResult};
pub use runner::{RunSummary, TaskReport, TaskRunner, TaskStatus};
