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

//! Binary entrypoint: runs every task of `move_tasks.yaml` in the working directory.

use sheetmove_app::{AppResult, run_app};

/// Runs the plan file found in the working directory.
fn main() -> AppResult<()> {
    run_app()
}
