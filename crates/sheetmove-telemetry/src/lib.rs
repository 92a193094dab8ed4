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

//! Logging setup shared by the sheetmove binary and its tests.
//!
//! Layout: `init.rs` (subscriber construction and global install), `log_file.rs`
//! (truncating file writer), `error.rs` (`TelemetryError`).

pub mod error;
pub mod init;
pub mod log_file;

pub use error::{Result, TelemetryError};
pub use init::{LogFormat, LoggingConfig, build_subscriber, init_logging};
pub use log_file::{LogFileMakeWriter, LogFileWriter, open_log_file};
