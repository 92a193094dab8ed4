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
#![allow(clippy::module_name_repetitions)]

//! Folder matching and relocation for sheetmove tasks.
//!
//! Layout: `naming.rs` (folder-name parsing), `store.rs` (`FolderStore` capability and the
//! on-disk implementation), `memory.rs` (simulated tree for tests), `service.rs`
//! (`FolderMover` and relocation reports).

pub mod error;
pub mod memory;
pub mod naming;
pub mod service;
pub mod store;

pub use error::{FsOpsError, FsOpsResult};
pub use memory::MemoryFolderStore;
pub use naming::{FolderName, ID_SEPARATOR, parse_folder_name};
pub use service::{
    FolderMover, FolderOutcome, FolderRecord, RelocationCounts, RelocationReport,
    RelocationRequest,
};
pub use store::{FolderStore, OsFolderStore};
