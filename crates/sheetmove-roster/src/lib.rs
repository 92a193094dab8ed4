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

//! Spreadsheet access and identifier-set construction.
//!
//! Layout: `source.rs` (`SheetSource` capability + in-memory source), `workbook.rs`
//! (calamine/CSV backed source), `table.rs` (cells and header resolution),
//! `normalize.rs` (identifier normalization), `identifiers.rs` (identifier-set builder).

pub mod error;
pub mod identifiers;
pub mod normalize;
pub mod source;
pub mod table;
pub mod workbook;

pub use error::{DataLoadError, RosterResult};
pub use identifiers::{IdentifierQuery, IdentifierSet, build_identifier_set};
pub use normalize::{ID_PREFIX, identifier_key, normalize_identifier};
pub use source::{MemorySheetSource, SheetSource};
pub use table::{CellValue, Table};
pub use workbook::WorkbookSource;
