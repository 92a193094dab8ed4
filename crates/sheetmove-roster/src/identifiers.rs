//! Identifier-set construction from a task's spreadsheet.
//!
//! # Design
//! - Identifiers are normalized and case-folded on insert and on lookup, so callers never
//!   compare raw spreadsheet text with raw folder names.
//! - The builder borrows everything from the task; nothing is cloned until values are
//!   collected into the set.

use std::collections::{HashSet, hash_set};
use std::iter::Map;
use std::path::Path;

use sheetmove_config::{ColumnRef, MoveTask, RowFilter, SheetRef};
use tracing::{debug, info};

use crate::error::RosterResult;
use crate::normalize::{has_id_prefix, identifier_key, normalize_identifier};
use crate::source::SheetSource;

/// Normalized, lowercase identifiers used for membership tests against folder IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    ids: HashSet<String>,
}

impl IdentifierSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `raw` and insert it. Blank identifiers are ignored.
    ///
    /// Returns `true` when the normalized identifier was not already present.
    pub fn insert(&mut self, raw: &str) -> bool {
        let key = identifier_key(raw);
        if key.is_empty() {
            return false;
        }
        self.ids.insert(key)
    }

    /// Whether the normalized form of `raw` is in the set, ignoring case.
    #[must_use]
    pub fn contains(&self, raw: &str) -> bool {
        self.ids.contains(&identifier_key(raw))
    }

    /// Number of distinct normalized identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set holds no identifiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over the lowercase identifiers in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.into_iter()
    }
}

impl<'a> IntoIterator for &'a IdentifierSet {
    type Item = &'a str;
    type IntoIter = Map<hash_set::Iter<'a, String>, fn(&String) -> &str>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().map(String::as_str as fn(&String) -> &str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for raw in iter {
            set.insert(raw.as_ref());
        }
        set
    }
}

/// Borrowed inputs describing where a task's identifiers come from.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierQuery<'a> {
    /// Spreadsheet path.
    pub path: &'a Path,
    /// Sheet to read.
    pub sheet: &'a SheetRef,
    /// 0-based header row.
    pub header: usize,
    /// Column that holds the identifiers.
    pub name_column: &'a ColumnRef,
    /// Optional row filter.
    pub filter: Option<RowFilter<'a>>,
}

impl<'a> From<&'a MoveTask> for IdentifierQuery<'a> {
    fn from(task: &'a MoveTask) -> Self {
        Self {
            path: &task.excel_path,
            sheet: &task.sheet_name,
            header: task.header,
            name_column: &task.name_col,
            filter: task.row_filter(),
        }
    }
}

/// Build the normalized identifier set described by `query`.
///
/// Rows whose filter cell does not equal the filter value are skipped; blank name cells are
/// dropped; the rest are rendered as text and normalized.
///
/// # Errors
///
/// Returns a [`DataLoadError`](crate::DataLoadError) when the spreadsheet, sheet, header
/// row or either column cannot be resolved.
pub fn build_identifier_set<S: SheetSource + ?Sized>(
    source: &S,
    query: IdentifierQuery<'_>,
) -> RosterResult<IdentifierSet> {
    let table = source.load_table(query.path, query.sheet, query.header)?;
    debug!(
        path = %query.path.display(),
        sheet = %query.sheet,
        columns = ?table.headers(),
        rows = table.rows().len(),
        "loaded sheet"
    );

    let name_index = table.resolve_column(query.name_column)?;
    let filter = query
        .filter
        .map(|filter| {
            table
                .resolve_column(filter.column)
                .map(|index| (index, filter.value))
        })
        .transpose()?;

    let mut identifiers = IdentifierSet::new();
    let mut filtered_out = 0_usize;
    let mut prefixed = 0_usize;
    for row in 0..table.rows().len() {
        if let Some((filter_index, expected)) = filter
            && !table.cell(row, filter_index).matches(expected)
        {
            filtered_out += 1;
            continue;
        }
        let Some(raw) = table.cell(row, name_index).as_text() else {
            continue;
        };
        if has_id_prefix(&raw) {
            prefixed += 1;
            debug!(
                original = %raw,
                normalized = %normalize_identifier(&raw),
                "removed identifier prefix"
            );
        }
        identifiers.insert(&raw);
    }

    info!(
        path = %query.path.display(),
        identifiers = identifiers.len(),
        filtered_out,
        prefixed,
        "built identifier set"
    );
    Ok(identifiers)
}
