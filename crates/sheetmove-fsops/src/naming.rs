//! Folder-name parsing.

/// Separator between the identifier and the label in a folder name.
pub const ID_SEPARATOR: char = '-';

/// A folder name split into its identifier and optional label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderName<'a> {
    /// Text before the first separator, trimmed. The whole name when there is no separator.
    pub id: &'a str,
    /// Text after the first separator, trimmed.
    pub label: Option<&'a str>,
}

/// Split `"ID-Name"` at the first separator.
///
/// Names without a separator are treated as a bare identifier.
#[must_use]
pub fn parse_folder_name(name: &str) -> FolderName<'_> {
    match name.split_once(ID_SEPARATOR) {
        Some((id, label)) => FolderName {
            id: id.trim(),
            label: Some(label.trim()),
        },
        None => FolderName {
            id: name.trim(),
            label: None,
        },
    }
}
