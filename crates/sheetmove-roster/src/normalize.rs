//! Identifier normalization shared by spreadsheet values and folder names.

/// Literal prefix removed from identifiers before matching.
pub const ID_PREFIX: &str = "001-";

/// Trim surrounding whitespace and strip a leading [`ID_PREFIX`].
///
/// Applied to both sides of a comparison, so `"001-1234"` and `"1234"` meet as `"1234"`.
#[must_use]
pub fn normalize_identifier(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix(ID_PREFIX).unwrap_or(trimmed)
}

/// Key used for set membership: the normalized identifier folded to lowercase.
///
/// Spreadsheet values and folder IDs compare case-insensitively, so `p1234` finds
/// `P1234-Alice`.
#[must_use]
pub fn identifier_key(raw: &str) -> String {
    normalize_identifier(raw).to_lowercase()
}

/// Whether `raw` carries the prefix that normalization removes.
#[must_use]
pub fn has_id_prefix(raw: &str) -> bool {
    raw.trim().starts_with(ID_PREFIX)
}
