//! Organisation code → external identifier mapping.
//!
//! The mapping is built once per run from the identifier source (the Spine directory
//! export, one row per ASID) and is read-only afterwards. Lookups are pure; reporting a
//! miss is the caller's job.

use indexmap::IndexMap;
use thiserror::Error;

/// Column holding the organisation code in the Spine directory export.
pub const SPINE_CODE_COLUMN: &str = "NACS";
/// Column holding the identifier in the Spine directory export.
pub const SPINE_IDENTIFIER_COLUMN: &str = "ASID";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    /// A source row lacks one of the required columns. `row` is 1-based, excluding the header.
    #[error("identifier source row {row} has no '{column}' column")]
    MissingColumn { column: &'static str, row: usize },
}

/// One (organisation code, identifier) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierRow {
    pub code: String,
    pub identifier: String,
}

impl IdentifierRow {
    pub fn new(code: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            identifier: identifier.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierLookup {
    mapping: IndexMap<String, Vec<String>>,
}

impl IdentifierLookup {
    /// Builds the lookup, appending each row's identifier to its code's list.
    ///
    /// Codes keep first-seen order; identifiers keep row order and are not deduplicated.
    pub fn from_rows(rows: impl IntoIterator<Item = IdentifierRow>) -> Self {
        let mut mapping: IndexMap<String, Vec<String>> = IndexMap::new();
        for row in rows {
            mapping.entry(row.code).or_default().push(row.identifier);
        }
        Self { mapping }
    }

    /// Builds the lookup from header-keyed rows of the Spine directory export.
    ///
    /// Columns other than `NACS` and `ASID` are ignored.
    pub fn from_spine_directory_format(
        rows: impl IntoIterator<Item = IndexMap<String, String>>,
    ) -> Result<Self, LookupError> {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, mut row)| {
                let mut take = |column: &'static str| {
                    row.swap_remove(column).ok_or(LookupError::MissingColumn {
                        column,
                        row: index + 1,
                    })
                };
                Ok(IdentifierRow {
                    code: take(SPINE_CODE_COLUMN)?,
                    identifier: take(SPINE_IDENTIFIER_COLUMN)?,
                })
            })
            .collect::<Result<Vec<_>, LookupError>>()?;

        Ok(Self::from_rows(rows))
    }

    /// True iff at least one identifier is recorded for `code`.
    pub fn has_code(&self, code: &str) -> bool {
        self.mapping.get(code).is_some_and(|ids| !ids.is_empty())
    }

    /// Identifiers recorded for `code`; empty when the code is absent.
    pub fn identifiers_for(&self, code: &str) -> &[String] {
        self.mapping.get(code).map(Vec::as_slice).unwrap_or_default()
    }

    /// Distinct codes in first-seen order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.mapping.keys().map(String::as_str)
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

impl FromIterator<IdentifierRow> for IdentifierLookup {
    fn from_iter<I: IntoIterator<Item = IdentifierRow>>(iter: I) -> Self {
        Self::from_rows(iter)
    }
}
