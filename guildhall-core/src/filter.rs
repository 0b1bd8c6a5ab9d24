//! Multi-column substring filter over fetched rows.
//!
//! A [`RowFilter`] holds a mapping from column index to search pattern and
//! decides whether a row of display cells is accepted. Matching is a
//! case-insensitive substring test. In [`MatchMode::Any`] one matching
//! column is enough; in [`MatchMode::All`] every configured column must match.
//! An empty filter accepts every row.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Row-acceptance policy for a multi-column filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Accept when at least one configured column contains its pattern.
    #[default]
    Any,
    /// Accept only when every configured column contains its pattern.
    All,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Any => "any",
            MatchMode::All => "all",
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string cannot be parsed into a `MatchMode`.
#[derive(Debug, Clone)]
pub struct MatchModeParseError(pub String);

impl std::fmt::Display for MatchModeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown match mode: '{}' (expected 'any' or 'all')", self.0)
    }
}

impl std::error::Error for MatchModeParseError {}

impl std::str::FromStr for MatchMode {
    type Err = MatchModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" => Ok(MatchMode::Any),
            "all" | "strict" => Ok(MatchMode::All),
            _ => Err(MatchModeParseError(s.to_string())),
        }
    }
}

/// Case-insensitive multi-column substring filter.
///
/// Patterns are stored lower-cased; blank patterns are dropped when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    filters: BTreeMap<usize, String>,
    mode: MatchMode,
}

impl RowFilter {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            filters: BTreeMap::new(),
            mode,
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: MatchMode) {
        self.mode = mode;
    }

    /// Replace all filters. Empty or whitespace-only patterns are ignored.
    pub fn set_filters<I, S>(&mut self, filters: I)
    where
        I: IntoIterator<Item = (usize, S)>,
        S: AsRef<str>,
    {
        self.filters = filters
            .into_iter()
            .filter(|(_, pattern)| !pattern.as_ref().trim().is_empty())
            .map(|(column, pattern)| (column, pattern.as_ref().to_lowercase()))
            .collect();
    }

    /// Search the same text across several columns (the unified search box).
    ///
    /// Blank text clears the filter.
    pub fn search_columns(&mut self, columns: &[usize], text: &str) {
        let text = text.trim();
        self.set_filters(columns.iter().map(|&column| (column, text)));
    }

    /// Remove every filter; the filter then accepts all rows.
    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// The active (lower-cased) patterns by column.
    pub fn filters(&self) -> &BTreeMap<usize, String> {
        &self.filters
    }

    /// Decide whether a row of display cells passes the filter.
    pub fn accepts<S: AsRef<str>>(&self, row: &[Option<S>]) -> bool {
        row_matches(&self.filters, row, self.mode)
    }

    /// Keep only the accepted rows.
    pub fn apply<'a, S: AsRef<str>>(&self, rows: &'a [Vec<Option<S>>]) -> Vec<&'a Vec<Option<S>>> {
        rows.iter().filter(|row| self.accepts(row)).collect()
    }
}

/// Test one row against a column → pattern mapping.
///
/// Cells are compared lower-cased. NULL cells and columns past the end of
/// the row read as the empty string. Blank patterns place no constraint on
/// their column. An empty mapping (or one holding only blank patterns)
/// accepts every row.
pub fn row_matches<P, S>(filters: &BTreeMap<usize, P>, row: &[Option<S>], mode: MatchMode) -> bool
where
    P: AsRef<str>,
    S: AsRef<str>,
{
    let mut active = filters
        .iter()
        .map(|(column, pattern)| (*column, pattern.as_ref()))
        .filter(|(_, pattern)| !pattern.trim().is_empty())
        .peekable();

    if active.peek().is_none() {
        return true;
    }

    let check = |(column, pattern): (usize, &str)| {
        let cell = row
            .get(column)
            .and_then(|cell| cell.as_ref())
            .map(|cell| cell.as_ref().to_lowercase())
            .unwrap_or_default();
        cell.contains(&pattern.to_lowercase())
    };

    match mode {
        MatchMode::Any => active.any(check),
        MatchMode::All => active.all(check),
    }
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
