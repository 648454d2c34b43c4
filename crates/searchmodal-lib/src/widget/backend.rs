//! The seam between the modal and whatever answers its search requests.

use serde::{Deserialize, Serialize};

use super::filter::{FilterCategory, ResultKind, ResultTotals};

/// One matched item in the results list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub kind: ResultKind,
    pub title: String,
    #[serde(default)]
    pub expandable_detail: Option<String>,
    #[serde(default)]
    pub expanded: bool,
}

impl SearchResult {
    /// Whether the result renders a hide/show toggle.
    pub fn is_expandable(&self) -> bool {
        self.expandable_detail.is_some()
    }
}

/// One entry of the typeahead listbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeaheadSuggestion {
    /// Text adopted into the search field.
    pub term: String,
    /// Long form submitted as `search-modal__value`, shown in brackets.
    #[serde(default)]
    pub expansion: Option<String>,
    #[serde(default)]
    pub is_cursor: bool,
}

impl TypeaheadSuggestion {
    pub fn new(term: impl Into<String>, expansion: Option<String>) -> Self {
        Self {
            term: term.into(),
            expansion,
            is_cursor: false,
        }
    }

    /// Listbox text, e.g. `UDL (Universal Design for Learning)`.
    pub fn display_text(&self) -> String {
        match &self.expansion {
            Some(expansion) => format!("{} ({})", self.term, expansion),
            None => self.term.clone(),
        }
    }

    /// Value of the hidden field that travels with the search request.
    pub fn field_value(&self) -> &str {
        self.expansion.as_deref().unwrap_or(&self.term)
    }
}

/// A request for one page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub filter: FilterCategory,
    pub offset: usize,
    pub limit: usize,
}

/// One page of results plus the unpaginated per-category totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub totals: ResultTotals,
}

/// Source of typeahead suggestions, results and the supporting panels.
///
/// Implementations answer synchronously; the session processes one action
/// to completion before the next.
pub trait SearchBackend {
    /// Up to `limit` suggestions for the current field text.
    fn typeahead(&self, query: &str, limit: usize) -> Vec<TypeaheadSuggestion>;

    /// The page `[offset, offset + limit)` of matches for `query` under `filter`.
    fn search(&self, query: &SearchQuery) -> SearchPage;

    /// The preferred term when `query` is a known synonym of it.
    fn canonical_term(&self, query: &str) -> Option<String>;

    /// Results shown on the launch view.
    fn help_results(&self) -> Vec<SearchResult>;

    fn popular_searches(&self) -> Vec<String>;
}
