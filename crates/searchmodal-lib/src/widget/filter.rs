//! Result categories and per-category tallies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::HarnessError;

/// A result category the filter radios can restrict a search to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCategory {
    All,
    Guides,
    Suggestions,
    Resources,
    Other,
}

impl FilterCategory {
    /// Returns all categories in the order the filter radios are rendered.
    pub fn all() -> &'static [FilterCategory] {
        &[
            FilterCategory::All,
            FilterCategory::Guides,
            FilterCategory::Suggestions,
            FilterCategory::Resources,
            FilterCategory::Other,
        ]
    }

    /// Summary label, pluralised for any count other than one.
    pub fn label(self, count: usize) -> &'static str {
        let singular = count == 1;
        match self {
            FilterCategory::All if singular => "result",
            FilterCategory::All => "results",
            FilterCategory::Guides if singular => "Guide",
            FilterCategory::Guides => "Guides",
            FilterCategory::Suggestions if singular => "Suggestion",
            FilterCategory::Suggestions => "Suggestions",
            FilterCategory::Resources if singular => "Resource",
            FilterCategory::Resources => "Resources",
            FilterCategory::Other => "Other",
        }
    }

    /// The value submitted in the `search_filter` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterCategory::All => "all",
            FilterCategory::Guides => "guides",
            FilterCategory::Suggestions => "suggestions",
            FilterCategory::Resources => "resources",
            FilterCategory::Other => "other",
        }
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterCategory {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterCategory::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| HarnessError::Application(format!("unknown filter category: {s}")))
    }
}

/// What a single result is. `Help` results only ever count toward `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Guide,
    Suggestion,
    Resource,
    Other,
    Help,
}

impl ResultKind {
    /// Whether a result of this kind is visible under `filter`.
    pub fn matches(self, filter: FilterCategory) -> bool {
        match filter {
            FilterCategory::All => true,
            FilterCategory::Guides => self == ResultKind::Guide,
            FilterCategory::Suggestions => self == ResultKind::Suggestion,
            FilterCategory::Resources => self == ResultKind::Resource,
            FilterCategory::Other => self == ResultKind::Other,
        }
    }
}

/// One value per filter category.
///
/// Field order is the serialization order, which the demo page relies on
/// when it renders `data-content-filter-totals`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByCategory<T> {
    pub all: T,
    pub guides: T,
    pub suggestions: T,
    pub resources: T,
    pub other: T,
}

impl<T: Copy> ByCategory<T> {
    /// Same value for every category.
    pub fn uniform(value: T) -> Self {
        Self {
            all: value,
            guides: value,
            suggestions: value,
            resources: value,
            other: value,
        }
    }

    pub fn get(&self, category: FilterCategory) -> T {
        match category {
            FilterCategory::All => self.all,
            FilterCategory::Guides => self.guides,
            FilterCategory::Suggestions => self.suggestions,
            FilterCategory::Resources => self.resources,
            FilterCategory::Other => self.other,
        }
    }

    pub fn get_mut(&mut self, category: FilterCategory) -> &mut T {
        match category {
            FilterCategory::All => &mut self.all,
            FilterCategory::Guides => &mut self.guides,
            FilterCategory::Suggestions => &mut self.suggestions,
            FilterCategory::Resources => &mut self.resources,
            FilterCategory::Other => &mut self.other,
        }
    }
}

/// Match counts shown on the filter controls, independent of pagination.
pub type ResultTotals = ByCategory<usize>;

impl ResultTotals {
    /// Tally a set of result kinds into per-category counts.
    pub fn tally<I: IntoIterator<Item = ResultKind>>(kinds: I) -> Self {
        let mut totals = ResultTotals::default();
        for kind in kinds {
            for category in FilterCategory::all() {
                if kind.matches(*category) {
                    *totals.get_mut(*category) += 1;
                }
            }
        }
        totals
    }

    /// Render the `data-content-filter-totals` attribute value.
    pub fn to_attribute(&self) -> String {
        // A struct of plain integers cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}
