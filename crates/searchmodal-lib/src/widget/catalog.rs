//! In-memory catalog standing in for the demo site's search endpoints.
//!
//! `DemoCatalog::demo()` reproduces the data the static demo pages serve;
//! other catalogs can be loaded from YAML.

use serde::{Deserialize, Serialize};

use super::backend::{SearchBackend, SearchPage, SearchQuery, SearchResult, TypeaheadSuggestion};
use super::filter::{ResultKind, ResultTotals};
use crate::errors::Result;
use crate::text;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub kind: ResultKind,
    pub title: String,
    /// Search terms this entry is indexed under, besides its title.
    #[serde(default)]
    pub terms: Vec<String>,
    #[serde(default)]
    pub detail: Option<String>,
    /// Initial hide/show state.
    #[serde(default)]
    pub expanded: bool,
}

impl CatalogEntry {
    fn matches(&self, query: &str) -> bool {
        self.terms.iter().any(|t| text::eq_folded(t, query)) || text::contains_folded(&self.title, query)
    }

    fn to_result(&self) -> SearchResult {
        SearchResult {
            kind: self.kind,
            title: self.title.clone(),
            expandable_detail: self.detail.clone(),
            expanded: self.detail.is_some() && self.expanded,
        }
    }
}

/// A canonical term and the synonyms that resolve to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymGroup {
    pub canonical: String,
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyTerm {
    pub term: String,
    #[serde(default)]
    pub expansion: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoCatalog {
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
    #[serde(default)]
    pub synonyms: Vec<SynonymGroup>,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyTerm>,
    #[serde(default)]
    pub popular: Vec<String>,
}

impl DemoCatalog {
    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// The data set served by the demo pages.
    pub fn demo() -> Self {
        let mut entries = Vec::new();

        let both = || vec!["bullying".to_string(), "child aggression syndrome".to_string()];
        let bullying = || vec!["bullying".to_string()];

        for n in 1..=37 {
            entries.push(guide(&format!("Responding to bullying, part {n}"), bullying()));
        }
        for title in [
            "Understanding Child Aggression Syndrome",
            "Child Aggression Syndrome in the classroom",
            "Supporting whānau through Child Aggression Syndrome",
        ] {
            entries.push(guide(title, both()));
        }
        for n in 1..=20 {
            entries.push(CatalogEntry {
                kind: ResultKind::Suggestion,
                title: format!("Bullying prevention idea {n}"),
                terms: bullying(),
                detail: None,
                expanded: false,
            });
        }
        entries.push(resource(
            "Child Aggression Syndrome fact sheet",
            "A printable two-page summary for staff rooms.",
            false,
        ));
        entries.push(resource(
            "Behaviour support toolkit",
            "Templates for behaviour plans and incident notes.",
            false,
        ));
        entries.push(resource(
            "Restorative practice posters",
            "Classroom posters describing restorative conversations.",
            true,
        ));
        for entry in entries.iter_mut().filter(|e| e.kind == ResultKind::Resource) {
            entry.terms = both();
        }

        entries.push(help("How to use search", vec![]));
        entries.push(help("Search tips: narrowing results with filters", vec![]));
        entries.push(help("Getting help with bullying", bullying()));

        entries.push(guide(
            "Universal Design for Learning overview",
            vec!["universal design for learning".into()],
        ));
        entries.push(guide(
            "Planning inclusive lessons",
            vec!["universal design for learning".into()],
        ));
        entries.push(guide("Dyslexia and literacy", vec!["dyslexia".into()]));

        let vocabulary = [
            ("Leadership", None),
            ("Learning Support", None),
            ("UDL", Some("Universal Design for Learning")),
            ("Learning Difficulties", None),
            ("Learner Agency", None),
            ("Lead Teachers", None),
            ("Learning Areas", None),
            ("Leavers", None),
            ("Early Learning", None),
            ("Learning Stories", None),
            ("Release Time", None),
            ("Clear Communication", None),
            ("Bullying", None),
            ("Child Aggression Syndrome", None),
            ("Anxiety", None),
            ("Dyslexia", None),
        ]
        .into_iter()
        .map(|(term, expansion)| VocabularyTerm {
            term: term.to_string(),
            expansion: expansion.map(str::to_string),
        })
        .collect();

        Self {
            entries,
            synonyms: vec![
                SynonymGroup {
                    canonical: "Child Aggression Syndrome".into(),
                    synonyms: vec!["Bullying".into(), "Harassment".into()],
                },
                SynonymGroup {
                    canonical: "Universal Design for Learning".into(),
                    synonyms: vec!["UDL".into()],
                },
            ],
            vocabulary,
            popular: vec!["Bullying".into(), "Anxiety".into(), "Dyslexia".into()],
        }
    }

    fn matching(&self, query: &str) -> impl Iterator<Item = &CatalogEntry> {
        let query = query.to_string();
        self.entries.iter().filter(move |e| e.matches(&query))
    }
}

fn guide(title: &str, terms: Vec<String>) -> CatalogEntry {
    CatalogEntry {
        kind: ResultKind::Guide,
        title: title.to_string(),
        terms,
        detail: None,
        expanded: false,
    }
}

fn resource(title: &str, detail: &str, expanded: bool) -> CatalogEntry {
    CatalogEntry {
        kind: ResultKind::Resource,
        title: title.to_string(),
        terms: Vec::new(),
        detail: Some(detail.to_string()),
        expanded,
    }
}

fn help(title: &str, terms: Vec<String>) -> CatalogEntry {
    CatalogEntry {
        kind: ResultKind::Help,
        title: title.to_string(),
        terms,
        detail: None,
        expanded: false,
    }
}

impl SearchBackend for DemoCatalog {
    fn typeahead(&self, query: &str, limit: usize) -> Vec<TypeaheadSuggestion> {
        self.vocabulary
            .iter()
            .map(|v| TypeaheadSuggestion::new(v.term.clone(), v.expansion.clone()))
            .filter(|s| text::contains_folded(&s.display_text(), query))
            .take(limit)
            .collect()
    }

    fn search(&self, query: &SearchQuery) -> SearchPage {
        let matched: Vec<&CatalogEntry> = self.matching(&query.query).collect();
        let totals = ResultTotals::tally(matched.iter().map(|e| e.kind));
        let results = matched
            .into_iter()
            .filter(|e| e.kind.matches(query.filter))
            .skip(query.offset)
            .take(query.limit)
            .map(CatalogEntry::to_result)
            .collect();

        tracing::debug!(
            query = %query.query,
            filter = %query.filter,
            offset = query.offset,
            total = totals.get(query.filter),
            "catalog search"
        );
        SearchPage { results, totals }
    }

    fn canonical_term(&self, query: &str) -> Option<String> {
        // A query that already is a canonical term never gets redirected.
        if self.synonyms.iter().any(|g| text::eq_folded(&g.canonical, query)) {
            return None;
        }
        self.synonyms
            .iter()
            .find(|g| g.synonyms.iter().any(|s| text::eq_folded(s, query)))
            .map(|g| g.canonical.clone())
    }

    fn help_results(&self) -> Vec<SearchResult> {
        self.entries
            .iter()
            .filter(|e| e.kind == ResultKind::Help)
            .map(CatalogEntry::to_result)
            .collect()
    }

    fn popular_searches(&self) -> Vec<String> {
        self.popular.clone()
    }
}
