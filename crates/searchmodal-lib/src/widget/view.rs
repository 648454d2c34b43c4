//! What the modal shows for a given session.
//!
//! `ModalView` carries every observable the browser assertions read back
//! from the page: field state, the typeahead listbox, filter radios, summary
//! copy, results, pagination and the launch panels.

use serde::Serialize;

use super::filter::{FilterCategory, ResultKind};
use super::session::{Phase, SearchSession};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionView {
    pub text: String,
    pub is_cursor: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterControl {
    pub category: FilterCategory,
    pub count: usize,
    pub checked: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub kind: ResultKind,
    pub title: String,
    pub expandable: bool,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalView {
    pub phase: Phase,
    pub field_value: String,
    pub field_focused: bool,
    pub clear_enabled: bool,
    /// `None` while the listbox is closed.
    pub typeahead: Option<Vec<SuggestionView>>,
    /// `None` while the filter fieldset is hidden.
    pub filters: Option<Vec<FilterControl>>,
    /// `data-content-filter-totals` attribute of the filter fieldset.
    pub filter_totals: Option<String>,
    pub summary: Option<String>,
    pub no_results_message: Option<String>,
    pub suggestion_button: Option<String>,
    pub results: Vec<ResultView>,
    pub pagination: Option<String>,
    pub suggestions_panel_visible: bool,
    pub popular_searches: Vec<String>,
    pub previous_searches: Option<Vec<String>>,
    /// Help results visible in the launch panels.
    pub help_result_count: usize,
}

impl ModalView {
    pub fn checked_filter(&self) -> Option<FilterCategory> {
        self.filters
            .as_ref()
            .and_then(|f| f.iter().find(|c| c.checked))
            .map(|c| c.category)
    }

    pub fn filter_control(&self, category: FilterCategory) -> Option<&FilterControl> {
        self.filters
            .as_ref()
            .and_then(|f| f.iter().find(|c| c.category == category))
    }

    pub fn cursor_text(&self) -> Option<&str> {
        self.typeahead
            .as_ref()
            .and_then(|t| t.iter().find(|s| s.is_cursor))
            .map(|s| s.text.as_str())
    }
}

/// `64 results for “Bullying”`, `40 Guides match “Bullying”`.
pub fn summary_text(count: usize, filter: FilterCategory, query: &str) -> String {
    let label = filter.label(count);
    match filter {
        FilterCategory::All => format!("{count} {label} for “{query}”"),
        _ => {
            let verb = if count == 1 { "matches" } else { "match" };
            format!("{count} {label} {verb} “{query}”")
        }
    }
}

pub fn no_results_text(query: &str) -> String {
    format!(
        "Sorry, nothing matches your search “{query}”. Try a different search term or try a popular search."
    )
}

/// `Load 20 more results`, `Load 1 more result`.
pub fn pagination_text(next: usize) -> String {
    let noun = if next == 1 { "result" } else { "results" };
    format!("Load {next} more {noun}")
}

pub(super) fn render(session: &SearchSession) -> ModalView {
    // An open typeahead overlays whatever the modal was showing.
    let content = session.resting_phase();
    let query = session.submitted_query().unwrap_or_default();

    let typeahead = session.typeahead().map(|t| {
        t.suggestions()
            .iter()
            .map(|s| SuggestionView {
                text: s.display_text(),
                is_cursor: s.is_cursor,
            })
            .collect()
    });

    let totals = session.totals().copied().filter(|_| content.shows_results());

    let filters = totals.map(|totals| {
        FilterCategory::all()
            .iter()
            .map(|&category| FilterControl {
                category,
                count: totals.get(category),
                checked: category == session.filter(),
                enabled: session.filter_enabled(category),
            })
            .collect()
    });

    let summary = totals.map(|t| summary_text(t.get(session.filter()), session.filter(), query));

    let no_results_message = (content == Phase::NoResults).then(|| no_results_text(query));

    let results = if content.shows_results() {
        session
            .results()
            .iter()
            .map(|r| ResultView {
                kind: r.kind,
                title: r.title.clone(),
                expandable: r.is_expandable(),
                expanded: r.expanded,
            })
            .collect()
    } else {
        Vec::new()
    };

    let pagination = match content {
        Phase::ResultsAll | Phase::ResultsFiltered if session.remaining() > 0 => Some(
            pagination_text(session.remaining().min(session.settings().page_size)),
        ),
        _ => None,
    };

    let suggestions_panel_visible = content.shows_suggestions();
    let previous_searches = (content == Phase::Launch && !session.history().is_empty())
        .then(|| session.history().to_vec());

    ModalView {
        phase: session.phase(),
        field_value: session.query().to_string(),
        field_focused: session.field_focused(),
        clear_enabled: session.clear_enabled(),
        typeahead,
        filters,
        filter_totals: totals.map(|t| t.to_attribute()),
        summary,
        no_results_message,
        suggestion_button: session.suggestion_term().map(str::to_string),
        results,
        pagination,
        suggestions_panel_visible,
        popular_searches: if suggestions_panel_visible {
            session.popular_searches().to_vec()
        } else {
            Vec::new()
        },
        previous_searches,
        help_result_count: if suggestions_panel_visible {
            session.help_results().len()
        } else {
            0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::widget::catalog::DemoCatalog;
    use crate::widget::session::{SessionSettings, UserAction};

    fn run(actions: &[UserAction]) -> ModalView {
        let catalog = DemoCatalog::demo();
        let settings = SessionSettings::from_config(&HarnessConfig::default()).unwrap();
        SearchSession::open(&settings, &catalog)
            .apply_all(actions, &catalog)
            .view()
    }

    fn search(query: &str) -> Vec<UserAction> {
        vec![
            UserAction::Type { text: query.into() },
            UserAction::Enter,
        ]
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(summary_text(0, FilterCategory::All, "balloons"), "0 results for “balloons”");
        assert_eq!(summary_text(1, FilterCategory::All, "x"), "1 result for “x”");
        assert_eq!(
            summary_text(40, FilterCategory::Guides, "Bullying"),
            "40 Guides match “Bullying”"
        );
        assert_eq!(
            summary_text(1, FilterCategory::Resources, "x"),
            "1 Resource matches “x”"
        );
    }

    #[test]
    fn test_pagination_text() {
        assert_eq!(pagination_text(20), "Load 20 more results");
        assert_eq!(pagination_text(1), "Load 1 more result");
    }

    #[test]
    fn test_launch_view() {
        let view = run(&[]);
        assert_eq!(view.phase, Phase::Launch);
        assert!(view.field_focused);
        assert!(!view.clear_enabled);
        assert!(view.filters.is_none());
        assert!(view.summary.is_none());
        assert!(view.no_results_message.is_none());
        assert!(view.suggestions_panel_visible);
        assert!(view.previous_searches.is_none());
        assert_eq!(view.help_result_count, 3);
        assert!(view.results.is_empty());
    }

    #[test]
    fn test_no_results_view() {
        let view = run(&search("balloons"));
        assert_eq!(view.phase, Phase::NoResults);
        assert_eq!(view.summary.as_deref(), Some("0 results for “balloons”"));
        assert!(view.no_results_message.as_deref().unwrap().contains("“balloons”"));
        assert_eq!(view.checked_filter(), Some(FilterCategory::All));
        assert!(view.suggestions_panel_visible);
        assert_eq!(view.help_result_count, 3);
        assert!(view.previous_searches.is_none());
        assert!(view.pagination.is_none());
        assert!(view.suggestion_button.is_none());
    }

    #[test]
    fn test_results_view() {
        let view = run(&search("Bullying"));
        assert_eq!(view.phase, Phase::ResultsAll);
        assert_eq!(
            view.filter_totals.as_deref(),
            Some(r#"{"all":64,"guides":40,"suggestions":20,"resources":3,"other":0}"#)
        );
        assert_eq!(view.summary.as_deref(), Some("64 results for “Bullying”"));
        assert_eq!(view.results.len(), 16);
        assert_eq!(view.pagination.as_deref(), Some("Load 20 more results"));
        assert!(!view.suggestions_panel_visible);
        assert_eq!(view.help_result_count, 0);

        let other = view.filter_control(FilterCategory::Other).unwrap();
        assert!(!other.enabled);
        assert!(view
            .filters
            .unwrap()
            .iter()
            .filter(|c| c.category != FilterCategory::Other)
            .all(|c| c.enabled));
    }

    #[test]
    fn test_typeahead_overlays_launch() {
        let view = run(&[
            UserAction::Type { text: "Lea".into() },
            UserAction::ArrowDown,
        ]);
        assert_eq!(view.phase, Phase::Typeahead);
        assert_eq!(view.typeahead.as_ref().map(Vec::len), Some(10));
        assert_eq!(view.cursor_text(), Some("Leadership"));
        assert!(view.suggestions_panel_visible);
    }

    #[test]
    fn test_previous_searches_after_reset() {
        let mut actions = search("Bullying");
        actions.push(UserAction::ClickReset);
        let view = run(&actions);
        assert_eq!(view.previous_searches, Some(vec!["Bullying".to_string()]));
        assert!(view.filters.is_none());
        assert_eq!(view.help_result_count, 3);
    }
}
