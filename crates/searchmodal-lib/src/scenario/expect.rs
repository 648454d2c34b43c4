use serde::{Deserialize, Serialize};

use crate::widget::{
    ActionStatus, FilterCategory, ModalView, Phase, RequestKind, SearchSession,
};

/// One assertion about the modal after the preceding actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Expectation {
    Phase { phase: Phase },
    FieldValue { value: String },
    FieldFocused { value: bool },
    ClearEnabled { value: bool },
    TypeaheadCount { count: usize },
    TypeaheadClosed,
    CursorText { text: String },
    FilterVisible { value: bool },
    FilterChecked { category: FilterCategory },
    FilterEnabled { category: FilterCategory, value: bool },
    FilterTotals { attribute: String },
    SummaryContains { text: String },
    SummaryAbsent,
    NoResultsContains { text: String },
    NoResultsAbsent,
    /// `term: ~` asserts the button is absent.
    SuggestionButton { term: Option<String> },
    ResultCount { count: usize },
    PaginationLabel { text: String },
    PaginationHidden,
    ResultExpanded { index: usize, value: bool },
    HelpResultCount { count: usize },
    SuggestionsPanel { visible: bool },
    PreviousSearches { visible: bool },
    /// The most recent request of `kind` contains every fragment.
    RequestIssued { kind: RequestKind, contains: Vec<String> },
    LastAction { applied: bool },
}

/// What an expectation is checked against.
pub struct Observed<'a> {
    pub session: &'a SearchSession,
    pub view: &'a ModalView,
    pub last_status: Option<ActionStatus>,
}

impl Expectation {
    /// `Ok(())` when the expectation holds, otherwise the observed value.
    pub fn check(&self, observed: &Observed<'_>) -> Result<(), String> {
        let view = observed.view;
        match self {
            Expectation::Phase { phase } => compare(phase, &view.phase),
            Expectation::FieldValue { value } => compare(value, &view.field_value),
            Expectation::FieldFocused { value } => compare(value, &view.field_focused),
            Expectation::ClearEnabled { value } => compare(value, &view.clear_enabled),
            Expectation::TypeaheadCount { count } => {
                compare(&Some(*count), &view.typeahead.as_ref().map(Vec::len))
            }
            Expectation::TypeaheadClosed => compare(&None, &view.typeahead.as_ref().map(Vec::len)),
            Expectation::CursorText { text } => compare(&Some(text.as_str()), &view.cursor_text()),
            Expectation::FilterVisible { value } => compare(value, &view.filters.is_some()),
            Expectation::FilterChecked { category } => {
                compare(&Some(*category), &view.checked_filter())
            }
            Expectation::FilterEnabled { category, value } => compare(
                &Some(*value),
                &view.filter_control(*category).map(|c| c.enabled),
            ),
            Expectation::FilterTotals { attribute } => {
                compare(&Some(attribute.as_str()), &view.filter_totals.as_deref())
            }
            Expectation::SummaryContains { text } => contains(view.summary.as_deref(), text),
            Expectation::SummaryAbsent => compare(&None, &view.summary.as_deref()),
            Expectation::NoResultsContains { text } => {
                contains(view.no_results_message.as_deref(), text)
            }
            Expectation::NoResultsAbsent => compare(&None, &view.no_results_message.as_deref()),
            Expectation::SuggestionButton { term } => {
                compare(&term.as_deref(), &view.suggestion_button.as_deref())
            }
            Expectation::ResultCount { count } => compare(count, &view.results.len()),
            Expectation::PaginationLabel { text } => {
                compare(&Some(text.as_str()), &view.pagination.as_deref())
            }
            Expectation::PaginationHidden => compare(&None, &view.pagination.as_deref()),
            Expectation::ResultExpanded { index, value } => compare(
                &Some(*value),
                &view.results.get(*index).map(|r| r.expanded),
            ),
            Expectation::HelpResultCount { count } => compare(count, &view.help_result_count),
            Expectation::SuggestionsPanel { visible } => {
                compare(visible, &view.suggestions_panel_visible)
            }
            Expectation::PreviousSearches { visible } => {
                compare(visible, &view.previous_searches.is_some())
            }
            Expectation::RequestIssued { kind, contains } => {
                let last = observed
                    .session
                    .requests()
                    .iter()
                    .rev()
                    .find(|r| r.kind == *kind);
                match last {
                    Some(req) if contains.iter().all(|f| req.url.contains(f.as_str())) => Ok(()),
                    Some(req) => Err(req.url.clone()),
                    None => Err(format!("no {kind} request")),
                }
            }
            Expectation::LastAction { applied } => compare(
                &Some(*applied),
                &observed.last_status.map(ActionStatus::is_applied),
            ),
        }
    }
}

fn compare<T: PartialEq + std::fmt::Debug>(expected: &T, actual: &T) -> Result<(), String> {
    if expected == actual {
        Ok(())
    } else {
        Err(format!("{actual:?}"))
    }
}

fn contains(actual: Option<&str>, needle: &str) -> Result<(), String> {
    match actual {
        Some(text) if text.contains(needle) => Ok(()),
        other => Err(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::widget::{DemoCatalog, SessionSettings, UserAction};

    fn observed_after(actions: &[UserAction]) -> (SearchSession, ModalView) {
        let catalog = DemoCatalog::demo();
        let settings = SessionSettings::from_config(&HarnessConfig::default()).unwrap();
        let session = SearchSession::open(&settings, &catalog).apply_all(actions, &catalog);
        let view = session.view();
        (session, view)
    }

    #[test]
    fn test_yaml_shape() {
        let e: Expectation =
            serde_yaml::from_str("check: filter_enabled\ncategory: other\nvalue: false\n").unwrap();
        assert_eq!(
            e,
            Expectation::FilterEnabled {
                category: FilterCategory::Other,
                value: false
            }
        );
        let e: Expectation = serde_yaml::from_str("check: suggestion_button\nterm: ~\n").unwrap();
        assert_eq!(e, Expectation::SuggestionButton { term: None });
    }

    #[test]
    fn test_checks_against_launch() {
        let (session, view) = observed_after(&[]);
        let observed = Observed {
            session: &session,
            view: &view,
            last_status: None,
        };
        assert!(Expectation::Phase { phase: Phase::Launch }.check(&observed).is_ok());
        assert!(Expectation::HelpResultCount { count: 3 }.check(&observed).is_ok());
        assert!(Expectation::SummaryAbsent.check(&observed).is_ok());
        assert_eq!(
            Expectation::ClearEnabled { value: true }.check(&observed),
            Err("false".to_string())
        );
        assert_eq!(
            Expectation::RequestIssued {
                kind: RequestKind::Search,
                contains: vec![]
            }
            .check(&observed),
            Err("no search request".to_string())
        );
    }

    #[test]
    fn test_request_issued() {
        let (session, view) = observed_after(&[
            UserAction::Type {
                text: "Bullying".into(),
            },
            UserAction::Enter,
        ]);
        let observed = Observed {
            session: &session,
            view: &view,
            last_status: Some(ActionStatus::Applied),
        };
        let ok = Expectation::RequestIssued {
            kind: RequestKind::Search,
            contains: vec!["search-modal=Bullying".into(), "search_filter=all".into()],
        };
        assert!(ok.check(&observed).is_ok());

        let bad = Expectation::RequestIssued {
            kind: RequestKind::Search,
            contains: vec!["search_filter=guides".into()],
        };
        assert!(bad.check(&observed).unwrap_err().contains("search_filter=all"));
        assert!(Expectation::LastAction { applied: true }.check(&observed).is_ok());
    }
}
