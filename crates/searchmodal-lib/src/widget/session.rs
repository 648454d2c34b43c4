//! One lifecycle of the search modal, from launch to reset.
//!
//! A [`SearchSession`] is a plain value. [`SearchSession::apply`] consumes it
//! together with one [`UserAction`] and returns the next session plus whether
//! the action was reachable in the current view. Unreachable actions (a
//! disabled control, a hidden panel) are reported as
//! [`ActionStatus::Ignored`] and leave the session untouched.

use serde::{Deserialize, Serialize};

use super::backend::{SearchBackend, SearchPage, SearchQuery, SearchResult, TypeaheadSuggestion};
use super::filter::{ByCategory, FilterCategory, ResultTotals};
use super::request::{IssuedRequest, RequestEncoder, RequestKind};
use super::view::{self, ModalView};
use crate::config::HarnessConfig;
use crate::errors::Result;
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Launch,
    Typeahead,
    NoResults,
    ResultsAll,
    ResultsFiltered,
}

impl Phase {
    /// Phases in which the filter control and summary are rendered.
    pub fn shows_results(self) -> bool {
        matches!(
            self,
            Phase::NoResults | Phase::ResultsAll | Phase::ResultsFiltered
        )
    }

    /// Phases in which the popular-search suggestions are rendered.
    pub fn shows_suggestions(self) -> bool {
        matches!(self, Phase::Launch | Phase::NoResults)
    }
}

/// A discrete user interaction with the modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    Type { text: String },
    Backspace,
    ArrowDown,
    ArrowUp,
    Enter,
    ClickPopularSearch { term: String },
    ClickFilter { category: FilterCategory },
    ClickSuggestionTerm,
    ClickLoadMore,
    ToggleResult { index: usize },
    ClickReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ActionStatus {
    Applied,
    Ignored(&'static str),
}

impl ActionStatus {
    pub fn is_applied(self) -> bool {
        self == ActionStatus::Applied
    }
}

/// The open typeahead listbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typeahead {
    suggestions: Vec<TypeaheadSuggestion>,
    cursor: Option<usize>,
}

impl Typeahead {
    fn new(suggestions: Vec<TypeaheadSuggestion>) -> Self {
        let suggestions = suggestions
            .into_iter()
            .map(|mut s| {
                s.is_cursor = false;
                s
            })
            .collect();
        Self {
            suggestions,
            cursor: None,
        }
    }

    pub fn suggestions(&self) -> &[TypeaheadSuggestion] {
        &self.suggestions
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The suggestion under the cursor, if navigation has started.
    pub fn current(&self) -> Option<&TypeaheadSuggestion> {
        self.cursor.and_then(|i| self.suggestions.get(i))
    }

    fn move_down(&mut self) {
        let last = self.suggestions.len().saturating_sub(1);
        let next = match self.cursor {
            None => 0,
            Some(i) => (i + 1).min(last),
        };
        self.set_cursor(next);
    }

    fn move_up(&mut self) -> bool {
        match self.cursor {
            Some(i) => {
                self.set_cursor(i.saturating_sub(1));
                true
            }
            None => false,
        }
    }

    fn set_cursor(&mut self, index: usize) {
        for (n, s) in self.suggestions.iter_mut().enumerate() {
            s.is_cursor = n == index;
        }
        self.cursor = Some(index);
    }
}

/// Tunables for a session, normally taken from [`HarnessConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub typeahead_min_chars: usize,
    pub typeahead_limit: usize,
    pub initial_page_size: ByCategory<usize>,
    pub page_size: usize,
    pub history_limit: usize,
    pub encoder: RequestEncoder,
}

impl SessionSettings {
    pub fn from_config(config: &HarnessConfig) -> Result<Self> {
        Ok(Self {
            typeahead_min_chars: config.typeahead_min_chars,
            typeahead_limit: config.typeahead_limit,
            initial_page_size: config.initial_page_size,
            page_size: config.page_size,
            history_limit: config.history_limit,
            encoder: RequestEncoder::from_config(config)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    settings: SessionSettings,
    query: String,
    /// Hidden `search-modal__value` field.
    field_value: String,
    filter: FilterCategory,
    results: Vec<SearchResult>,
    totals: Option<ResultTotals>,
    submitted_query: Option<String>,
    suggestion_term: Option<String>,
    phase: Phase,
    /// Phase the modal returns to when the typeahead closes.
    resting_phase: Phase,
    typeahead: Option<Typeahead>,
    help_results: Vec<SearchResult>,
    popular_searches: Vec<String>,
    history: Vec<String>,
    requests: Vec<IssuedRequest>,
    field_focused: bool,
}

impl SearchSession {
    /// The modal has just opened.
    pub fn open(settings: &SessionSettings, backend: &dyn SearchBackend) -> Self {
        Self {
            settings: settings.clone(),
            query: String::new(),
            field_value: String::new(),
            filter: FilterCategory::All,
            results: Vec::new(),
            totals: None,
            submitted_query: None,
            suggestion_term: None,
            phase: Phase::Launch,
            resting_phase: Phase::Launch,
            typeahead: None,
            help_results: backend.help_results(),
            popular_searches: backend.popular_searches(),
            history: Vec::new(),
            requests: Vec::new(),
            field_focused: true,
        }
    }

    /// Apply one user action and return the resulting session.
    pub fn apply(self, action: &UserAction, backend: &dyn SearchBackend) -> (Self, ActionStatus) {
        let mut next = self;
        let status = next.step(action, backend);
        match status {
            ActionStatus::Applied => {
                tracing::debug!(?action, phase = ?next.phase, query = %next.query, "action applied")
            }
            ActionStatus::Ignored(reason) => {
                tracing::debug!(?action, phase = ?next.phase, reason, "action ignored")
            }
        }
        (next, status)
    }

    /// Apply a sequence of actions, discarding the per-action status.
    pub fn apply_all<'a>(
        self,
        actions: impl IntoIterator<Item = &'a UserAction>,
        backend: &dyn SearchBackend,
    ) -> Self {
        actions
            .into_iter()
            .fold(self, |session, action| session.apply(action, backend).0)
    }

    pub fn view(&self) -> ModalView {
        view::render(self)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn field_value(&self) -> &str {
        &self.field_value
    }

    pub fn filter(&self) -> FilterCategory {
        self.filter
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn totals(&self) -> Option<&ResultTotals> {
        self.totals.as_ref()
    }

    pub fn submitted_query(&self) -> Option<&str> {
        self.submitted_query.as_deref()
    }

    /// The canonical term on offer. The open typeahead covers it.
    pub fn suggestion_term(&self) -> Option<&str> {
        self.suggestion_term
            .as_deref()
            .filter(|_| matches!(self.phase, Phase::NoResults | Phase::ResultsFiltered))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The phase whose content is rendered beneath an open typeahead.
    pub fn resting_phase(&self) -> Phase {
        self.resting_phase
    }

    pub fn typeahead(&self) -> Option<&Typeahead> {
        self.typeahead.as_ref()
    }

    pub fn help_results(&self) -> &[SearchResult] {
        &self.help_results
    }

    pub fn popular_searches(&self) -> &[String] {
        &self.popular_searches
    }

    /// Previously submitted queries, most recent first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn requests(&self) -> &[IssuedRequest] {
        &self.requests
    }

    pub fn field_focused(&self) -> bool {
        self.field_focused
    }

    pub fn clear_enabled(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.results.len()
    }

    /// Total for the selected filter, or zero before any search.
    pub fn filter_total(&self) -> usize {
        self.totals.map(|t| t.get(self.filter)).unwrap_or(0)
    }

    /// Whether the radio for `category` accepts clicks.
    pub fn filter_enabled(&self, category: FilterCategory) -> bool {
        category == FilterCategory::All || self.totals.map(|t| t.get(category) > 0).unwrap_or(false)
    }

    /// Results still to load for the selected filter.
    pub fn remaining(&self) -> usize {
        self.filter_total().saturating_sub(self.loaded_count())
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn step(&mut self, action: &UserAction, backend: &dyn SearchBackend) -> ActionStatus {
        match action {
            UserAction::Type { text } => {
                if text.is_empty() {
                    return ActionStatus::Ignored("nothing typed");
                }
                self.field_focused = true;
                self.query.push_str(text);
                self.field_value = self.query.clone();
                self.refresh_typeahead(backend);
                ActionStatus::Applied
            }
            UserAction::Backspace => {
                if self.query.pop().is_none() {
                    return ActionStatus::Ignored("search field is empty");
                }
                self.field_focused = true;
                self.field_value = self.query.clone();
                if self.query.is_empty() {
                    self.return_to_launch();
                } else {
                    self.refresh_typeahead(backend);
                }
                ActionStatus::Applied
            }
            UserAction::ArrowDown => match self.typeahead.as_mut() {
                Some(typeahead) => {
                    typeahead.move_down();
                    ActionStatus::Applied
                }
                None => ActionStatus::Ignored("typeahead is closed"),
            },
            UserAction::ArrowUp => match self.typeahead.as_mut() {
                Some(typeahead) => {
                    if typeahead.move_up() {
                        ActionStatus::Applied
                    } else {
                        ActionStatus::Ignored("typeahead has no cursor")
                    }
                }
                None => ActionStatus::Ignored("typeahead is closed"),
            },
            UserAction::Enter => {
                if self.query.trim().is_empty() {
                    return ActionStatus::Ignored("search field is empty");
                }
                if let Some(chosen) = self.typeahead.as_ref().and_then(Typeahead::current) {
                    self.query = chosen.term.clone();
                    self.field_value = chosen.field_value().to_string();
                }
                self.field_focused = true;
                self.submit(backend);
                ActionStatus::Applied
            }
            UserAction::ClickPopularSearch { term } => {
                if !self.resting_phase.shows_suggestions() {
                    return ActionStatus::Ignored("popular searches are hidden");
                }
                let Some(term) = self
                    .popular_searches
                    .iter()
                    .find(|p| text::eq_folded(p, term))
                    .cloned()
                else {
                    return ActionStatus::Ignored("not a popular search");
                };
                self.close_typeahead();
                self.field_focused = false;
                self.query = term.clone();
                self.field_value = term;
                self.record(RequestKind::Typeahead, self.settings.encoder.typeahead_url(&self.query));
                self.submit(backend);
                ActionStatus::Applied
            }
            UserAction::ClickFilter { category } => {
                if !self.resting_phase.shows_results() {
                    return ActionStatus::Ignored("filter control is hidden");
                }
                if !self.filter_enabled(*category) {
                    return ActionStatus::Ignored("filter control is disabled");
                }
                if *category == self.filter {
                    return ActionStatus::Ignored("filter is already selected");
                }
                self.close_typeahead();
                self.field_focused = false;
                self.results.clear();
                self.filter = *category;
                self.submit(backend);
                ActionStatus::Applied
            }
            UserAction::ClickSuggestionTerm => {
                let Some(term) = self.suggestion_term().map(str::to_string) else {
                    return ActionStatus::Ignored("no suggestion term is offered");
                };
                self.field_focused = false;
                self.query = term.clone();
                self.field_value = term;
                self.submit(backend);
                ActionStatus::Applied
            }
            UserAction::ClickLoadMore => {
                if !matches!(self.resting_phase, Phase::ResultsAll | Phase::ResultsFiltered) {
                    return ActionStatus::Ignored("no results are shown");
                }
                if self.remaining() == 0 {
                    return ActionStatus::Ignored("all results are loaded");
                }
                self.close_typeahead();
                self.field_focused = false;
                self.load_more(backend);
                ActionStatus::Applied
            }
            UserAction::ToggleResult { index } => match self.results.get_mut(*index) {
                Some(result) if result.is_expandable() => {
                    result.expanded = !result.expanded;
                    ActionStatus::Applied
                }
                Some(_) => ActionStatus::Ignored("result has no hide/show toggle"),
                None => ActionStatus::Ignored("no such result"),
            },
            UserAction::ClickReset => {
                if !self.clear_enabled() {
                    return ActionStatus::Ignored("clear control is disabled");
                }
                self.reset();
                ActionStatus::Applied
            }
        }
    }

    fn refresh_typeahead(&mut self, backend: &dyn SearchBackend) {
        if self.query.chars().count() < self.settings.typeahead_min_chars {
            self.close_typeahead();
            return;
        }

        self.record(RequestKind::Typeahead, self.settings.encoder.typeahead_url(&self.query));
        let suggestions = backend.typeahead(&self.query, self.settings.typeahead_limit);
        if suggestions.is_empty() {
            self.close_typeahead();
            return;
        }

        let mut suggestions = suggestions;
        suggestions.truncate(self.settings.typeahead_limit);
        self.typeahead = Some(Typeahead::new(suggestions));
        self.phase = Phase::Typeahead;
    }

    fn close_typeahead(&mut self) {
        self.typeahead = None;
        self.phase = self.resting_phase;
    }

    /// Drop every trace of the last search and show the launch panels.
    fn return_to_launch(&mut self) {
        self.filter = FilterCategory::All;
        self.results.clear();
        self.totals = None;
        self.submitted_query = None;
        self.suggestion_term = None;
        self.typeahead = None;
        self.phase = Phase::Launch;
        self.resting_phase = Phase::Launch;
    }

    fn reset(&mut self) {
        self.query.clear();
        self.field_value.clear();
        self.return_to_launch();
        self.field_focused = true;

        let limit = self.settings.initial_page_size.get(FilterCategory::All);
        let url = self
            .settings
            .encoder
            .search_url("", "", FilterCategory::All, 0, limit);
        self.record(RequestKind::Search, url);
    }

    fn submit(&mut self, backend: &dyn SearchBackend) {
        self.typeahead = None;
        let query = self.query.trim().to_string();

        let mut page = self.fetch_first_page(&query, backend);
        if page.totals.all > 0 && page.totals.get(self.filter) == 0 {
            tracing::debug!(filter = %self.filter, "selected filter has no matches, falling back to all");
            self.filter = FilterCategory::All;
            page = self.fetch_first_page(&query, backend);
        }

        let totals = page.totals;
        self.phase = if totals.all == 0 {
            self.filter = FilterCategory::All;
            self.results.clear();
            Phase::NoResults
        } else if self.filter == FilterCategory::All {
            Phase::ResultsAll
        } else {
            Phase::ResultsFiltered
        };

        if self.phase != Phase::NoResults {
            let shown = self
                .settings
                .initial_page_size
                .get(self.filter)
                .min(totals.get(self.filter));
            let mut results = page.results;
            results.truncate(shown);
            self.results = results;
        }

        self.totals = Some(totals);
        self.suggestion_term = match self.phase {
            Phase::NoResults | Phase::ResultsFiltered => backend.canonical_term(&query),
            _ => None,
        };
        self.resting_phase = self.phase;
        self.remember(&query);
        self.submitted_query = Some(query);
    }

    fn fetch_first_page(&mut self, query: &str, backend: &dyn SearchBackend) -> SearchPage {
        let limit = self.settings.initial_page_size.get(self.filter);
        let url = self
            .settings
            .encoder
            .search_url(query, &self.field_value, self.filter, 0, limit);
        self.record(RequestKind::Search, url);
        backend.search(&SearchQuery {
            query: query.to_string(),
            filter: self.filter,
            offset: 0,
            limit,
        })
    }

    fn load_more(&mut self, backend: &dyn SearchBackend) {
        let query = self.submitted_query.clone().unwrap_or_default();
        let offset = self.loaded_count();
        let limit = self.settings.page_size;
        let url = self
            .settings
            .encoder
            .search_url(&query, &self.field_value, self.filter, offset, limit);
        self.record(RequestKind::Append, url);

        let page = backend.search(&SearchQuery {
            query,
            filter: self.filter,
            offset,
            limit,
        });
        let take = limit.min(self.remaining());
        self.results.extend(page.results.into_iter().take(take));
    }

    fn remember(&mut self, query: &str) {
        if query.is_empty() || self.settings.history_limit == 0 {
            return;
        }
        self.history.retain(|q| !text::eq_folded(q, query));
        self.history.insert(0, query.to_string());
        self.history.truncate(self.settings.history_limit);
    }

    fn record(&mut self, kind: RequestKind, url: String) {
        tracing::debug!(%kind, %url, "request issued");
        self.requests.push(IssuedRequest { kind, url });
    }
}
