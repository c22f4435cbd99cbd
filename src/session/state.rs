//! Search session state and view selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::messages;
use crate::schools::model::School;

/// What occupies the results area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum Panel {
    /// Nothing searched yet.
    Welcome,
    /// A request is in flight.
    Loading,
    /// The last request failed.
    Error { message: String },
    /// The last request returned schools.
    Results { schools: Vec<School> },
    /// The last request returned no schools.
    Empty,
}

/// Everything a surface needs to draw the screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(flatten)]
    pub panel: Panel,
    /// Whether the "new search" action is offered.
    pub show_reset: bool,
    /// Whether the form must refuse input.
    pub form_disabled: bool,
    /// Current form reset token.
    pub form_token: u64,
}

/// Events fanned out to subscribers (WebSocket clients, terminal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The view changed.
    ViewChanged { view: ViewState },
    /// Loading finished after a search; bring the results into view.
    ScrollToResults,
    /// The session was reset; go back to the top.
    ScrollToTop,
    /// The form must reinitialize with this token.
    FormReset { token: u64 },
}

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket {
    pub id: Uuid,
    pub generation: u64,
}

/// Outcome of a recommendation request as the session records it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The recommender answered; the list may be empty.
    Found(Vec<School>),
    /// The recommender failed. The cause is only logged.
    Failed,
}

/// State of one search session. Only the controller mutates it.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    results: Vec<School>,
    is_loading: bool,
    error: Option<String>,
    has_searched: bool,
    generation: u64,
    form_token: u64,
    searched_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[School] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn form_token(&self) -> u64 {
        self.form_token
    }

    pub fn searched_at(&self) -> Option<DateTime<Utc>> {
        self.searched_at
    }

    /// Enter the loading state for a new search.
    pub(crate) fn begin_search(&mut self) -> SearchTicket {
        self.generation += 1;
        self.is_loading = true;
        self.error = None;
        self.results.clear();
        self.has_searched = true;
        self.searched_at = Some(Utc::now());

        SearchTicket {
            id: Uuid::new_v4(),
            generation: self.generation,
        }
    }

    /// Apply a finished search. Returns false, leaving state untouched, if
    /// the ticket belongs to an older generation.
    pub(crate) fn complete_search(&mut self, ticket: SearchTicket, outcome: SearchOutcome) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        match outcome {
            SearchOutcome::Found(schools) => {
                self.results = schools;
                self.error = None;
            }
            SearchOutcome::Failed => {
                self.results.clear();
                self.error = Some(messages::SEARCH_FAILED.to_string());
            }
        }
        self.is_loading = false;
        true
    }

    /// Back to the initial state, with a fresh form token.
    pub(crate) fn reset(&mut self) {
        self.results.clear();
        self.is_loading = false;
        self.error = None;
        self.has_searched = false;
        self.searched_at = None;
        self.generation += 1;
        self.form_token += 1;
    }

    /// Select the view. Priority: loading, error, results, empty, welcome.
    pub fn view(&self) -> ViewState {
        let panel = if self.is_loading {
            Panel::Loading
        } else if let Some(ref message) = self.error {
            Panel::Error {
                message: message.clone(),
            }
        } else if !self.results.is_empty() {
            Panel::Results {
                schools: self.results.clone(),
            }
        } else if self.has_searched {
            Panel::Empty
        } else {
            Panel::Welcome
        };

        ViewState {
            panel,
            show_reset: self.has_searched && !self.is_loading,
            form_disabled: self.is_loading,
            form_token: self.form_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(name: &str) -> School {
        School::new(name, "desc", "reason", vec!["Robótica".into()])
    }

    #[test]
    fn initial_view_is_welcome() {
        let state = SessionState::new();
        let view = state.view();
        assert_eq!(view.panel, Panel::Welcome);
        assert!(!view.show_reset);
        assert!(!view.form_disabled);
        assert_eq!(view.form_token, 0);
    }

    #[test]
    fn begin_search_enters_loading() {
        let mut state = SessionState::new();
        let ticket = state.begin_search();
        assert_eq!(ticket.generation, 1);
        assert!(state.searched_at().is_some());

        let view = state.view();
        assert_eq!(view.panel, Panel::Loading);
        assert!(view.form_disabled);
        assert!(!view.show_reset);
    }

    #[test]
    fn success_shows_results_in_order() {
        let mut state = SessionState::new();
        let ticket = state.begin_search();
        assert!(state.complete_search(ticket, SearchOutcome::Found(vec![school("B"), school("A")])));

        let view = state.view();
        match view.panel {
            Panel::Results { schools } => {
                let names: Vec<_> = schools.iter().map(|s| s.name.as_str()).collect();
                assert_eq!(names, vec!["B", "A"]);
            }
            other => panic!("expected results, got {other:?}"),
        }
        assert!(view.show_reset);
        assert!(!view.form_disabled);
        assert!(state.error().is_none());
    }

    #[test]
    fn empty_success_is_not_an_error() {
        let mut state = SessionState::new();
        let ticket = state.begin_search();
        state.complete_search(ticket, SearchOutcome::Found(vec![]));
        assert_eq!(state.view().panel, Panel::Empty);
    }

    #[test]
    fn failure_sets_fixed_message() {
        let mut state = SessionState::new();
        let ticket = state.begin_search();
        state.complete_search(ticket, SearchOutcome::Failed);

        assert!(!state.is_loading());
        assert!(state.results().is_empty());
        assert_eq!(
            state.view().panel,
            Panel::Error {
                message: messages::SEARCH_FAILED.to_string()
            }
        );
    }

    #[test]
    fn new_search_clears_previous_error() {
        let mut state = SessionState::new();
        let first = state.begin_search();
        state.complete_search(first, SearchOutcome::Failed);
        state.begin_search();
        assert!(state.error().is_none());
        assert_eq!(state.view().panel, Panel::Loading);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut state = SessionState::new();
        let ticket = state.begin_search();
        state.reset();

        assert!(!state.complete_search(ticket, SearchOutcome::Found(vec![school("Tarde")])));
        assert!(state.results().is_empty());
        assert_eq!(state.view().panel, Panel::Welcome);
    }

    #[test]
    fn reset_is_idempotent_in_view() {
        let mut state = SessionState::new();
        let ticket = state.begin_search();
        state.complete_search(ticket, SearchOutcome::Found(vec![school("A")]));

        state.reset();
        let once = state.view();
        state.reset();
        let twice = state.view();

        assert_eq!(once.panel, Panel::Welcome);
        assert_eq!(once.panel, twice.panel);
        assert_eq!(once.show_reset, twice.show_reset);
        assert!(!state.has_searched());
        assert_eq!(state.form_token(), 2);
    }

    #[test]
    fn view_serializes_flat() {
        let mut state = SessionState::new();
        let ticket = state.begin_search();
        state.complete_search(ticket, SearchOutcome::Failed);
        let json = serde_json::to_value(state.view()).unwrap();
        assert_eq!(json["panel"], "error");
        assert_eq!(json["message"], messages::SEARCH_FAILED);
        assert_eq!(json["show_reset"], true);
    }

    #[test]
    fn event_tags_are_snake_case() {
        let json = serde_json::to_value(SessionEvent::FormReset { token: 4 }).unwrap();
        assert_eq!(json["type"], "form_reset");
        assert_eq!(json["token"], 4);
        let json = serde_json::to_value(SessionEvent::ScrollToResults).unwrap();
        assert_eq!(json["type"], "scroll_to_results");
    }
}
