//! Search controller: owns the session state and runs the one-shot
//! recommendation request lifecycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{RecommendError, SessionError};
use crate::schools::model::{School, UserProfile};
use crate::schools::recommender::SchoolRecommender;

use super::state::{Panel, SearchOutcome, SearchTicket, SessionEvent, SessionState, ViewState};

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 256;

/// Configuration for the search controller.
#[derive(Debug, Clone, Default)]
pub struct ControllerConfig {
    /// Give up on the recommender after this long. `None` waits forever.
    pub request_timeout: Option<Duration>,
}

/// Owns one search session. Searches (`start`/`submit`) and `reset` are
/// the only transitions.
pub struct SearchController {
    state: RwLock<SessionState>,
    recommender: Arc<dyn SchoolRecommender>,
    config: ControllerConfig,
    tx: broadcast::Sender<SessionEvent>,
}

impl SearchController {
    pub fn new(recommender: Arc<dyn SchoolRecommender>, config: ControllerConfig) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            state: RwLock::new(SessionState::new()),
            recommender,
            config,
            tx,
        })
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Current view.
    pub async fn view(&self) -> ViewState {
        self.state.read().await.view()
    }

    /// Snapshot of the raw session state.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Run a search for `profile` and wait for it to finish.
    ///
    /// Fails with `SearchInFlight` if another search is loading, and with
    /// `Superseded` if the session was reset before the answer arrived (the
    /// answer is then dropped). Dropping the returned future does not cancel
    /// the search; the session still leaves the loading state.
    pub async fn submit(self: &Arc<Self>, profile: UserProfile) -> Result<ViewState, SessionError> {
        let (ticket, search) = self.start(profile).await?;
        match search.await {
            Ok(result) => result,
            Err(e) => {
                error!(search_id = %ticket.id, error = %e, "Search task aborted");
                self.finish(ticket, SearchOutcome::Failed).await
            }
        }
    }

    /// Enter the loading state and run the recommender on its own task.
    ///
    /// The in-flight check and the state change happen under one lock, so
    /// concurrent callers see exactly one winner.
    pub async fn start(
        self: &Arc<Self>,
        profile: UserProfile,
    ) -> Result<(SearchTicket, JoinHandle<Result<ViewState, SessionError>>), SessionError> {
        let (ticket, loading_view) = {
            let mut state = self.state.write().await;
            if state.is_loading() {
                warn!("Rejected submit while a search is in flight");
                return Err(SessionError::SearchInFlight);
            }
            let ticket = state.begin_search();
            (ticket, state.view())
        };

        info!(
            search_id = %ticket.id,
            generation = ticket.generation,
            "Search started"
        );
        self.emit(SessionEvent::ViewChanged { view: loading_view });

        let this = Arc::clone(self);
        let search = tokio::spawn(async move {
            let outcome = match this.fetch(&profile).await {
                Ok(schools) => SearchOutcome::Found(schools),
                Err(e) => {
                    error!(search_id = %ticket.id, error = %e, "Recommendation request failed");
                    SearchOutcome::Failed
                }
            };
            this.finish(ticket, outcome).await
        });

        Ok((ticket, search))
    }

    async fn finish(
        &self,
        ticket: SearchTicket,
        outcome: SearchOutcome,
    ) -> Result<ViewState, SessionError> {
        let (view, started) = {
            let mut state = self.state.write().await;
            let started = state.searched_at();
            if !state.complete_search(ticket, outcome) {
                debug!(
                    search_id = %ticket.id,
                    generation = ticket.generation,
                    current = state.generation(),
                    "Discarding stale search result"
                );
                return Err(SessionError::Superseded {
                    generation: ticket.generation,
                });
            }
            (state.view(), started)
        };

        let elapsed_ms = started.map(|t| (Utc::now() - t).num_milliseconds());
        info!(
            search_id = %ticket.id,
            results = result_count(&view),
            elapsed_ms,
            "Search finished"
        );
        self.emit(SessionEvent::ViewChanged { view: view.clone() });
        self.emit(SessionEvent::ScrollToResults);

        Ok(view)
    }

    /// Clear the session and tell the form to start over.
    pub async fn reset(&self) -> ViewState {
        let view = {
            let mut state = self.state.write().await;
            state.reset();
            state.view()
        };

        info!(form_token = view.form_token, "Session reset");
        self.emit(SessionEvent::FormReset {
            token: view.form_token,
        });
        self.emit(SessionEvent::ScrollToTop);
        self.emit(SessionEvent::ViewChanged { view: view.clone() });

        view
    }

    async fn fetch(&self, profile: &UserProfile) -> Result<Vec<School>, RecommendError> {
        match self.config.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.recommender.recommend(profile))
                .await
                .map_err(|_| RecommendError::Timeout(limit))?,
            None => self.recommender.recommend(profile).await,
        }
    }

    fn emit(&self, event: SessionEvent) {
        // Ok if nobody is listening
        let _ = self.tx.send(event);
    }
}

fn result_count(view: &ViewState) -> usize {
    match &view.panel {
        Panel::Results { schools } => schools.len(),
        _ => 0,
    }
}
