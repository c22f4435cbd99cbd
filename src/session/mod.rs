//! Search session: state, view selection, the controller that drives a
//! search, and the REST/WebSocket routes that expose it.

pub mod controller;
pub mod state;
pub mod ws;

pub use controller::{ControllerConfig, SearchController};
pub use state::{Panel, SearchOutcome, SearchTicket, SessionEvent, SessionState, ViewState};
pub use ws::{SessionRouteState, session_routes};
