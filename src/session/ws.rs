//! WebSocket server + REST endpoints for the search session.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use super::controller::SearchController;
use super::state::{Panel, ViewState};
use crate::error::SessionError;
use crate::form::ProfileField;
use crate::render::render_cards;
use crate::schools::model::UserProfile;

/// Shared state for session routes.
#[derive(Clone)]
pub struct SessionRouteState {
    pub controller: Arc<SearchController>,
}

/// Messages pushed to WebSocket clients besides session events.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    /// Full view, sent on connect and after lag.
    SessionSync { view: ViewState },
    /// A client action was refused.
    ActionRejected { reason: String },
}

/// Actions a WebSocket client may send.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientAction {
    Submit { profile: UserProfile },
    Reset,
}

/// Build the session router.
pub fn session_routes(controller: Arc<SearchController>) -> Router {
    let state = SessionRouteState { controller };

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/api/session", get(get_session))
        .route("/api/cards", get(get_cards))
        .route("/api/form", get(get_form))
        .route("/api/search", post(search))
        .route("/api/reset", post(reset))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "school-match"
    }))
}

// ── REST Endpoints ──────────────────────────────────────────────────────

async fn get_session(State(state): State<SessionRouteState>) -> impl IntoResponse {
    Json(state.controller.view().await)
}

async fn get_cards(State(state): State<SessionRouteState>) -> impl IntoResponse {
    let view = state.controller.view().await;
    let cards = match &view.panel {
        Panel::Results { schools } => render_cards(schools),
        _ => Vec::new(),
    };
    Json(cards)
}

#[derive(Serialize)]
struct FormField {
    key: &'static str,
    label: &'static str,
}

async fn get_form(State(state): State<SessionRouteState>) -> impl IntoResponse {
    let view = state.controller.view().await;
    let fields: Vec<FormField> = ProfileField::ALL
        .iter()
        .map(|f| FormField {
            key: f.key(),
            label: f.label(),
        })
        .collect();
    Json(serde_json::json!({
        "fields": fields,
        "token": view.form_token,
        "disabled": view.form_disabled,
    }))
}

async fn search(
    State(state): State<SessionRouteState>,
    Json(profile): Json<UserProfile>,
) -> Response {
    match state.controller.submit(profile).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => session_error_response(&e),
    }
}

async fn reset(State(state): State<SessionRouteState>) -> impl IntoResponse {
    Json(state.controller.reset().await)
}

fn session_error_response(err: &SessionError) -> Response {
    (
        StatusCode::CONFLICT,
        Json(serde_json::json!({"error": err.to_string()})),
    )
        .into_response()
}

// ── WebSocket ───────────────────────────────────────────────────────────

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SessionRouteState>,
) -> impl IntoResponse {
    info!("WebSocket client connecting");
    ws.on_upgrade(|socket| handle_socket(socket, state.controller))
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, msg: &T) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to serialize WS message");
            true
        }
    }
}

async fn handle_socket(mut socket: WebSocket, controller: Arc<SearchController>) {
    info!("WebSocket client connected");

    // Subscribe before the sync so no event falls in between
    let mut rx = controller.subscribe();

    let sync = ServerMessage::SessionSync {
        view: controller.view().await,
    };
    if !send_json(&mut socket, &sync).await {
        warn!("Failed to send initial sync, client disconnected");
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        if !send_json(&mut socket, &event).await {
                            debug!("Client disconnected during send");
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        warn!(missed = n, "WS client lagged behind broadcast");
                        let sync = ServerMessage::SessionSync {
                            view: controller.view().await,
                        };
                        if !send_json(&mut socket, &sync).await {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed");
                        break;
                    }
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_client_message(&text, &controller).await {
                            if !send_json(&mut socket, &reply).await {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("WebSocket connection closed");
}

/// Apply a client action. Submissions run in the background so the socket
/// keeps forwarding events.
async fn handle_client_message(
    text: &str,
    controller: &Arc<SearchController>,
) -> Option<ServerMessage> {
    match serde_json::from_str::<ClientAction>(text) {
        Ok(ClientAction::Submit { profile }) => match controller.start(profile).await {
            // The outcome reaches every client as session events
            Ok((ticket, _search)) => {
                debug!(search_id = %ticket.id, "WS submit started");
                None
            }
            Err(e) => Some(ServerMessage::ActionRejected {
                reason: e.to_string(),
            }),
        },
        Ok(ClientAction::Reset) => {
            controller.reset().await;
            None
        }
        Err(e) => {
            debug!(error = %e, text = text, "Unrecognized WS message from client");
            Some(ServerMessage::ActionRejected {
                reason: format!("unrecognized message: {e}"),
            })
        }
    }
}
