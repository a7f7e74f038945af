//! WebSocket route handler
//!
//! Pushes the full dashboard view whenever the state version moves and
//! accepts a few control messages from the client.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use terminal_core::{ClientMessage, ErrorCode, ServerMessage};
use tracing::{debug, info, warn};

use crate::AppState;

/// Create WebSocket routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/ws", get(ws_handler))
}

/// WebSocket upgrade handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let dashboard = state.orchestrator.state();
    let mut updates = dashboard.subscribe();
    updates.borrow_and_update();

    if send_message(&mut sender, &dashboard_message(&state)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                if send_message(&mut sender, &dashboard_message(&state)).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        debug!("WebSocket receive error: {}", e);
                        break;
                    }
                };

                if let Some(reply) = handle_client_message(&state, text.as_str()) {
                    if send_message(&mut sender, &reply).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    info!("WebSocket connection closed");
}

fn dashboard_message(state: &AppState) -> ServerMessage {
    ServerMessage::Dashboard {
        view: Box::new(state.orchestrator.state().snapshot()),
    }
}

/// Act on one client frame, returning the direct reply if any
fn handle_client_message(state: &AppState, text: &str) -> Option<ServerMessage> {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            return Some(ServerMessage::Error {
                code: ErrorCode::InvalidMessage,
                message: format!("Invalid message: {}", e),
            })
        }
    };

    match message {
        ClientMessage::Ping { timestamp } => Some(ServerMessage::Pong {
            timestamp,
            server_time: Utc::now().timestamp_millis(),
        }),
        ClientMessage::Refresh => {
            let orchestrator = state.orchestrator.clone();
            tokio::spawn(async move {
                orchestrator.manual_refresh().await;
            });
            None
        }
        ClientMessage::SetTimeframe { timeframe } => {
            state.orchestrator.set_timeframe(timeframe);
            None
        }
    }
}

async fn send_message<S>(sender: &mut S, message: &ServerMessage) -> Result<(), ()>
where
    S: SinkExt<Message> + Unpin,
{
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize server message: {}", e);
            return Ok(());
        }
    };

    sender.send(Message::Text(json.into())).await.map_err(|_| ())
}
