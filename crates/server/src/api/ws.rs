//! WebSocket feed of live favorites and recent query snapshots.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use photocache_core::Photo;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::metrics::{WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_MESSAGES_SENT};
use crate::state::AppState;

/// WebSocket message sent to clients.
///
/// Each connection receives both snapshots right after connecting, then a
/// fresh one whenever the underlying data changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Current favorites, most recently updated first.
    Favorites { photos: Vec<Photo> },
    /// Current recent search terms, most recent first.
    RecentQueries { queries: Vec<String> },
}

impl WsMessage {
    fn type_name(&self) -> &'static str {
        match self {
            WsMessage::Favorites { .. } => "favorites",
            WsMessage::RecentQueries { .. } => "recent_queries",
        }
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle a single WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let repository = state.repository();
    let mut favorites = repository.watch_favorites();
    let mut recent = repository.watch_recent_queries(repository.config().recent_query_limit);

    WS_CONNECTIONS_TOTAL.inc();
    WS_CONNECTIONS_ACTIVE.inc();

    info!("WebSocket client connected");

    // Forward snapshots to this client
    let send_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                Some(snapshot) = favorites.next() => match snapshot {
                    Ok(photos) => WsMessage::Favorites { photos },
                    Err(e) => {
                        warn!("Failed to load favorites snapshot: {}", e);
                        continue;
                    }
                },
                Some(snapshot) = recent.next() => match snapshot {
                    Ok(queries) => WsMessage::RecentQueries { queries },
                    Err(e) => {
                        warn!("Failed to load recent queries snapshot: {}", e);
                        continue;
                    }
                },
                else => {
                    debug!("Snapshot streams ended");
                    break;
                }
            };

            WS_MESSAGES_SENT.with_label_values(&[msg.type_name()]).inc();

            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, client disconnected");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize WsMessage: {}", e);
                }
            }
        }
    });

    // Handle incoming messages from client (ping/pong, close)
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Close(_)) => {
                debug!("WebSocket client requested close");
                break;
            }
            Ok(Message::Text(text)) => {
                debug!("Received text message: {}", text);
            }
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket receive error: {}", e);
                break;
            }
        }
    }

    send_task.abort();
    WS_CONNECTIONS_ACTIVE.dec();
    info!("WebSocket client disconnected");
}
