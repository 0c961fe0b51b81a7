//! WebSocket connection handler
//!
//! Streams audience events to browser clients as JSON text frames

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use shared::AudienceEvent;

use crate::traits::AudienceService;

/// GET /ws
pub async fn websocket_handler<A>(ws: WebSocketUpgrade, State(service): State<Arc<A>>) -> Response
where
    A: AudienceService + 'static,
{
    // Subscribe before the upgrade so no event between handshake and stream is lost
    let events = service.subscribe();
    ws.on_upgrade(move |socket| handle_websocket(socket, events))
}

/// Forward events until either side goes away
async fn handle_websocket(socket: WebSocket, mut events: broadcast::Receiver<AudienceEvent>) {
    info!("🔗 New WebSocket connection");
    let (mut sender, mut receiver) = socket.split();

    let outgoing_task = tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("WebSocket client lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let json_msg = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    warn!("Failed to serialize audience event: {}", e);
                    continue;
                }
            };

            if sender.send(Message::Text(json_msg)).await.is_err() {
                break;
            }
        }
        debug!("Outgoing event task ended");
    });

    // Clients only listen; drain incoming frames until close
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    outgoing_task.abort();
    info!("🔌 WebSocket connection closed");
}
