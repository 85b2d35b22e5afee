// WebSocket handler for the shared tactical board channel.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AppState;
use crate::metrics;

/// Wire shape for events in both directions: `{"event": "...", "data": ...}`.
#[derive(Debug, Serialize, Deserialize)]
struct WireEvent {
    event: String,
    #[serde(default)]
    data: Value,
}

/// WebSocket upgrade handler for the board channel.
pub async fn ws_board(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(socket: WebSocket, state: AppState) {
    let (id, mut events) = state.hub.join();
    metrics::CONNECTED_CLIENTS.inc();
    tracing::info!(participant = %id, "board client connected");

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            // Event from the hub, bound for this participant
            maybe_event = events.recv() => {
                match maybe_event {
                    Some(event) => {
                        let wire = WireEvent {
                            event: event.name,
                            data: event.data,
                        };
                        let text = match serde_json::to_string(&wire) {
                            Ok(t) => t,
                            Err(_) => continue,
                        };
                        if sink.send(Message::Text(text.into())).await.is_err() {
                            // Client disconnected
                            break;
                        }
                        metrics::WS_MESSAGES_SENT_TOTAL.inc();
                    }
                    None => break,
                }
            }
            // Message from the client: relay move events, detect disconnect
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        // Payloads are relayed untouched; anything that is
                        // not an event envelope is dropped.
                        if let Ok(wire) = serde_json::from_str::<WireEvent>(&text) {
                            metrics::EVENTS_RELAYED_TOTAL
                                .with_label_values(&[metrics::event_label(&wire.event)])
                                .inc();
                            state.hub.relay(id, &wire.event, wire.data);
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {
                        // Ping/pong/binary: ignore
                    }
                    Some(Err(_)) => break,
                }
            }
        }
    }

    state.hub.leave(id);
    metrics::CONNECTED_CLIENTS.dec();
    tracing::info!(participant = %id, "board client disconnected");
}
