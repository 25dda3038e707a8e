//! WebSocket connection handling.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use parley_relay::ClientEvent;
use tracing::{debug, warn};

use crate::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Runs one connection end to end: attach to the relay, pump outbound events
/// into the socket from a task, feed inbound frames through the relay's
/// dispatch, and detach when the stream ends for any reason.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (connection, mut events) = state.relay.connect().await;

    let send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(error) => {
                    warn!(%error, "failed to encode server event");
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => state.relay.handle(connection, event).await,
                Err(error) => {
                    // no error channel back to the client; log and move on
                    warn!(%connection, %error, "ignoring malformed client event");
                }
            },
            Ok(Message::Close(_)) => break,
            Err(error) => {
                debug!(%connection, %error, "websocket read error");
                break;
            }
            // ping/pong are answered by axum, binary frames are not part of
            // the protocol
            _ => {}
        }
    }

    state.relay.disconnect(connection).await;
    send_task.abort();
}
