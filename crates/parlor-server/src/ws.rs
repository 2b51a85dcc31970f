use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use parlor_core::net::messages::{ClientMessage, ServerMessage};
use parlor_core::net::protocol::{MAX_MESSAGE_SIZE, decode_client_message, encode_server_message};
use parlor_core::seat::Role;

use crate::session::ClientId;
use crate::state::AppState;

pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, rx) = mpsc::channel::<Utf8Bytes>(state.config.limits.client_message_buffer);

    let (client_id, role) = {
        let mut session = state.session.write().await;
        session.admit(tx)
    };

    // Role notice first, then a full state snapshot, before any broadcast
    // frames reach the socket.
    let role_msg = match role {
        Role::Seat(id) => ServerMessage::<()>::PlayerAssigned { player_id: id },
        Role::Observer => ServerMessage::<()>::Spectator,
    };
    let sent = match encode_server_message(&role_msg) {
        Ok(text) => ws_sender.send(Message::Text(text.into())).await.is_ok(),
        Err(e) => {
            tracing::error!(client_id, error = %e, "failed to encode role message");
            false
        },
    };
    if !sent {
        state.session.write().await.remove(client_id);
        return;
    }

    let snapshot = {
        let session = state.session.read().await;
        session.snapshot().await
    };
    if let Some(frame) = snapshot
        && ws_sender.send(Message::Text(frame)).await.is_err()
    {
        state.session.write().await.remove(client_id);
        return;
    }

    spawn_writer(ws_sender, rx);

    read_loop(&mut ws_receiver, &state, client_id, role).await;

    // Disconnect is a normal lifecycle event, not an error.
    let mut session = state.session.write().await;
    session.remove(client_id);
    drop(session);
    tracing::info!(client_id, "client disconnected");
}

fn spawn_writer(
    mut ws_sender: futures::stream::SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Utf8Bytes>,
) {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if ws_sender.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
    });
}

async fn read_loop(
    ws_receiver: &mut futures::stream::SplitStream<WebSocket>,
    state: &AppState,
    client_id: ClientId,
    role: Role,
) {
    while let Some(Ok(msg)) = ws_receiver.next().await {
        let text = match msg {
            Message::Text(t) => t,
            Message::Close(_) => break,
            // The protocol is JSON text frames; anything else is dropped.
            _ => continue,
        };

        if text.len() > MAX_MESSAGE_SIZE {
            continue;
        }

        let client_msg = match decode_client_message(text.as_str()) {
            Ok(m) => m,
            Err(e) => {
                // Malformed frames are logged and discarded. The
                // connection stays open; nothing goes back to the sender.
                tracing::debug!(client_id, error = %e, "discarding malformed frame");
                continue;
            },
        };

        // Observers receive state but cannot act.
        if !role.is_seated() {
            tracing::debug!(client_id, "ignoring input from observer");
            continue;
        }

        let session = state.session.read().await;
        match client_msg {
            ClientMessage::PaddleMove { y } => session.paddle_target(client_id, y),
            ClientMessage::RestartGame => session.request_restart(client_id),
        }
    }
}
