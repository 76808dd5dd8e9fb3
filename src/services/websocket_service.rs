use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_stream::wrappers::{BroadcastStream, errors::BroadcastStreamRecvError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::models::PlayerEntity,
    dto::ws::{ClientMessage, RoomEvent},
    error::ServiceError,
    identity::CurrentUser,
    services::{
        chat_service, room_events,
        room_service::{self, load_room, require_member},
        round_service,
    },
    state::SharedState,
};

/// Internal error type for inbound frame handling.
///
/// Game rule violations are dropped silently; only infrastructure failures are surfaced in logs.
#[derive(Debug, Error)]
enum SessionError {
    /// Payload was not a JSON object with a known shape.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Error from the shared room and round services.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
}

impl SessionError {
    /// Whether the failure is a normal rejection rather than a fault worth a warning.
    fn is_rejection(&self) -> bool {
        match self {
            SessionError::Malformed(_) => true,
            SessionError::Service(err) => !matches!(
                err,
                ServiceError::Unavailable(_) | ServiceError::Degraded | ServiceError::Timeout
            ),
        }
    }
}

/// Check that the caller may open a session for the room. Runs before the upgrade is accepted.
pub async fn authorize(
    state: &SharedState,
    room_id: Uuid,
    user: &CurrentUser,
) -> Result<PlayerEntity, ServiceError> {
    let store = state.require_room_store().await?;
    load_room(store.as_ref(), room_id).await?;
    require_member(store.as_ref(), room_id, user.id).await
}

/// Handle the full lifecycle of one member's connection to a room.
pub async fn handle_socket(
    state: SharedState,
    socket: WebSocket,
    room_id: Uuid,
    player: PlayerEntity,
) {
    let connection_id = Uuid::new_v4();
    let events = state.hub().subscribe(room_id, connection_id);

    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });
    let forward_task = spawn_forwarder(events, outbound_tx.clone(), room_id);

    info!(%room_id, player = %player.username, %connection_id, "room session opened");
    room_events::broadcast_player_joined(&state, room_id, &player.username);

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                if let Err(err) = handle_text(&state, room_id, &player, text.as_str()).await {
                    if err.is_rejection() {
                        debug!(
                            %room_id,
                            player = %player.username,
                            error = %err,
                            "inbound message ignored"
                        );
                    } else {
                        warn!(
                            %room_id,
                            player = %player.username,
                            error = %err,
                            "failed to handle inbound message"
                        );
                    }
                }
            }
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(%room_id, player = %player.username, error = %err, "websocket error");
                break;
            }
        }
    }

    disconnect(&state, room_id, connection_id, &player).await;
    forward_task.abort();
    finalize(writer_task, outbound_tx).await;
}

/// Dispatch one inbound text frame.
async fn handle_text(
    state: &SharedState,
    room_id: Uuid,
    player: &PlayerEntity,
    text: &str,
) -> Result<(), SessionError> {
    match serde_json::from_str::<ClientMessage>(text)? {
        ClientMessage::ChatMessage { message } => {
            chat_service::post_message(state, room_id, player.id, &message).await?;
        }
        ClientMessage::DrawingUpdate { drawing_data } => {
            let Some(drawing) = drawing_data else {
                return Ok(());
            };
            round_service::submit_drawing(state, room_id, player.id, drawing, None).await?;
        }
        ClientMessage::Guess { guess } => {
            round_service::submit_guess(state, room_id, player.id, &guess, None).await?;
        }
        ClientMessage::ReadyStatus { is_ready } => {
            room_service::set_ready(state, room_id, player.id, is_ready).await?;
        }
        ClientMessage::Unknown => {}
    }
    Ok(())
}

/// Forward room events to this connection's writer.
fn spawn_forwarder(
    events: tokio::sync::broadcast::Receiver<RoomEvent>,
    outbound_tx: mpsc::UnboundedSender<Message>,
    room_id: Uuid,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stream = BroadcastStream::new(events);
        while let Some(item) = stream.next().await {
            let event = match item {
                Ok(event) => event,
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(%room_id, skipped, "room session lagged; events dropped");
                    continue;
                }
            };
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(%room_id, error = %err, "failed to serialize room event");
                    continue;
                }
            };
            if outbound_tx.send(Message::Text(payload.into())).is_err() {
                break;
            }
        }
    })
}

/// Announce the departure if the player still exists, then leave the room group.
async fn disconnect(
    state: &SharedState,
    room_id: Uuid,
    connection_id: Uuid,
    player: &PlayerEntity,
) {
    let still_member = match state.require_room_store().await {
        Ok(store) => match store.find_player(player.id).await {
            Ok(found) => found.is_some(),
            Err(err) => {
                warn!(%room_id, error = %err, "failed to resolve player on disconnect");
                false
            }
        },
        Err(_) => false,
    };

    if still_member {
        room_events::broadcast_player_left(state, room_id, &player.username);
    }
    state.hub().unsubscribe(room_id, connection_id);
    info!(%room_id, player = %player.username, %connection_id, "room session closed");
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
