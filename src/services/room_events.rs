use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::{dto::ws::RoomEvent, state::SharedState};

/// Announce a member's connection to the room.
pub fn broadcast_player_joined(state: &SharedState, room_id: Uuid, username: &str) {
    publish(
        state,
        room_id,
        RoomEvent::PlayerJoined {
            message: format!("{username} joined the room"),
            player: username.to_owned(),
        },
    );
}

/// Announce that a member's connection went away.
pub fn broadcast_player_left(state: &SharedState, room_id: Uuid, username: &str) {
    publish(
        state,
        room_id,
        RoomEvent::PlayerLeft {
            message: format!("{username} left the room"),
            player: username.to_owned(),
        },
    );
}

/// Fan a chat line out to the room.
pub fn broadcast_chat_message(state: &SharedState, room_id: Uuid, username: &str, message: &str) {
    publish(
        state,
        room_id,
        RoomEvent::ChatMessage {
            player: username.to_owned(),
            message: message.to_owned(),
        },
    );
}

/// Push the latest drawing of the active round.
pub fn broadcast_drawing_updated(state: &SharedState, room_id: Uuid, drawing_data: Value) {
    publish(state, room_id, RoomEvent::DrawingUpdated { drawing_data });
}

/// Publish a guess outcome. The secret word is never part of the payload.
pub fn broadcast_guess_made(
    state: &SharedState,
    room_id: Uuid,
    username: &str,
    guess: &str,
    is_correct: bool,
) {
    publish(
        state,
        room_id,
        RoomEvent::GuessMade {
            player: username.to_owned(),
            guess: guess.to_owned(),
            is_correct,
        },
    );
}

/// Publish a readiness change.
pub fn broadcast_ready_status_changed(
    state: &SharedState,
    room_id: Uuid,
    username: &str,
    is_ready: bool,
) {
    publish(
        state,
        room_id,
        RoomEvent::ReadyStatusChanged {
            player: username.to_owned(),
            is_ready,
        },
    );
}

/// Tell every member the game has begun.
pub fn broadcast_game_started(state: &SharedState, room_id: Uuid) {
    publish(
        state,
        room_id,
        RoomEvent::GameStarted {
            message: "The game has started!".into(),
        },
    );
}

/// Tell every member the game is over, naming the winner if any.
pub fn broadcast_game_ended(
    state: &SharedState,
    room_id: Uuid,
    winner: Option<(&str, i32)>,
) {
    let message = match winner {
        Some((username, _)) => format!("Game over! Winner: {username}"),
        None => "Game over!".to_owned(),
    };
    publish(
        state,
        room_id,
        RoomEvent::GameEnded {
            message,
            winner: winner.map(|(username, _)| username.to_owned()),
            score: winner.map(|(_, score)| score),
        },
    );
}

fn publish(state: &SharedState, room_id: Uuid, event: RoomEvent) {
    let delivered = state.hub().publish(room_id, event);
    debug!(%room_id, delivered, "room event published");
}
