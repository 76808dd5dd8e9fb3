use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
/// Messages accepted from room WebSocket clients.
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Free-text chat line.
    #[serde(rename = "chat_message")]
    ChatMessage {
        /// Text of the line; blank lines are dropped.
        #[serde(default)]
        message: String,
    },
    /// New drawing payload from the current drawer.
    #[serde(rename = "drawing_update")]
    DrawingUpdate {
        /// Opaque drawing document. Missing or blank payloads are ignored.
        #[serde(default)]
        #[schema(value_type = Option<Object>)]
        drawing_data: Option<Value>,
    },
    /// Attempt at the secret word.
    #[serde(rename = "guess")]
    Guess {
        /// Guessed word, compared trimmed and case-insensitively.
        #[serde(default)]
        guess: String,
    },
    /// Readiness toggle while the room is waiting.
    #[serde(rename = "ready_status")]
    ReadyStatus {
        /// New readiness of the sender.
        #[serde(default)]
        is_ready: bool,
    },
    /// Any other `type`; ignored.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
/// Events fanned out to every connection subscribed to a room.
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// A member opened a connection to the room.
    PlayerJoined {
        /// Human-readable announcement.
        message: String,
        /// Username of the member.
        player: String,
    },
    /// A member's connection went away.
    PlayerLeft {
        /// Human-readable announcement.
        message: String,
        /// Username of the member.
        player: String,
    },
    /// Chat line posted by a member.
    ChatMessage {
        /// Username of the author.
        player: String,
        /// Text of the line.
        message: String,
    },
    /// Latest drawing of the active round.
    DrawingUpdated {
        /// Drawing document as sent by the drawer.
        #[schema(value_type = Object)]
        drawing_data: Value,
    },
    /// Outcome of a guess. The secret word is never included.
    GuessMade {
        /// Username of the guesser.
        player: String,
        /// Normalized guess.
        guess: String,
        /// Whether the guess matched the secret word.
        is_correct: bool,
    },
    /// A member toggled readiness.
    ReadyStatusChanged {
        /// Username of the member.
        player: String,
        /// New readiness.
        is_ready: bool,
    },
    /// The host started the game.
    GameStarted {
        /// Human-readable announcement.
        message: String,
    },
    /// The host ended the game.
    GameEnded {
        /// Human-readable announcement.
        message: String,
        /// Username of the top scorer, if anyone played.
        winner: Option<String>,
        /// Score of the winner.
        score: Option<i32>,
    },
}
