use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::SystemTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of a room. Transitions only move forward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Players are gathering and toggling readiness.
    Waiting,
    /// Rounds are being played.
    Playing,
    /// The game has ended and scores are frozen.
    Finished,
}

impl RoomStatus {
    /// Stable string form, shared by storage backends and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Waiting => "waiting",
            RoomStatus::Playing => "playing",
            RoomStatus::Finished => "finished",
        }
    }
}

/// Game room persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomEntity {
    /// Primary key of the room.
    pub id: Uuid,
    /// Slug of the game definition this room plays.
    pub game: String,
    /// Display name chosen by the host.
    pub name: String,
    /// Current lifecycle status.
    pub status: RoomStatus,
    /// User identifier of the host.
    pub host_id: Uuid,
    /// Username of the host at creation time.
    pub host_username: String,
    /// Maximum number of players allowed in the room.
    pub max_players: u32,
    /// Whether joining requires the password.
    pub is_private: bool,
    /// Password required to join a private room.
    pub password: Option<String>,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Set when the room moves to `playing`.
    pub started_at: Option<SystemTime>,
    /// Set when the room moves to `finished`.
    pub finished_at: Option<SystemTime>,
}

/// Membership of a user in a room, carrying their score and readiness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Primary key of the membership record.
    pub id: Uuid,
    /// Room the player belongs to.
    pub room_id: Uuid,
    /// User identifier.
    pub user_id: Uuid,
    /// Username displayed to other players.
    pub username: String,
    /// Cumulative score within the room.
    pub score: i32,
    /// Readiness flag toggled while the room is waiting.
    pub is_ready: bool,
    /// Whether the player still takes part in the game.
    pub is_active: bool,
    /// Join timestamp; defines the turn order together with insertion order.
    pub joined_at: SystemTime,
}

/// One drawer/word cycle within a room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundEntity {
    /// Primary key of the round.
    pub id: Uuid,
    /// Room the round belongs to.
    pub room_id: Uuid,
    /// Contiguous round number starting at 1.
    pub round_number: u32,
    /// Player drawing during this round.
    pub current_player_id: Uuid,
    /// Secret word the other players try to guess.
    pub word: String,
    /// Opaque drawing payload, last write wins.
    pub drawing_data: Option<Value>,
    /// Start timestamp.
    pub started_at: SystemTime,
    /// Null while the round is active.
    pub finished_at: Option<SystemTime>,
}

impl RoundEntity {
    /// Whether the round is still accepting guesses.
    pub fn is_active(&self) -> bool {
        self.finished_at.is_none()
    }
}

/// Guess submitted during a round. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuessEntity {
    /// Primary key of the guess.
    pub id: Uuid,
    /// Round the guess targets.
    pub round_id: Uuid,
    /// Player who guessed.
    pub player_id: Uuid,
    /// Normalized guess text.
    pub guess: String,
    /// Whether the guess matched the secret word.
    pub is_correct: bool,
    /// Points awarded for this guess.
    pub points_earned: i32,
    /// Submission timestamp.
    pub created_at: SystemTime,
}

/// Chat line posted in a room. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessageEntity {
    /// Primary key of the message.
    pub id: Uuid,
    /// Room the message was posted in.
    pub room_id: Uuid,
    /// Author of the message.
    pub player_id: Uuid,
    /// Message text, trimmed.
    pub message: String,
    /// Posting timestamp.
    pub created_at: SystemTime,
    /// Whether the message was generated by the server.
    pub is_system_message: bool,
}

/// Achievement earned by a user in a game. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AchievementEntity {
    /// Primary key of the achievement.
    pub id: Uuid,
    /// User who earned it.
    pub user_id: Uuid,
    /// Username at the time it was earned.
    pub username: String,
    /// Slug of the game it was earned in.
    pub game: String,
    /// Kind of achievement, e.g. `game_won`.
    pub achievement_type: String,
    /// Value attached to the achievement, such as the winning score.
    pub value: i32,
    /// Award timestamp.
    pub earned_at: SystemTime,
}
