use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::MongoDaoError;
use crate::dao::models::{
    AchievementEntity, ChatMessageEntity, GuessEntity, PlayerEntity, RoomEntity, RoomStatus,
    RoundEntity,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRoomDocument {
    #[serde(rename = "_id")]
    id: String,
    game: String,
    name: String,
    status: RoomStatus,
    host_id: String,
    host_username: String,
    max_players: i64,
    is_private: bool,
    password: Option<String>,
    created_at: DateTime,
    started_at: Option<DateTime>,
    finished_at: Option<DateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPlayerDocument {
    #[serde(rename = "_id")]
    id: String,
    room_id: String,
    user_id: String,
    username: String,
    score: i32,
    is_ready: bool,
    is_active: bool,
    joined_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRoundDocument {
    #[serde(rename = "_id")]
    id: String,
    room_id: String,
    round_number: i64,
    current_player_id: String,
    word: String,
    /// Drawing payload kept as raw JSON text so it round-trips untouched.
    drawing_json: Option<String>,
    started_at: DateTime,
    finished_at: Option<DateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGuessDocument {
    #[serde(rename = "_id")]
    id: String,
    round_id: String,
    player_id: String,
    guess: String,
    is_correct: bool,
    points_earned: i32,
    created_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoChatDocument {
    #[serde(rename = "_id")]
    id: String,
    room_id: String,
    player_id: String,
    message: String,
    created_at: DateTime,
    is_system_message: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoAchievementDocument {
    #[serde(rename = "_id")]
    id: String,
    user_id: String,
    username: String,
    game: String,
    achievement_type: String,
    value: i32,
    earned_at: DateTime,
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": id.to_string()}
}

fn parse_id(document_id: &str, value: &str) -> Result<Uuid, MongoDaoError> {
    Uuid::parse_str(value).map_err(|err| MongoDaoError::InvalidDocument {
        id: document_id.to_owned(),
        reason: format!("`{value}` is not a UUID: {err}"),
    })
}

impl From<RoomEntity> for MongoRoomDocument {
    fn from(value: RoomEntity) -> Self {
        Self {
            id: value.id.to_string(),
            game: value.game,
            name: value.name,
            status: value.status,
            host_id: value.host_id.to_string(),
            host_username: value.host_username,
            max_players: i64::from(value.max_players),
            is_private: value.is_private,
            password: value.password,
            created_at: DateTime::from_system_time(value.created_at),
            started_at: value.started_at.map(DateTime::from_system_time),
            finished_at: value.finished_at.map(DateTime::from_system_time),
        }
    }
}

impl TryFrom<MongoRoomDocument> for RoomEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoRoomDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&value.id, &value.id)?,
            host_id: parse_id(&value.id, &value.host_id)?,
            max_players: u32::try_from(value.max_players).map_err(|_| {
                MongoDaoError::InvalidDocument {
                    id: value.id.clone(),
                    reason: format!("invalid max_players {}", value.max_players),
                }
            })?,
            game: value.game,
            name: value.name,
            status: value.status,
            host_username: value.host_username,
            is_private: value.is_private,
            password: value.password,
            created_at: value.created_at.to_system_time(),
            started_at: value.started_at.map(DateTime::to_system_time),
            finished_at: value.finished_at.map(DateTime::to_system_time),
        })
    }
}

impl From<PlayerEntity> for MongoPlayerDocument {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id.to_string(),
            room_id: value.room_id.to_string(),
            user_id: value.user_id.to_string(),
            username: value.username,
            score: value.score,
            is_ready: value.is_ready,
            is_active: value.is_active,
            joined_at: DateTime::from_system_time(value.joined_at),
        }
    }
}

impl TryFrom<MongoPlayerDocument> for PlayerEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoPlayerDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&value.id, &value.id)?,
            room_id: parse_id(&value.id, &value.room_id)?,
            user_id: parse_id(&value.id, &value.user_id)?,
            username: value.username,
            score: value.score,
            is_ready: value.is_ready,
            is_active: value.is_active,
            joined_at: value.joined_at.to_system_time(),
        })
    }
}

impl From<RoundEntity> for MongoRoundDocument {
    fn from(value: RoundEntity) -> Self {
        Self {
            id: value.id.to_string(),
            room_id: value.room_id.to_string(),
            round_number: i64::from(value.round_number),
            current_player_id: value.current_player_id.to_string(),
            word: value.word,
            drawing_json: value.drawing_data.map(|drawing| drawing.to_string()),
            started_at: DateTime::from_system_time(value.started_at),
            finished_at: value.finished_at.map(DateTime::from_system_time),
        }
    }
}

impl TryFrom<MongoRoundDocument> for RoundEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoRoundDocument) -> Result<Self, Self::Error> {
        let drawing_data = value
            .drawing_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|err| MongoDaoError::InvalidDocument {
                id: value.id.clone(),
                reason: format!("invalid drawing payload: {err}"),
            })?;

        Ok(Self {
            id: parse_id(&value.id, &value.id)?,
            room_id: parse_id(&value.id, &value.room_id)?,
            round_number: u32::try_from(value.round_number).map_err(|_| {
                MongoDaoError::InvalidDocument {
                    id: value.id.clone(),
                    reason: format!("invalid round number {}", value.round_number),
                }
            })?,
            current_player_id: parse_id(&value.id, &value.current_player_id)?,
            word: value.word,
            drawing_data,
            started_at: value.started_at.to_system_time(),
            finished_at: value.finished_at.map(DateTime::to_system_time),
        })
    }
}

impl From<GuessEntity> for MongoGuessDocument {
    fn from(value: GuessEntity) -> Self {
        Self {
            id: value.id.to_string(),
            round_id: value.round_id.to_string(),
            player_id: value.player_id.to_string(),
            guess: value.guess,
            is_correct: value.is_correct,
            points_earned: value.points_earned,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl TryFrom<MongoGuessDocument> for GuessEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoGuessDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&value.id, &value.id)?,
            round_id: parse_id(&value.id, &value.round_id)?,
            player_id: parse_id(&value.id, &value.player_id)?,
            guess: value.guess,
            is_correct: value.is_correct,
            points_earned: value.points_earned,
            created_at: value.created_at.to_system_time(),
        })
    }
}

impl From<ChatMessageEntity> for MongoChatDocument {
    fn from(value: ChatMessageEntity) -> Self {
        Self {
            id: value.id.to_string(),
            room_id: value.room_id.to_string(),
            player_id: value.player_id.to_string(),
            message: value.message,
            created_at: DateTime::from_system_time(value.created_at),
            is_system_message: value.is_system_message,
        }
    }
}

impl TryFrom<MongoChatDocument> for ChatMessageEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoChatDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&value.id, &value.id)?,
            room_id: parse_id(&value.id, &value.room_id)?,
            player_id: parse_id(&value.id, &value.player_id)?,
            message: value.message,
            created_at: value.created_at.to_system_time(),
            is_system_message: value.is_system_message,
        })
    }
}

impl From<AchievementEntity> for MongoAchievementDocument {
    fn from(value: AchievementEntity) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.user_id.to_string(),
            username: value.username,
            game: value.game,
            achievement_type: value.achievement_type,
            value: value.value,
            earned_at: DateTime::from_system_time(value.earned_at),
        }
    }
}

impl TryFrom<MongoAchievementDocument> for AchievementEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoAchievementDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&value.id, &value.id)?,
            user_id: parse_id(&value.id, &value.user_id)?,
            username: value.username,
            game: value.game,
            achievement_type: value.achievement_type,
            value: value.value,
            earned_at: value.earned_at.to_system_time(),
        })
    }
}
