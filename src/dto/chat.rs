use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{ChatMessageEntity, PlayerEntity},
    dto::{format_system_time, validation::validate_not_blank},
};

/// Chat line posted through the REST endpoint.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ChatRequest {
    #[validate(length(max = 1000), custom(function = "validate_not_blank"))]
    pub message: String,
}

/// A persisted chat line.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatMessageView {
    pub id: Uuid,
    pub player_id: Uuid,
    pub player: String,
    pub message: String,
    pub is_system_message: bool,
    pub created_at: String,
}

impl ChatMessageView {
    /// Resolve the author's username from the room's players.
    pub fn new(message: &ChatMessageEntity, players: &[PlayerEntity]) -> Self {
        let player = players
            .iter()
            .find(|player| player.id == message.player_id)
            .map(|player| player.username.clone())
            .unwrap_or_default();

        Self {
            id: message.id,
            player_id: message.player_id,
            player,
            message: message.message.clone(),
            is_system_message: message.is_system_message,
            created_at: format_system_time(message.created_at),
        }
    }
}
