use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{PlayerEntity, RoomEntity, RoomStatus, RoundEntity},
    dto::{format_system_time, validation::validate_not_blank},
};

/// Payload used to open a new room.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    pub name: String,
    /// Game slug. Defaults to the first active game of the catalog.
    #[serde(default)]
    pub game: Option<String>,
    /// Room capacity. Defaults to the game's maximum.
    #[serde(default)]
    pub max_players: Option<u32>,
    #[serde(default)]
    pub is_private: bool,
    /// Required when the room is private.
    #[serde(default)]
    pub password: Option<String>,
}

impl Validate for CreateRoomRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_not_blank(&self.name) {
            errors.add("name", e);
        } else if self.name.chars().count() > 255 {
            let mut err = ValidationError::new("length");
            err.message = Some("Room name must be at most 255 characters".into());
            errors.add("name", err);
        }

        if self
            .max_players
            .is_some_and(|max_players| !(2..=16).contains(&max_players))
        {
            let mut err = ValidationError::new("range");
            err.message = Some("Room capacity must be between 2 and 16".into());
            errors.add("max_players", err);
        }

        let password = self.password.as_deref().map(str::trim).unwrap_or_default();
        if self.is_private && password.is_empty() {
            let mut err = ValidationError::new("required");
            err.message = Some("Private rooms require a password".into());
            errors.add("password", err);
        } else if password.chars().count() > 50 {
            let mut err = ValidationError::new("length");
            err.message = Some("Password must be at most 50 characters".into());
            errors.add("password", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Optional body of the join endpoint.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct JoinRoomRequest {
    #[serde(default)]
    pub password: Option<String>,
}

/// Entry of the open rooms listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomSummary {
    pub id: Uuid,
    pub game: String,
    pub name: String,
    pub status: RoomStatus,
    pub host_username: String,
    pub player_count: usize,
    pub max_players: u32,
    pub is_private: bool,
    pub created_at: String,
}

impl RoomSummary {
    /// Build the listing entry from a room and its headcount.
    pub fn new(room: &RoomEntity, player_count: usize) -> Self {
        Self {
            id: room.id,
            game: room.game.clone(),
            name: room.name.clone(),
            status: room.status,
            host_username: room.host_username.clone(),
            player_count,
            max_players: room.max_players,
            is_private: room.is_private,
            created_at: format_system_time(room.created_at),
        }
    }
}

/// Player as exposed over the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub score: i32,
    pub is_ready: bool,
    pub is_active: bool,
    pub joined_at: String,
}

impl From<&PlayerEntity> for PlayerView {
    fn from(value: &PlayerEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            username: value.username.clone(),
            score: value.score,
            is_ready: value.is_ready,
            is_active: value.is_active,
            joined_at: format_system_time(value.joined_at),
        }
    }
}

/// Full room state: members in join order and the current turn, if any.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomDetail {
    pub id: Uuid,
    pub game: String,
    pub name: String,
    pub status: RoomStatus,
    pub host_id: Uuid,
    pub host_username: String,
    pub max_players: u32,
    pub is_private: bool,
    pub created_at: String,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub players: Vec<PlayerView>,
    /// Username of the drawer of the active round.
    pub current_player: Option<String>,
    pub current_round: Option<u32>,
}

impl RoomDetail {
    /// Assemble the detail view. `players` must be in join order.
    pub fn new(room: &RoomEntity, players: &[PlayerEntity], active: Option<&RoundEntity>) -> Self {
        let current_player = active.and_then(|round| {
            players
                .iter()
                .find(|player| player.id == round.current_player_id)
                .map(|player| player.username.clone())
        });

        Self {
            id: room.id,
            game: room.game.clone(),
            name: room.name.clone(),
            status: room.status,
            host_id: room.host_id,
            host_username: room.host_username.clone(),
            max_players: room.max_players,
            is_private: room.is_private,
            created_at: format_system_time(room.created_at),
            started_at: room.started_at.map(format_system_time),
            finished_at: room.finished_at.map(format_system_time),
            players: players.iter().map(PlayerView::from).collect(),
            current_player,
            current_round: active.map(|round| round.round_number),
        }
    }
}

/// Plain acknowledgement for actions without a richer result.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    pub status: String,
}

impl ActionResponse {
    /// Acknowledge with the given status text.
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

/// Final outcome of a game.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameResultResponse {
    pub room_id: Uuid,
    pub status: RoomStatus,
    /// Highest scorer, ties broken by join order.
    pub winner: Option<PlayerView>,
    /// Final standings, best first.
    pub standings: Vec<PlayerView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(is_private: bool, password: Option<&str>) -> CreateRoomRequest {
        CreateRoomRequest {
            name: "Friday night".into(),
            game: None,
            max_players: None,
            is_private,
            password: password.map(Into::into),
        }
    }

    #[test]
    fn public_room_without_password_is_valid() {
        assert!(request(false, None).validate().is_ok());
    }

    #[test]
    fn private_room_requires_password() {
        let errors = request(true, Some("  ")).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
        assert!(request(true, Some("secret")).validate().is_ok());
    }

    #[test]
    fn blank_name_and_bad_capacity_are_rejected() {
        let mut req = request(false, None);
        req.name = "   ".into();
        req.max_players = Some(1);
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("max_players"));
    }
}
