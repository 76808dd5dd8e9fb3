use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{GuessEntity, PlayerEntity, RoundEntity},
    dto::{format_system_time, validation::validate_not_blank},
};

/// Guess submitted through the REST fallback.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct GuessRequest {
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub guess: String,
}

/// Drawing submitted through the REST fallback.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DrawingRequest {
    #[schema(value_type = Object)]
    pub drawing_data: Value,
}

/// A recorded guess.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GuessView {
    pub id: Uuid,
    pub player_id: Uuid,
    pub player: String,
    pub guess: String,
    pub is_correct: bool,
    pub points_earned: i32,
    pub created_at: String,
}

impl GuessView {
    /// Resolve the guesser's username from the room's players.
    pub fn new(guess: &GuessEntity, players: &[PlayerEntity]) -> Self {
        let player = players
            .iter()
            .find(|player| player.id == guess.player_id)
            .map(|player| player.username.clone())
            .unwrap_or_default();

        Self {
            id: guess.id,
            player_id: guess.player_id,
            player,
            guess: guess.guess.clone(),
            is_correct: guess.is_correct,
            points_earned: guess.points_earned,
            created_at: format_system_time(guess.created_at),
        }
    }
}

/// A round as seen by one member of the room.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoundView {
    pub id: Uuid,
    pub round_number: u32,
    pub current_player_id: Uuid,
    pub current_player: String,
    /// Only disclosed to the drawer.
    pub word: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub drawing_data: Option<Value>,
    pub is_active: bool,
    pub started_at: String,
    pub finished_at: Option<String>,
    /// Every guess for the drawer, only the viewer's own guesses otherwise.
    pub guesses: Vec<GuessView>,
}

impl RoundView {
    /// Project `round` for the member `viewer_id`.
    pub fn for_viewer(
        round: &RoundEntity,
        guesses: &[GuessEntity],
        players: &[PlayerEntity],
        viewer_id: Uuid,
    ) -> Self {
        let is_drawer = round.current_player_id == viewer_id;
        let current_player = players
            .iter()
            .find(|player| player.id == round.current_player_id)
            .map(|player| player.username.clone())
            .unwrap_or_default();

        Self {
            id: round.id,
            round_number: round.round_number,
            current_player_id: round.current_player_id,
            current_player,
            word: is_drawer.then(|| round.word.clone()),
            drawing_data: round.drawing_data.clone(),
            is_active: round.is_active(),
            started_at: format_system_time(round.started_at),
            finished_at: round.finished_at.map(format_system_time),
            guesses: guesses
                .iter()
                .filter(|guess| is_drawer || guess.player_id == viewer_id)
                .map(|guess| GuessView::new(guess, players))
                .collect(),
        }
    }
}

/// Outcome of a REST guess.
#[derive(Debug, Serialize, ToSchema)]
pub struct GuessResponse {
    pub guess: GuessView,
    /// Number of the round opened by a correct guess, if any.
    pub next_round: Option<u32>,
}
