use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{GameDefinition, GameType};

/// Public description of a game from the catalog. The word list is never exposed.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSummary {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub game_type: GameType,
    pub min_players: u32,
    pub max_players: u32,
    pub duration_minutes: u32,
    pub points: i32,
}

impl From<&GameDefinition> for GameSummary {
    fn from(value: &GameDefinition) -> Self {
        Self {
            slug: value.slug.clone(),
            name: value.name.clone(),
            description: value.description.clone(),
            game_type: value.game_type,
            min_players: value.min_players,
            max_players: value.max_players,
            duration_minutes: value.duration_minutes,
            points: value.points,
        }
    }
}
