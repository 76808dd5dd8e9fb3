use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{config::AppConfig, dao::models::AchievementEntity, dto::format_system_time};

/// An achievement as shown on a user's profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct AchievementView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub game: String,
    /// Display name from the catalog; the slug when the game is no longer configured.
    pub game_name: String,
    pub achievement_type: String,
    pub value: i32,
    pub earned_at: String,
}

impl AchievementView {
    /// Resolve the game's display name from the catalog.
    pub fn new(achievement: &AchievementEntity, config: &AppConfig) -> Self {
        let game_name = config
            .game(&achievement.game)
            .map(|game| game.name.clone())
            .unwrap_or_else(|| achievement.game.clone());

        Self {
            id: achievement.id,
            user_id: achievement.user_id,
            username: achievement.username.clone(),
            game: achievement.game.clone(),
            game_name,
            achievement_type: achievement.achievement_type.clone(),
            value: achievement.value,
            earned_at: format_system_time(achievement.earned_at),
        }
    }
}
