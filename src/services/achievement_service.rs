use std::time::SystemTime;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::models::{AchievementEntity, PlayerEntity, RoomEntity},
    dto::achievement::AchievementView,
    error::ServiceError,
    identity::CurrentUser,
    state::SharedState,
};

/// Awarded to the top scorer when the host ends a game.
pub const GAME_WON: &str = "game_won";

/// Achievements of the caller, newest first.
pub async fn list_achievements(
    state: &SharedState,
    user: &CurrentUser,
) -> Result<Vec<AchievementView>, ServiceError> {
    let store = state.require_room_store().await?;
    let achievements = store.list_achievements(user.id).await?;
    Ok(achievements
        .iter()
        .map(|achievement| AchievementView::new(achievement, state.config()))
        .collect())
}

/// A single achievement. Achievements are public, like the profiles they appear on.
pub async fn get_achievement(
    state: &SharedState,
    id: Uuid,
) -> Result<AchievementView, ServiceError> {
    let store = state.require_room_store().await?;
    let achievement = store
        .find_achievement(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("achievement not found".into()))?;
    Ok(AchievementView::new(&achievement, state.config()))
}

/// Record the win of the room's top scorer.
///
/// Nothing is awarded when nobody scored. Storage failures are logged and do not undo the end of
/// the game.
pub async fn award_game_won(state: &SharedState, room: &RoomEntity, winner: &PlayerEntity) {
    if winner.score <= 0 {
        return;
    }

    let achievement = AchievementEntity {
        id: Uuid::new_v4(),
        user_id: winner.user_id,
        username: winner.username.clone(),
        game: room.game.clone(),
        achievement_type: GAME_WON.into(),
        value: winner.score,
        earned_at: SystemTime::now(),
    };

    let result = match state.require_room_store().await {
        Ok(store) => store.insert_achievement(achievement).await.map_err(ServiceError::from),
        Err(err) => Err(err),
    };
    match result {
        Ok(()) => info!(room_id = %room.id, player = %winner.username, "achievement awarded"),
        Err(err) => warn!(room_id = %room.id, error = %err, "failed to record achievement"),
    }
}
