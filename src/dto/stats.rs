use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::PlayerEntity;

/// One line of the global leaderboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: Uuid,
    pub username: String,
    pub room_id: Uuid,
    pub score: i32,
}

impl LeaderboardEntry {
    /// Build an entry at 1-based `rank`.
    pub fn new(rank: usize, player: &PlayerEntity) -> Self {
        Self {
            rank,
            user_id: player.user_id,
            username: player.username.clone(),
            room_id: player.room_id,
            score: player.score,
        }
    }
}

/// Lifetime totals of the calling user.
#[derive(Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserStats {
    pub total_games: usize,
    pub games_won: usize,
    pub total_points: i64,
    pub correct_guesses: u64,
}
