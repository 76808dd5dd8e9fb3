use crate::{
    dao::models::RoomStatus,
    dto::stats::{LeaderboardEntry, UserStats},
    error::ServiceError,
    identity::CurrentUser,
    state::SharedState,
};

/// Number of entries on the global leaderboard.
pub const LEADERBOARD_SIZE: usize = 100;

/// Best scores of finished games.
pub async fn leaderboard(state: &SharedState) -> Result<Vec<LeaderboardEntry>, ServiceError> {
    let store = state.require_room_store().await?;
    let players = store.list_finished_players(LEADERBOARD_SIZE).await?;
    Ok(players
        .iter()
        .enumerate()
        .map(|(index, player)| LeaderboardEntry::new(index + 1, player))
        .collect())
}

/// Lifetime totals of the caller.
///
/// A game counts as won when the caller's score equals the best score of that finished room.
pub async fn user_stats(
    state: &SharedState,
    user: &CurrentUser,
) -> Result<UserStats, ServiceError> {
    let store = state.require_room_store().await?;
    let memberships = store.list_players_by_user(user.id).await?;

    let mut stats = UserStats {
        total_games: memberships.len(),
        total_points: memberships.iter().map(|player| i64::from(player.score)).sum(),
        ..UserStats::default()
    };

    for membership in &memberships {
        let finished = store
            .find_room(membership.room_id)
            .await?
            .is_some_and(|room| room.status == RoomStatus::Finished);
        if !finished {
            continue;
        }
        let best = store
            .list_players(membership.room_id)
            .await?
            .iter()
            .map(|player| player.score)
            .max()
            .unwrap_or_default();
        if membership.score == best {
            stats.games_won += 1;
        }
    }

    stats.correct_guesses = store
        .count_correct_guesses(memberships.iter().map(|player| player.id).collect())
        .await?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::SystemTime};

    use uuid::Uuid;

    use super::*;
    use crate::{
        dao::{models::GuessEntity, room_store::MemoryRoomStore},
        services::test_support::{seeded_room, word_config},
        state::AppState,
    };

    #[tokio::test]
    async fn stats_count_games_wins_points_and_guesses() {
        let state = AppState::with_store(word_config("cat"), Arc::new(MemoryRoomStore::new()));
        let store = state.require_room_store().await.unwrap();
        let won = seeded_room(&state, &["host", "alice"], RoomStatus::Finished).await;
        let lost = seeded_room(&state, &["host", "bob"], RoomStatus::Finished).await;
        store.add_score(won.players[0].id, 300).await.unwrap();
        store.add_score(lost.players[0].id, 100).await.unwrap();
        store.add_score(lost.players[1].id, 200).await.unwrap();
        store
            .insert_guess(GuessEntity {
                id: Uuid::new_v4(),
                round_id: Uuid::new_v4(),
                player_id: won.players[0].id,
                guess: "cat".into(),
                is_correct: true,
                points_earned: 100,
                created_at: SystemTime::now(),
            })
            .await
            .unwrap();

        let user = CurrentUser {
            id: won.room.host_id,
            username: "host".into(),
        };
        let stats = user_stats(&state, &user).await.unwrap();
        assert_eq!(stats.total_games, 1);
        assert_eq!(stats.games_won, 1);
        assert_eq!(stats.total_points, 300);
        assert_eq!(stats.correct_guesses, 1);

        let board = leaderboard(&state).await.unwrap();
        assert_eq!(board[0].score, 300);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board.len(), 4);
    }
}
