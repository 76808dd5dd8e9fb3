use std::{sync::Arc, time::SystemTime};

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::RoomStore;
use crate::dao::{
    models::{
        AchievementEntity, ChatMessageEntity, GuessEntity, PlayerEntity, RoomEntity, RoomStatus,
        RoundEntity,
    },
    storage::StorageResult,
};

/// Room store keeping every table in process memory.
///
/// All tables sit behind one lock so compound updates (closing a round,
/// cascading a room delete) are atomic with respect to other callers.
#[derive(Clone, Default)]
pub struct MemoryRoomStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    rooms: IndexMap<Uuid, RoomEntity>,
    players: IndexMap<Uuid, PlayerEntity>,
    rounds: IndexMap<Uuid, RoundEntity>,
    guesses: Vec<GuessEntity>,
    chat: Vec<ChatMessageEntity>,
    achievements: IndexMap<Uuid, AchievementEntity>,
}

impl MemoryRoomStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only closure against the tables.
    fn read<T, F>(&self, f: F) -> BoxFuture<'static, StorageResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(&Tables) -> T + Send + 'static,
    {
        let tables = self.tables.clone();
        Box::pin(async move {
            let guard = tables.read().await;
            Ok(f(&guard))
        })
    }

    /// Run a mutating closure against the tables.
    fn write<T, F>(&self, f: F) -> BoxFuture<'static, StorageResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(&mut Tables) -> T + Send + 'static,
    {
        let tables = self.tables.clone();
        Box::pin(async move {
            let mut guard = tables.write().await;
            Ok(f(&mut guard))
        })
    }
}

impl RoomStore for MemoryRoomStore {
    fn insert_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |tables| {
            tables.rooms.insert(room.id, room);
        })
    }

    fn save_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.insert_room(room)
    }

    fn find_room(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        self.read(move |tables| tables.rooms.get(&id).cloned())
    }

    fn delete_room(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |tables| {
            if tables.rooms.shift_remove(&id).is_none() {
                return false;
            }
            let round_ids: Vec<Uuid> = tables
                .rounds
                .values()
                .filter(|round| round.room_id == id)
                .map(|round| round.id)
                .collect();
            tables.players.retain(|_, player| player.room_id != id);
            tables.rounds.retain(|_, round| round.room_id != id);
            tables
                .guesses
                .retain(|guess| !round_ids.contains(&guess.round_id));
            tables.chat.retain(|message| message.room_id != id);
            true
        })
    }

    fn list_rooms(&self, status: RoomStatus) -> BoxFuture<'static, StorageResult<Vec<RoomEntity>>> {
        self.read(move |tables| {
            tables
                .rooms
                .values()
                .filter(|room| room.status == status)
                .cloned()
                .collect()
        })
    }

    fn insert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |tables| {
            tables.players.insert(player.id, player);
        })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        self.read(move |tables| tables.players.get(&id).cloned())
    }

    fn find_member(
        &self,
        room_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        self.read(move |tables| {
            tables
                .players
                .values()
                .find(|player| player.room_id == room_id && player.user_id == user_id)
                .cloned()
        })
    }

    fn list_players(&self, room_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        self.read(move |tables| {
            tables
                .players
                .values()
                .filter(|player| player.room_id == room_id)
                .cloned()
                .collect()
        })
    }

    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |tables| tables.players.shift_remove(&id).is_some())
    }

    fn set_ready(&self, id: Uuid, is_ready: bool) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |tables| match tables.players.get_mut(&id) {
            Some(player) => {
                player.is_ready = is_ready;
                true
            }
            None => false,
        })
    }

    fn add_score(&self, id: Uuid, points: i32) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |tables| match tables.players.get_mut(&id) {
            Some(player) => {
                player.score += points;
                true
            }
            None => false,
        })
    }

    fn list_players_by_user(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        self.read(move |tables| {
            tables
                .players
                .values()
                .filter(|player| player.user_id == user_id)
                .cloned()
                .collect()
        })
    }

    fn list_finished_players(
        &self,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        self.read(move |tables| {
            let mut players: Vec<PlayerEntity> = tables
                .players
                .values()
                .filter(|player| {
                    tables
                        .rooms
                        .get(&player.room_id)
                        .is_some_and(|room| room.status == RoomStatus::Finished)
                })
                .cloned()
                .collect();
            // Stable sort keeps join order among equal scores.
            players.sort_by(|a, b| b.score.cmp(&a.score));
            players.truncate(limit);
            players
        })
    }

    fn insert_round(&self, round: RoundEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |tables| {
            tables.rounds.insert(round.id, round);
        })
    }

    fn find_round(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoundEntity>>> {
        self.read(move |tables| tables.rounds.get(&id).cloned())
    }

    fn find_active_round(
        &self,
        room_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<RoundEntity>>> {
        self.read(move |tables| {
            tables
                .rounds
                .values()
                .filter(|round| round.room_id == room_id && round.is_active())
                .min_by_key(|round| round.round_number)
                .cloned()
        })
    }

    fn list_rounds(&self, room_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<RoundEntity>>> {
        self.read(move |tables| {
            let mut rounds: Vec<RoundEntity> = tables
                .rounds
                .values()
                .filter(|round| round.room_id == room_id)
                .cloned()
                .collect();
            rounds.sort_by_key(|round| round.round_number);
            rounds
        })
    }

    fn finish_round(&self, id: Uuid, at: SystemTime) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |tables| match tables.rounds.get_mut(&id) {
            Some(round) if round.is_active() => {
                round.finished_at = Some(at);
                true
            }
            _ => false,
        })
    }

    fn update_drawing(&self, id: Uuid, drawing: Value) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |tables| match tables.rounds.get_mut(&id) {
            Some(round) if round.is_active() => {
                round.drawing_data = Some(drawing);
                true
            }
            _ => false,
        })
    }

    fn insert_guess(&self, guess: GuessEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |tables| tables.guesses.push(guess))
    }

    fn list_guesses(&self, round_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<GuessEntity>>> {
        self.read(move |tables| {
            tables
                .guesses
                .iter()
                .filter(|guess| guess.round_id == round_id)
                .cloned()
                .collect()
        })
    }

    fn count_correct_guesses(
        &self,
        player_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        self.read(move |tables| {
            tables
                .guesses
                .iter()
                .filter(|guess| guess.is_correct && player_ids.contains(&guess.player_id))
                .count() as u64
        })
    }

    fn insert_chat_message(
        &self,
        message: ChatMessageEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |tables| tables.chat.push(message))
    }

    fn list_chat_messages(
        &self,
        room_id: Uuid,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<ChatMessageEntity>>> {
        self.read(move |tables| {
            tables
                .chat
                .iter()
                .rev()
                .filter(|message| message.room_id == room_id)
                .take(limit)
                .cloned()
                .collect()
        })
    }

    fn insert_achievement(
        &self,
        achievement: AchievementEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |tables| {
            tables.achievements.insert(achievement.id, achievement);
        })
    }

    fn find_achievement(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<AchievementEntity>>> {
        self.read(move |tables| tables.achievements.get(&id).cloned())
    }

    fn list_achievements(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AchievementEntity>>> {
        self.read(move |tables| {
            tables
                .achievements
                .values()
                .rev()
                .filter(|achievement| achievement.user_id == user_id)
                .cloned()
                .collect()
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
