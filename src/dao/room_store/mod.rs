/// In-process backend used for single-node deployments and tests.
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use std::time::SystemTime;

use futures::future::BoxFuture;
use serde_json::Value;
use uuid::Uuid;

use crate::dao::{
    models::{
        AchievementEntity, ChatMessageEntity, GuessEntity, PlayerEntity, RoomEntity, RoomStatus,
        RoundEntity,
    },
    storage::StorageResult,
};

pub use self::memory::MemoryRoomStore;

/// Abstraction over the persistence layer for rooms and everything played inside them.
///
/// Players are always returned in join order, which is the turn order of the game.
pub trait RoomStore: Send + Sync {
    fn insert_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn save_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_room(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>>;
    /// Delete a room together with its players, rounds, guesses and chat. Achievements stay.
    fn delete_room(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    fn list_rooms(&self, status: RoomStatus) -> BoxFuture<'static, StorageResult<Vec<RoomEntity>>>;

    fn insert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    fn find_member(
        &self,
        room_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    fn list_players(&self, room_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    fn set_ready(&self, id: Uuid, is_ready: bool) -> BoxFuture<'static, StorageResult<bool>>;
    fn add_score(&self, id: Uuid, points: i32) -> BoxFuture<'static, StorageResult<bool>>;
    fn list_players_by_user(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    /// Highest scores among players of finished rooms, best first.
    fn list_finished_players(
        &self,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;

    fn insert_round(&self, round: RoundEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_round(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoundEntity>>>;
    fn find_active_round(
        &self,
        room_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<RoundEntity>>>;
    fn list_rounds(&self, room_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<RoundEntity>>>;
    /// Close the round only if it is still active. Returns whether this call closed it.
    fn finish_round(&self, id: Uuid, at: SystemTime) -> BoxFuture<'static, StorageResult<bool>>;
    /// Replace the drawing of an active round. Returns false when the round is closed or absent.
    fn update_drawing(&self, id: Uuid, drawing: Value) -> BoxFuture<'static, StorageResult<bool>>;

    fn insert_guess(&self, guess: GuessEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn list_guesses(&self, round_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<GuessEntity>>>;
    fn count_correct_guesses(
        &self,
        player_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<u64>>;

    fn insert_chat_message(
        &self,
        message: ChatMessageEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Latest messages of a room, newest first.
    fn list_chat_messages(
        &self,
        room_id: Uuid,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<ChatMessageEntity>>>;

    fn insert_achievement(
        &self,
        achievement: AchievementEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn find_achievement(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<AchievementEntity>>>;
    /// Achievements of a user, newest first.
    fn list_achievements(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AchievementEntity>>>;

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
