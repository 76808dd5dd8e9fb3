use std::{sync::Arc, time::SystemTime};

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{DateTime, Document, doc},
    options::IndexOptions,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::{establish_connection, ping},
    error::{MongoDaoError, MongoResult},
    models::{
        MongoAchievementDocument, MongoChatDocument, MongoGuessDocument, MongoPlayerDocument,
        MongoRoomDocument, MongoRoundDocument, doc_id,
    },
};
use crate::dao::{
    models::{
        AchievementEntity, ChatMessageEntity, GuessEntity, PlayerEntity, RoomEntity, RoomStatus,
        RoundEntity,
    },
    room_store::RoomStore,
    storage::StorageResult,
};

const ROOMS: &str = "rooms";
const PLAYERS: &str = "players";
const ROUNDS: &str = "rounds";
const GUESSES: &str = "guesses";
const CHAT_MESSAGES: &str = "chat_messages";
const ACHIEVEMENTS: &str = "achievements";

/// MongoDB-backed [`RoomStore`].
#[derive(Clone)]
pub struct MongoRoomStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = self.state.read().await.database.clone();
        ping(&database)
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

fn ids(values: &[Uuid]) -> Vec<String> {
    values.iter().map(Uuid::to_string).collect()
}

impl MongoRoomStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let store = Self {
            inner: Arc::new(MongoInner {
                state: RwLock::new(MongoState { client, database }),
                config,
            }),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let indexes: [(&'static str, &'static str, Document, bool); 6] = [
            (PLAYERS, "room_user", doc! {"room_id": 1, "user_id": 1}, true),
            (PLAYERS, "room_joined", doc! {"room_id": 1, "joined_at": 1}, false),
            (ROUNDS, "room_number", doc! {"room_id": 1, "round_number": 1}, true),
            (GUESSES, "round", doc! {"round_id": 1}, false),
            (CHAT_MESSAGES, "room_created", doc! {"room_id": 1, "created_at": -1}, false),
            (ACHIEVEMENTS, "user_earned", doc! {"user_id": 1, "earned_at": -1}, false),
        ];

        let database = self.database().await;
        for (collection, index, keys, unique) in indexes {
            let model = IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .name(Some(format!("{collection}_{index}_idx")))
                        .unique(Some(unique))
                        .build(),
                )
                .build();
            database
                .collection::<Document>(collection)
                .create_index(model)
                .await
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection,
                    index,
                    source,
                })?;
        }
        Ok(())
    }

    async fn database(&self) -> Database {
        self.inner.state.read().await.database.clone()
    }

    async fn collection<D: Send + Sync>(&self, name: &str) -> Collection<D> {
        self.database().await.collection::<D>(name)
    }

    async fn insert<D, E>(&self, name: &'static str, entity: E) -> MongoResult<()>
    where
        D: From<E> + Serialize + Send + Sync,
    {
        let document = D::from(entity);
        self.collection::<D>(name)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: name,
                source,
            })?;
        Ok(())
    }

    async fn find_one<D, E>(&self, name: &'static str, filter: Document) -> MongoResult<Option<E>>
    where
        D: DeserializeOwned + Send + Sync,
        E: TryFrom<D, Error = MongoDaoError>,
    {
        self.collection::<D>(name)
            .await
            .find_one(filter)
            .await
            .map_err(|source| MongoDaoError::Read {
                collection: name,
                source,
            })?
            .map(E::try_from)
            .transpose()
    }

    async fn find_many<D, E>(
        &self,
        name: &'static str,
        filter: Document,
        sort: Document,
        limit: Option<i64>,
    ) -> MongoResult<Vec<E>>
    where
        D: DeserializeOwned + Unpin + Send + Sync,
        E: TryFrom<D, Error = MongoDaoError>,
    {
        let collection = self.collection::<D>(name).await;
        let mut query = collection.find(filter).sort(sort);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let documents: Vec<D> = query
            .await
            .map_err(|source| MongoDaoError::Read {
                collection: name,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Read {
                collection: name,
                source,
            })?;

        documents.into_iter().map(E::try_from).collect()
    }

    async fn update(
        &self,
        name: &'static str,
        filter: Document,
        update: Document,
    ) -> MongoResult<bool> {
        let result = self
            .collection::<Document>(name)
            .await
            .update_one(filter, update)
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: name,
                source,
            })?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, name: &'static str, filter: Document) -> MongoResult<u64> {
        let result = self
            .collection::<Document>(name)
            .await
            .delete_many(filter)
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: name,
                source,
            })?;
        Ok(result.deleted_count)
    }

    async fn save_room(&self, room: RoomEntity) -> MongoResult<()> {
        let id = room.id;
        let document = MongoRoomDocument::from(room);
        self.collection::<MongoRoomDocument>(ROOMS)
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: ROOMS,
                source,
            })?;
        Ok(())
    }

    async fn delete_room(&self, id: Uuid) -> MongoResult<bool> {
        let room_id = id.to_string();
        let rounds: Vec<RoundEntity> = self
            .find_many::<MongoRoundDocument, _>(
                ROUNDS,
                doc! {"room_id": &room_id},
                doc! {},
                None,
            )
            .await?;
        let round_ids: Vec<Uuid> = rounds.iter().map(|round| round.id).collect();

        self.delete(GUESSES, doc! {"round_id": {"$in": ids(&round_ids)}})
            .await?;
        self.delete(ROUNDS, doc! {"room_id": &room_id}).await?;
        self.delete(PLAYERS, doc! {"room_id": &room_id}).await?;
        self.delete(CHAT_MESSAGES, doc! {"room_id": &room_id})
            .await?;
        Ok(self.delete(ROOMS, doc_id(id)).await? > 0)
    }

    async fn list_finished_players(&self, limit: usize) -> MongoResult<Vec<PlayerEntity>> {
        let rooms: Vec<RoomEntity> = self
            .find_many::<MongoRoomDocument, _>(
                ROOMS,
                doc! {"status": RoomStatus::Finished.as_str()},
                doc! {},
                None,
            )
            .await?;
        let room_ids: Vec<Uuid> = rooms.iter().map(|room| room.id).collect();

        self.find_many::<MongoPlayerDocument, _>(
            PLAYERS,
            doc! {"room_id": {"$in": ids(&room_ids)}},
            doc! {"score": -1, "joined_at": 1},
            Some(limit as i64),
        )
        .await
    }

    async fn count_correct_guesses(&self, player_ids: Vec<Uuid>) -> MongoResult<u64> {
        self.collection::<Document>(GUESSES)
            .await
            .count_documents(doc! {
                "player_id": {"$in": ids(&player_ids)},
                "is_correct": true,
            })
            .await
            .map_err(|source| MongoDaoError::Read {
                collection: GUESSES,
                source,
            })
    }
}

impl RoomStore for MongoRoomStore {
    fn insert_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .insert::<MongoRoomDocument, _>(ROOMS, room)
                .await
                .map_err(Into::into)
        })
    }

    fn save_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_room(room).await.map_err(Into::into) })
    }

    fn find_room(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<MongoRoomDocument, _>(ROOMS, doc_id(id))
                .await
                .map_err(Into::into)
        })
    }

    fn delete_room(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_room(id).await.map_err(Into::into) })
    }

    fn list_rooms(&self, status: RoomStatus) -> BoxFuture<'static, StorageResult<Vec<RoomEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<MongoRoomDocument, _>(
                    ROOMS,
                    doc! {"status": status.as_str()},
                    doc! {"created_at": -1},
                    None,
                )
                .await
                .map_err(Into::into)
        })
    }

    fn insert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .insert::<MongoPlayerDocument, _>(PLAYERS, player)
                .await
                .map_err(Into::into)
        })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<MongoPlayerDocument, _>(PLAYERS, doc_id(id))
                .await
                .map_err(Into::into)
        })
    }

    fn find_member(
        &self,
        room_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<MongoPlayerDocument, _>(
                    PLAYERS,
                    doc! {"room_id": room_id.to_string(), "user_id": user_id.to_string()},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn list_players(&self, room_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<MongoPlayerDocument, _>(
                    PLAYERS,
                    doc! {"room_id": room_id.to_string()},
                    doc! {"joined_at": 1},
                    None,
                )
                .await
                .map_err(Into::into)
        })
    }

    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .delete(PLAYERS, doc_id(id))
                .await
                .map(|deleted| deleted > 0)
                .map_err(Into::into)
        })
    }

    fn set_ready(&self, id: Uuid, is_ready: bool) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .update(PLAYERS, doc_id(id), doc! {"$set": {"is_ready": is_ready}})
                .await
                .map_err(Into::into)
        })
    }

    fn add_score(&self, id: Uuid, points: i32) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .update(PLAYERS, doc_id(id), doc! {"$inc": {"score": points}})
                .await
                .map_err(Into::into)
        })
    }

    fn list_players_by_user(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<MongoPlayerDocument, _>(
                    PLAYERS,
                    doc! {"user_id": user_id.to_string()},
                    doc! {"joined_at": 1},
                    None,
                )
                .await
                .map_err(Into::into)
        })
    }

    fn list_finished_players(
        &self,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_finished_players(limit).await.map_err(Into::into) })
    }

    fn insert_round(&self, round: RoundEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .insert::<MongoRoundDocument, _>(ROUNDS, round)
                .await
                .map_err(Into::into)
        })
    }

    fn find_round(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoundEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<MongoRoundDocument, _>(ROUNDS, doc_id(id))
                .await
                .map_err(Into::into)
        })
    }

    fn find_active_round(
        &self,
        room_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<RoundEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<MongoRoundDocument, _>(
                    ROUNDS,
                    doc! {"room_id": room_id.to_string(), "finished_at": null},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn list_rounds(&self, room_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<RoundEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<MongoRoundDocument, _>(
                    ROUNDS,
                    doc! {"room_id": room_id.to_string()},
                    doc! {"round_number": 1},
                    None,
                )
                .await
                .map_err(Into::into)
        })
    }

    fn finish_round(&self, id: Uuid, at: SystemTime) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .update(
                    ROUNDS,
                    doc! {"_id": id.to_string(), "finished_at": null},
                    doc! {"$set": {"finished_at": DateTime::from_system_time(at)}},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn update_drawing(&self, id: Uuid, drawing: Value) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .update(
                    ROUNDS,
                    doc! {"_id": id.to_string(), "finished_at": null},
                    doc! {"$set": {"drawing_json": drawing.to_string()}},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn insert_guess(&self, guess: GuessEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .insert::<MongoGuessDocument, _>(GUESSES, guess)
                .await
                .map_err(Into::into)
        })
    }

    fn list_guesses(&self, round_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<GuessEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<MongoGuessDocument, _>(
                    GUESSES,
                    doc! {"round_id": round_id.to_string()},
                    doc! {"created_at": 1},
                    None,
                )
                .await
                .map_err(Into::into)
        })
    }

    fn count_correct_guesses(
        &self,
        player_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .count_correct_guesses(player_ids)
                .await
                .map_err(Into::into)
        })
    }

    fn insert_chat_message(
        &self,
        message: ChatMessageEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .insert::<MongoChatDocument, _>(CHAT_MESSAGES, message)
                .await
                .map_err(Into::into)
        })
    }

    fn list_chat_messages(
        &self,
        room_id: Uuid,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<ChatMessageEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<MongoChatDocument, _>(
                    CHAT_MESSAGES,
                    doc! {"room_id": room_id.to_string()},
                    doc! {"created_at": -1},
                    Some(limit as i64),
                )
                .await
                .map_err(Into::into)
        })
    }

    fn insert_achievement(
        &self,
        achievement: AchievementEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .insert::<MongoAchievementDocument, _>(ACHIEVEMENTS, achievement)
                .await
                .map_err(Into::into)
        })
    }

    fn find_achievement(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<AchievementEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_one::<MongoAchievementDocument, _>(ACHIEVEMENTS, doc_id(id))
                .await
                .map_err(Into::into)
        })
    }

    fn list_achievements(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AchievementEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_many::<MongoAchievementDocument, _>(
                    ACHIEVEMENTS,
                    doc! {"user_id": user_id.to_string()},
                    doc! {"earned_at": -1},
                    None,
                )
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
