//! Fixtures shared by the service tests.

use std::time::{Duration, SystemTime};

use uuid::Uuid;

use crate::{
    config::{AppConfig, GameDefinition, GameType},
    dao::models::{PlayerEntity, RoomEntity, RoomStatus, RoundEntity},
    state::SharedState,
};

pub const GAME: &str = "draw_guess";

/// Catalog with a single draw & guess game whose only secret word is `word`.
pub fn word_config(word: &str) -> AppConfig {
    AppConfig::from_games(vec![GameDefinition {
        slug: GAME.into(),
        name: "Draw & Guess".into(),
        description: String::new(),
        game_type: GameType::DrawGuess,
        min_players: 2,
        max_players: 8,
        duration_minutes: 15,
        points: 100,
        is_active: true,
        words: vec![word.into()],
    }])
}

pub struct RoomFixture {
    pub room: RoomEntity,
    /// Players in join order; the first one is the host.
    pub players: Vec<PlayerEntity>,
}

/// Persist a room in `status` with one ready player per name.
pub async fn seeded_room(state: &SharedState, names: &[&str], status: RoomStatus) -> RoomFixture {
    let store = state.require_room_store().await.unwrap();
    let created_at = SystemTime::now();
    let host_id = Uuid::new_v4();
    let room = RoomEntity {
        id: Uuid::new_v4(),
        game: GAME.into(),
        name: "test room".into(),
        status,
        host_id,
        host_username: names[0].into(),
        max_players: 8,
        is_private: false,
        password: None,
        created_at,
        started_at: (status != RoomStatus::Waiting).then_some(created_at),
        finished_at: None,
    };
    store.insert_room(room.clone()).await.unwrap();

    let mut players = Vec::new();
    for (index, name) in names.iter().enumerate() {
        let player = PlayerEntity {
            id: Uuid::new_v4(),
            room_id: room.id,
            user_id: if index == 0 { host_id } else { Uuid::new_v4() },
            username: (*name).into(),
            score: 0,
            is_ready: true,
            is_active: true,
            joined_at: created_at + Duration::from_millis(index as u64),
        };
        store.insert_player(player.clone()).await.unwrap();
        players.push(player);
    }

    RoomFixture { room, players }
}

/// A playing room whose first round is drawn by the first player.
pub async fn playing_room(state: &SharedState, names: &[&str]) -> RoomFixture {
    let fixture = seeded_room(state, names, RoomStatus::Playing).await;
    let store = state.require_room_store().await.unwrap();
    let word = state.config().game(GAME).unwrap().words[0].clone();
    store
        .insert_round(RoundEntity {
            id: Uuid::new_v4(),
            room_id: fixture.room.id,
            round_number: 1,
            current_player_id: fixture.players[0].id,
            word,
            drawing_data: None,
            started_at: SystemTime::now(),
            finished_at: None,
        })
        .await
        .unwrap();
    fixture
}
