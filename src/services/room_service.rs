use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    config::GameDefinition,
    dao::{
        models::{PlayerEntity, RoomEntity, RoomStatus},
        room_store::RoomStore,
    },
    dto::room::{
        ActionResponse, CreateRoomRequest, GameResultResponse, PlayerView, RoomDetail,
        RoomSummary,
    },
    error::ServiceError,
    identity::CurrentUser,
    services::{achievement_service, room_events, round_service},
    state::{SharedState, lifecycle::LifecycleEvent, transitions::run_room_transition},
};

/// Fetch a room or fail with [`ServiceError::NotFound`].
pub(crate) async fn load_room(
    store: &dyn RoomStore,
    room_id: Uuid,
) -> Result<RoomEntity, ServiceError> {
    store
        .find_room(room_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("room {room_id} not found")))
}

/// Resolve the caller's membership in a room or fail with [`ServiceError::Forbidden`].
pub(crate) async fn require_member(
    store: &dyn RoomStore,
    room_id: Uuid,
    user_id: Uuid,
) -> Result<PlayerEntity, ServiceError> {
    store
        .find_member(room_id, user_id)
        .await?
        .ok_or_else(|| ServiceError::Forbidden("not a member of this room".into()))
}

/// Game definition backing a room.
pub(crate) fn game_definition<'a>(
    state: &'a SharedState,
    slug: &str,
) -> Result<&'a GameDefinition, ServiceError> {
    state
        .config()
        .game(slug)
        .ok_or_else(|| ServiceError::NotFound(format!("game `{slug}` is not configured")))
}

fn require_host(room: &RoomEntity, user: &CurrentUser) -> Result<(), ServiceError> {
    if room.host_id != user.id {
        return Err(ServiceError::Forbidden(
            "only the host can perform this action".into(),
        ));
    }
    Ok(())
}

async fn detail(store: &dyn RoomStore, room: &RoomEntity) -> Result<RoomDetail, ServiceError> {
    let players = store.list_players(room.id).await?;
    let active = store.find_active_round(room.id).await?;
    Ok(RoomDetail::new(room, &players, active.as_ref()))
}

/// Open a room; the host becomes its first, ready player.
pub async fn create_room(
    state: &SharedState,
    user: &CurrentUser,
    request: CreateRoomRequest,
) -> Result<RoomDetail, ServiceError> {
    let game = match request.game.as_deref() {
        Some(slug) => game_definition(state, slug)?,
        None => state
            .config()
            .default_game()
            .ok_or_else(|| ServiceError::NotFound("no game is available".into()))?,
    };
    if !game.is_active {
        return Err(ServiceError::InvalidInput(format!(
            "game `{}` is not active",
            game.slug
        )));
    }

    let max_players = request.max_players.unwrap_or(game.max_players);
    if max_players < game.min_players {
        return Err(ServiceError::InvalidInput(format!(
            "room capacity must be at least {}",
            game.min_players
        )));
    }

    let store = state.require_room_store().await?;
    let now = SystemTime::now();
    let room = RoomEntity {
        id: Uuid::new_v4(),
        game: game.slug.clone(),
        name: request.name.trim().to_owned(),
        status: RoomStatus::Waiting,
        host_id: user.id,
        host_username: user.username.clone(),
        max_players,
        is_private: request.is_private,
        password: request
            .password
            .map(|password| password.trim().to_owned())
            .filter(|password| request.is_private && !password.is_empty()),
        created_at: now,
        started_at: None,
        finished_at: None,
    };
    store.insert_room(room.clone()).await?;
    store
        .insert_player(PlayerEntity {
            id: Uuid::new_v4(),
            room_id: room.id,
            user_id: user.id,
            username: user.username.clone(),
            score: 0,
            is_ready: true,
            is_active: true,
            joined_at: now,
        })
        .await?;

    info!(room_id = %room.id, host = %user.username, game = %room.game, "room created");
    detail(store.as_ref(), &room).await
}

/// Rooms still accepting players, newest first.
pub async fn list_open_rooms(state: &SharedState) -> Result<Vec<RoomSummary>, ServiceError> {
    let store = state.require_room_store().await?;
    let mut rooms = store.list_rooms(RoomStatus::Waiting).await?;
    rooms.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut summaries = Vec::with_capacity(rooms.len());
    for room in &rooms {
        let count = store.list_players(room.id).await?.len();
        summaries.push(RoomSummary::new(room, count));
    }
    Ok(summaries)
}

/// Room with its players and current drawer.
pub async fn room_detail(state: &SharedState, room_id: Uuid) -> Result<RoomDetail, ServiceError> {
    let store = state.require_room_store().await?;
    let room = load_room(store.as_ref(), room_id).await?;
    detail(store.as_ref(), &room).await
}

/// Add the caller to a waiting room.
pub async fn join_room(
    state: &SharedState,
    user: &CurrentUser,
    room_id: Uuid,
    password: Option<&str>,
) -> Result<RoomDetail, ServiceError> {
    let _gate = state.lock_room(room_id).await;
    let store = state.require_room_store().await?;

    let room = store
        .find_room(room_id)
        .await?
        .filter(|room| room.status == RoomStatus::Waiting)
        .ok_or_else(|| {
            ServiceError::NotFound(format!("room {room_id} not found or not accepting players"))
        })?;

    if store.find_member(room_id, user.id).await?.is_some() {
        return Err(ServiceError::InvalidState(
            "already a member of this room".into(),
        ));
    }

    let players = store.list_players(room_id).await?;
    if players.len() >= room.max_players as usize {
        return Err(ServiceError::PreconditionFailed("room is full".into()));
    }

    if room.is_private && room.password.as_deref() != password.map(str::trim) {
        return Err(ServiceError::PreconditionFailed("wrong password".into()));
    }

    store
        .insert_player(PlayerEntity {
            id: Uuid::new_v4(),
            room_id,
            user_id: user.id,
            username: user.username.clone(),
            score: 0,
            is_ready: false,
            is_active: true,
            joined_at: SystemTime::now(),
        })
        .await?;

    info!(%room_id, player = %user.username, "player joined room");
    detail(store.as_ref(), &room).await
}

/// Leave a waiting room. The host leaving closes the room for everyone.
pub async fn leave_room(
    state: &SharedState,
    user: &CurrentUser,
    room_id: Uuid,
) -> Result<ActionResponse, ServiceError> {
    let gate = state.lock_room(room_id).await;
    let store = state.require_room_store().await?;

    let not_found = || ServiceError::NotFound("player not found in a waiting room".into());
    let room = store
        .find_room(room_id)
        .await?
        .filter(|room| room.status == RoomStatus::Waiting)
        .ok_or_else(not_found)?;
    let member = store
        .find_member(room_id, user.id)
        .await?
        .ok_or_else(not_found)?;

    if room.host_id == user.id {
        store.delete_room(room_id).await?;
        drop(gate);
        state.release_room(room_id);
        info!(%room_id, host = %user.username, "host left; room closed");
        Ok(ActionResponse::new("room closed"))
    } else {
        store.delete_player(member.id).await?;
        info!(%room_id, player = %user.username, "player left room");
        Ok(ActionResponse::new("left room"))
    }
}

/// Start the game: the room must be waiting, full enough and entirely ready.
pub async fn start_game(
    state: &SharedState,
    user: &CurrentUser,
    room_id: Uuid,
) -> Result<RoomDetail, ServiceError> {
    let store = state.require_room_store().await?;
    let room = load_room(store.as_ref(), room_id).await?;
    require_host(&room, user)?;
    let game = game_definition(state, &room.game)?;

    let work_store = store.clone();
    let (_round, room) =
        run_room_transition(state, room_id, LifecycleEvent::StartGame, |_| async move {
            let players = work_store.list_players(room_id).await?;
            if (players.len() as u32) < game.min_players {
                return Err(ServiceError::PreconditionFailed(format!(
                    "at least {} players are required",
                    game.min_players
                )));
            }
            if !players.iter().all(|player| player.is_ready) {
                return Err(ServiceError::PreconditionFailed(
                    "not every player is ready".into(),
                ));
            }
            let drawer = players
                .first()
                .ok_or_else(|| ServiceError::PreconditionFailed("room has no players".into()))?;

            round_service::open_round(work_store.as_ref(), game, room_id, 1, drawer).await
        })
        .await?;

    room_events::broadcast_game_started(state, room_id);
    detail(store.as_ref(), &room).await
}

/// End a running game, closing any active round and naming the winner.
pub async fn end_game(
    state: &SharedState,
    user: &CurrentUser,
    room_id: Uuid,
) -> Result<GameResultResponse, ServiceError> {
    let store = state.require_room_store().await?;
    let room = load_room(store.as_ref(), room_id).await?;
    require_host(&room, user)?;

    let work_store = store.clone();
    let (standings, room) =
        run_room_transition(state, room_id, LifecycleEvent::EndGame, |_| async move {
            if let Some(round) = work_store.find_active_round(room_id).await? {
                work_store.finish_round(round.id, SystemTime::now()).await?;
            }
            let mut players = work_store.list_players(room_id).await?;
            // Stable sort keeps join order among equal scores.
            players.sort_by(|a, b| b.score.cmp(&a.score));
            Ok(players)
        })
        .await?;

    let winner = standings.first();
    room_events::broadcast_game_ended(
        state,
        room_id,
        winner.map(|player| (player.username.as_str(), player.score)),
    );
    info!(
        %room_id,
        winner = winner.map(|player| player.username.as_str()).unwrap_or("-"),
        "game ended"
    );
    if let Some(winner) = winner {
        achievement_service::award_game_won(state, &room, winner).await;
    }

    Ok(GameResultResponse {
        room_id,
        status: room.status,
        winner: winner.map(PlayerView::from),
        standings: standings.iter().map(PlayerView::from).collect(),
    })
}

/// Members of a room by descending score.
pub async fn list_players(
    state: &SharedState,
    user: &CurrentUser,
    room_id: Uuid,
) -> Result<Vec<PlayerView>, ServiceError> {
    let store = state.require_room_store().await?;
    load_room(store.as_ref(), room_id).await?;
    require_member(store.as_ref(), room_id, user.id).await?;

    let mut players = store.list_players(room_id).await?;
    players.sort_by(|a, b| b.score.cmp(&a.score));
    Ok(players.iter().map(PlayerView::from).collect())
}

/// Set an active member's readiness and broadcast the change.
pub async fn set_ready(
    state: &SharedState,
    room_id: Uuid,
    player_id: Uuid,
    is_ready: bool,
) -> Result<PlayerEntity, ServiceError> {
    let store = state.require_room_store().await?;
    let mut player = store
        .find_player(player_id)
        .await?
        .filter(|player| player.room_id == room_id && player.is_active)
        .ok_or_else(|| ServiceError::NotFound(format!("player {player_id} not found")))?;

    if !store.set_ready(player.id, is_ready).await? {
        return Err(ServiceError::NotFound(format!("player {player_id} not found")));
    }
    player.is_ready = is_ready;

    room_events::broadcast_ready_status_changed(state, room_id, &player.username, is_ready);
    Ok(player)
}

/// Flip the caller's own readiness.
pub async fn toggle_ready(
    state: &SharedState,
    user: &CurrentUser,
    player_id: Uuid,
) -> Result<PlayerView, ServiceError> {
    let store = state.require_room_store().await?;
    let player = store
        .find_player(player_id)
        .await?
        .filter(|player| player.user_id == user.id)
        .ok_or_else(|| ServiceError::NotFound(format!("player {player_id} not found")))?;
    let room = load_room(store.as_ref(), player.room_id).await?;
    if room.status != RoomStatus::Waiting {
        return Err(ServiceError::InvalidState(
            "readiness can only change while the room is waiting".into(),
        ));
    }

    let updated = set_ready(state, player.room_id, player.id, !player.is_ready).await?;
    Ok(PlayerView::from(&updated))
}

/// Remove another player from a waiting room. Host only.
pub async fn kick_player(
    state: &SharedState,
    user: &CurrentUser,
    player_id: Uuid,
) -> Result<ActionResponse, ServiceError> {
    let store = state.require_room_store().await?;
    let player = store
        .find_player(player_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("player {player_id} not found")))?;

    let _gate = state.lock_room(player.room_id).await;
    let room = store
        .find_room(player.room_id)
        .await?
        .filter(|room| room.status == RoomStatus::Waiting)
        .ok_or_else(|| ServiceError::NotFound(format!("player {player_id} not found")))?;
    require_host(&room, user)?;
    if player.user_id == user.id {
        return Err(ServiceError::PreconditionFailed(
            "you cannot kick yourself".into(),
        ));
    }

    store.delete_player(player.id).await?;
    info!(room_id = %room.id, player = %player.username, "player kicked");
    Ok(ActionResponse::new("player kicked"))
}
