use std::time::SystemTime;

use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::GameDefinition,
    dao::{
        models::{GuessEntity, PlayerEntity, RoundEntity},
        room_store::RoomStore,
    },
    dto::round::{GuessResponse, GuessView, RoundView},
    error::ServiceError,
    identity::CurrentUser,
    services::{
        room_events,
        room_service::{game_definition, load_room, require_member},
    },
    state::SharedState,
};

/// Result of adjudicating one guess.
#[derive(Debug, Clone)]
pub struct GuessRecord {
    /// The persisted guess.
    pub guess: GuessEntity,
    /// Username of the guesser.
    pub player: String,
    /// Round opened because this guess was correct, if any.
    pub next_round: Option<RoundEntity>,
}

/// Canonical form used to compare guesses with the secret word.
pub fn normalize_guess(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Create round `number` of a room with a fresh secret word.
pub(crate) async fn open_round(
    store: &dyn RoomStore,
    game: &GameDefinition,
    room_id: Uuid,
    number: u32,
    drawer: &PlayerEntity,
) -> Result<RoundEntity, ServiceError> {
    let round = RoundEntity {
        id: Uuid::new_v4(),
        room_id,
        round_number: number,
        current_player_id: drawer.id,
        word: game.pick_word(),
        drawing_data: None,
        started_at: SystemTime::now(),
        finished_at: None,
    };
    store.insert_round(round.clone()).await?;
    info!(%room_id, round = number, drawer = %drawer.username, "round opened");
    Ok(round)
}

/// Close `round` and hand the pencil to the next player.
///
/// The next drawer is the first player in join order other than the one who just drew.
/// Must run under the room gate. Returns `None` when the round was already closed or
/// nobody else is left to draw.
async fn advance_round(
    store: &dyn RoomStore,
    game: &GameDefinition,
    round: &RoundEntity,
) -> Result<Option<RoundEntity>, ServiceError> {
    if !store.finish_round(round.id, SystemTime::now()).await? {
        debug!(round_id = %round.id, "round already closed");
        return Ok(None);
    }

    let players = store.list_players(round.room_id).await?;
    let Some(next) = players
        .iter()
        .find(|player| player.is_active && player.id != round.current_player_id)
    else {
        info!(room_id = %round.room_id, "no player left to draw; room has no active round");
        return Ok(None);
    };

    open_round(store, game, round.room_id, round.round_number + 1, next)
        .await
        .map(Some)
}

/// Adjudicate a guess from `player_id` against the room's active round.
///
/// Shared by the WebSocket session and the REST fallback. When `expected_round` is set the
/// guess only counts if that round is still the active one. A correct guess awards the
/// game's points, closes the round and opens the next one. The outcome is broadcast.
pub async fn submit_guess(
    state: &SharedState,
    room_id: Uuid,
    player_id: Uuid,
    text: &str,
    expected_round: Option<Uuid>,
) -> Result<GuessRecord, ServiceError> {
    let normalized = normalize_guess(text);
    if normalized.is_empty() {
        return Err(ServiceError::InvalidInput("guess must not be empty".into()));
    }

    let record = {
        let _gate = state.lock_room(room_id).await;
        let store = state.require_room_store().await?;

        let player = store
            .find_player(player_id)
            .await?
            .filter(|player| player.room_id == room_id && player.is_active)
            .ok_or_else(|| {
                ServiceError::PreconditionFailed("player is not active in this room".into())
            })?;

        let round = store
            .find_active_round(room_id)
            .await?
            .ok_or_else(|| ServiceError::PreconditionFailed("no active round".into()))?;
        if expected_round.is_some_and(|expected| expected != round.id) {
            return Err(ServiceError::PreconditionFailed(
                "round is no longer active".into(),
            ));
        }
        if round.current_player_id == player.id {
            return Err(ServiceError::PreconditionFailed(
                "the drawer cannot guess".into(),
            ));
        }

        let room = load_room(store.as_ref(), room_id).await?;
        let game = game_definition(state, &room.game)?;

        let is_correct = normalized == normalize_guess(&round.word);
        let guess = GuessEntity {
            id: Uuid::new_v4(),
            round_id: round.id,
            player_id: player.id,
            guess: normalized,
            is_correct,
            points_earned: if is_correct { game.points } else { 0 },
            created_at: SystemTime::now(),
        };
        store.insert_guess(guess.clone()).await?;

        let next_round = if is_correct {
            store.add_score(player.id, game.points).await?;
            info!(
                %room_id,
                player = %player.username,
                round = round.round_number,
                points = game.points,
                "correct guess"
            );
            advance_round(store.as_ref(), game, &round).await?
        } else {
            None
        };

        GuessRecord {
            guess,
            player: player.username,
            next_round,
        }
    };

    room_events::broadcast_guess_made(
        state,
        room_id,
        &record.player,
        &record.guess.guess,
        record.guess.is_correct,
    );
    Ok(record)
}

/// Whether a drawing payload is blank: `null`, `false`, `0`, `""`, `[]` or `{}`.
fn is_blank_drawing(drawing: &Value) -> bool {
    match drawing {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Replace the drawing of the room's active round. Only its drawer may do so.
///
/// Blank payloads are rejected and leave the stored drawing untouched.
pub async fn submit_drawing(
    state: &SharedState,
    room_id: Uuid,
    player_id: Uuid,
    drawing: Value,
    expected_round: Option<Uuid>,
) -> Result<(), ServiceError> {
    if is_blank_drawing(&drawing) {
        return Err(ServiceError::InvalidInput("drawing_data is required".into()));
    }

    let store = state.require_room_store().await?;
    let round = store
        .find_active_round(room_id)
        .await?
        .ok_or_else(|| ServiceError::PreconditionFailed("no active round".into()))?;
    if expected_round.is_some_and(|expected| expected != round.id) {
        return Err(ServiceError::PreconditionFailed(
            "round is no longer active".into(),
        ));
    }
    if round.current_player_id != player_id {
        return Err(ServiceError::Forbidden(
            "only the current drawer can update the drawing".into(),
        ));
    }

    if !store.update_drawing(round.id, drawing.clone()).await? {
        return Err(ServiceError::PreconditionFailed(
            "round is no longer active".into(),
        ));
    }

    room_events::broadcast_drawing_updated(state, room_id, drawing);
    Ok(())
}

/// REST guess against a specific round.
pub async fn guess_round(
    state: &SharedState,
    user: &CurrentUser,
    round_id: Uuid,
    text: &str,
) -> Result<GuessResponse, ServiceError> {
    let store = state.require_room_store().await?;
    let round = store
        .find_round(round_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("round {round_id} not found")))?;
    let member = require_member(store.as_ref(), round.room_id, user.id).await?;

    let record = submit_guess(state, round.room_id, member.id, text, Some(round.id)).await?;
    let players = store.list_players(round.room_id).await?;

    Ok(GuessResponse {
        guess: GuessView::new(&record.guess, &players),
        next_round: record.next_round.map(|round| round.round_number),
    })
}

/// REST drawing update against a specific round.
pub async fn draw_round(
    state: &SharedState,
    user: &CurrentUser,
    round_id: Uuid,
    drawing: Value,
) -> Result<(), ServiceError> {
    let store = state.require_room_store().await?;
    let round = store
        .find_round(round_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("round {round_id} not found")))?;
    let member = require_member(store.as_ref(), round.room_id, user.id).await?;

    submit_drawing(state, round.room_id, member.id, drawing, Some(round.id)).await
}

/// Every round of a room as seen by the caller, oldest first.
pub async fn list_rounds(
    state: &SharedState,
    user: &CurrentUser,
    room_id: Uuid,
) -> Result<Vec<RoundView>, ServiceError> {
    let store = state.require_room_store().await?;
    load_room(store.as_ref(), room_id).await?;
    let member = require_member(store.as_ref(), room_id, user.id).await?;
    let players = store.list_players(room_id).await?;

    let mut views = Vec::new();
    for round in store.list_rounds(room_id).await? {
        let guesses = store.list_guesses(round.id).await?;
        views.push(RoundView::for_viewer(&round, &guesses, &players, member.id));
    }
    Ok(views)
}

/// The room's active round as seen by the caller.
pub async fn current_round(
    state: &SharedState,
    user: &CurrentUser,
    room_id: Uuid,
) -> Result<RoundView, ServiceError> {
    let store = state.require_room_store().await?;
    load_room(store.as_ref(), room_id).await?;
    let member = require_member(store.as_ref(), room_id, user.id).await?;

    let round = store
        .find_active_round(room_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("no active round".into()))?;
    let guesses = store.list_guesses(round.id).await?;
    let players = store.list_players(room_id).await?;

    Ok(RoundView::for_viewer(&round, &guesses, &players, member.id))
}
